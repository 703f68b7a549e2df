// src/events/bus/event_bus.rs
//
// Notification bus between the services and whatever shows results:
// the catalog service announces fetched pages and released lists, the
// achievement service announces recorded activities and unlocks.
//
// Handlers run on the emitting task, after the change is stored.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

use crate::events::types::DomainEvent;

/// Oldest entries are dropped past this many emissions
pub const EVENT_LOG_CAPACITY: usize = 256;

type Listener = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// One emission, kept for diagnostics and tests
#[derive(Debug, Clone, PartialEq)]
pub struct EventLogEntry {
    pub event_type: &'static str,
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    /// Listeners that ran for this emission
    pub delivered_to: usize,
}

/// Clones share listeners and history, so every service can hold its own
/// handle while the CLI subscribes once.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<RwLock<HashMap<TypeId, Vec<Listener>>>>,
    history: Arc<RwLock<VecDeque<EventLogEntry>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for every future `E`, e.g. to print a line
    /// when an achievement unlocks:
    ///
    /// ```ignore
    /// bus.subscribe::<AchievementUnlocked, _>(|event| {
    ///     println!("Achievement unlocked: {}", event.achievement_name);
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, listener: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let erased: Listener = Box::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                listener(event);
            }
        });

        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(TypeId::of::<E>())
            .or_default()
            .push(erased);
    }

    /// Delivers `event` to its listeners in subscription order. A panicking
    /// listener is logged and skipped.
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        let for_type = listeners
            .get(&TypeId::of::<E>())
            .map(Vec::as_slice)
            .unwrap_or_default();

        debug!(
            "{} {} -> {} listener(s)",
            event.event_type(),
            event.event_id(),
            for_type.len()
        );

        for (idx, listener) in for_type.iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| listener(&event as &dyn Any))).is_err() {
                warn!("Listener {} for {} panicked", idx, event.event_type());
            }
        }

        self.record(EventLogEntry {
            event_type: event.event_type(),
            event_id: event.event_id(),
            occurred_at: event.occurred_at(),
            delivered_to: for_type.len(),
        });
    }

    /// Recent emissions, oldest first
    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// How many recent emissions had this event type
    pub fn emitted_count(&self, event_type: &str) -> usize {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|entry| entry.event_type == event_type)
            .count()
    }

    pub fn clear_event_log(&self) {
        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn subscriber_count<E: 'static>(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    fn record(&self, entry: EventLogEntry) {
        let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
        if history.len() == EVENT_LOG_CAPACITY {
            history.pop_front();
        }
        history.push_back(entry);
    }
}
