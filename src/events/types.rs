// src/events/types.rs
//
// Events emitted by the services.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::MovieListType;

/// Trait that all events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! impl_domain_event {
    ($event:ty, $name:literal) => {
        impl DomainEvent for $event {
            fn event_id(&self) -> Uuid {
                self.event_id
            }
            fn occurred_at(&self) -> DateTime<Utc> {
                self.occurred_at
            }
            fn event_type(&self) -> &'static str {
                $name
            }
        }
    };
}

// ============================================================================
// CATALOG EVENTS
// ============================================================================

/// Emitted when a page was fetched from the catalog and appended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviePageLoaded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub list_type: MovieListType,
    pub page: u32,
    pub item_count: usize,
    pub total_pages: u32,
}

impl MoviePageLoaded {
    pub fn new(list_type: MovieListType, page: u32, item_count: usize, total_pages: u32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            list_type,
            page,
            item_count,
            total_pages,
        }
    }
}

impl_domain_event!(MoviePageLoaded, "MoviePageLoaded");

/// Emitted when the consuming view tore a list down
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSourceReleased {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub list_type: MovieListType,
    pub pages_dropped: u32,
}

impl MovieSourceReleased {
    pub fn new(list_type: MovieListType, pages_dropped: u32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            list_type,
            pages_dropped,
        }
    }
}

impl_domain_event!(MovieSourceReleased, "MovieSourceReleased");

// ============================================================================
// ACHIEVEMENT EVENTS
// ============================================================================

/// Emitted once per achievement, right after the unlock was persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementUnlocked {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
    pub achievement_id: String,
    pub achievement_name: String,
}

impl AchievementUnlocked {
    pub fn new(user_id: String, achievement_id: String, achievement_name: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            achievement_id,
            achievement_name,
        }
    }
}

impl_domain_event!(AchievementUnlocked, "AchievementUnlocked");

/// Emitted when an activity changed a user's counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecorded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub user_id: String,
    pub activity_kind: String,
}

impl ActivityRecorded {
    pub fn new(user_id: String, activity_kind: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            user_id,
            activity_kind,
        }
    }
}

impl_domain_event!(ActivityRecorded, "ActivityRecorded");
