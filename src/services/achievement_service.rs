// src/services/achievement_service.rs
//
// Activity tracking and achievement unlocks.
//
// Counter update, evaluation and the unlock writes run under one lock so
// two activities can never unlock the same achievement twice.

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::achievement::{all_definitions, evaluate, validate_activity};
use crate::domain::{Activity, ActivityCounters, DomainError, UnlockedAchievement};
use crate::error::AppResult;
use crate::events::{AchievementUnlocked, ActivityRecorded, EventBus};
use crate::repositories::{AchievementRepository, ActivityRepository};

const HIDDEN_NAME: &str = "Secret achievement";
const HIDDEN_DESCRIPTION: &str = "Keep exploring to reveal this one";

/// One row of the achievements screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementStatus {
    pub id: String,
    pub name: String,
    pub description: String,
    pub secret: bool,
    pub unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
}

pub struct AchievementService {
    activity_repo: Arc<dyn ActivityRepository>,
    achievement_repo: Arc<dyn AchievementRepository>,
    event_bus: Arc<EventBus>,
    unlock_lock: Mutex<()>,
}

impl AchievementService {
    pub fn new(
        activity_repo: Arc<dyn ActivityRepository>,
        achievement_repo: Arc<dyn AchievementRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            activity_repo,
            achievement_repo,
            event_bus,
            unlock_lock: Mutex::new(()),
        }
    }

    /// Applies `activity` to the user's counters and unlocks whatever it earned.
    /// Returns the new unlocks in table order.
    pub fn record_activity(
        &self,
        user_id: &str,
        activity: Activity,
    ) -> AppResult<Vec<UnlockedAchievement>> {
        validate_user_id(user_id)?;
        validate_activity(&activity)?;

        let _guard = self.unlock_lock.lock().unwrap_or_else(PoisonError::into_inner);

        self.activity_repo.apply(user_id, &activity)?;
        debug!("Recorded {} for {}", activity.kind(), user_id);
        self.event_bus.emit(ActivityRecorded::new(
            user_id.to_string(),
            activity.kind().to_string(),
        ));

        self.unlock_earned(user_id)
    }

    /// Re-evaluates the stored counters without new activity.
    pub fn sync_achievements(&self, user_id: &str) -> AppResult<Vec<UnlockedAchievement>> {
        validate_user_id(user_id)?;
        let _guard = self.unlock_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.unlock_earned(user_id)
    }

    pub fn counters(&self, user_id: &str) -> AppResult<ActivityCounters> {
        validate_user_id(user_id)?;
        self.activity_repo.get_counters(user_id)
    }

    /// Every achievement with its lock state. Locked secret ones keep
    /// their name and description hidden.
    pub fn list_achievements(&self, user_id: &str) -> AppResult<Vec<AchievementStatus>> {
        validate_user_id(user_id)?;
        let progress = self.achievement_repo.get_progress(user_id)?;

        let statuses = all_definitions()
            .iter()
            .map(|definition| {
                let unlocked_at = progress.unlocked_at(definition.id);
                let unlocked = progress.is_unlocked(definition.id);
                let hidden = definition.secret && !unlocked;
                AchievementStatus {
                    id: definition.id.to_string(),
                    name: if hidden { HIDDEN_NAME } else { definition.name }.to_string(),
                    description: if hidden {
                        HIDDEN_DESCRIPTION
                    } else {
                        definition.description
                    }
                    .to_string(),
                    secret: definition.secret,
                    unlocked,
                    unlocked_at,
                }
            })
            .collect();

        Ok(statuses)
    }

    fn unlock_earned(&self, user_id: &str) -> AppResult<Vec<UnlockedAchievement>> {
        let counters = self.activity_repo.get_counters(user_id)?;
        let progress = self.achievement_repo.get_progress(user_id)?;
        let earned = evaluate(&counters, &progress.unlocked_ids);
        if earned.is_empty() {
            return Ok(Vec::new());
        }

        let unlocked_at = Utc::now();
        let mut unlocked = Vec::with_capacity(earned.len());

        for definition in all_definitions().iter().filter(|d| earned.contains(d.id)) {
            if !self
                .achievement_repo
                .mark_unlocked(user_id, definition.id, unlocked_at)?
            {
                continue;
            }
            info!("{} unlocked {}", user_id, definition.id);
            unlocked.push(UnlockedAchievement {
                id: definition.id.to_string(),
                name: definition.name.to_string(),
                description: definition.description.to_string(),
                unlocked_at,
            });
        }

        for achievement in &unlocked {
            self.event_bus.emit(AchievementUnlocked::new(
                user_id.to_string(),
                achievement.id.clone(),
                achievement.name.clone(),
            ));
        }

        Ok(unlocked)
    }
}

fn validate_user_id(user_id: &str) -> Result<(), DomainError> {
    if user_id.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "User id cannot be empty".to_string(),
        ));
    }
    Ok(())
}
