use std::collections::HashSet;

use super::entity::AchievementDefinition;
use crate::domain::{DomainError, DomainResult};

/// Validates the achievement table
pub fn validate_definitions(definitions: &[AchievementDefinition]) -> DomainResult<()> {
    let mut seen = HashSet::new();
    for definition in definitions {
        if definition.id.trim().is_empty() {
            return Err(DomainError::InvariantViolation(
                "Achievement id cannot be empty".to_string(),
            ));
        }
        if !seen.insert(definition.id) {
            return Err(DomainError::InvariantViolation(format!(
                "Duplicate achievement id: {}",
                definition.id
            )));
        }
        // An achievement without requirements would unlock for everyone
        if definition.requirements.is_empty() {
            return Err(DomainError::InvariantViolation(format!(
                "Achievement {} has no requirements",
                definition.id
            )));
        }
    }
    Ok(())
}

/// Invariants that must hold for achievements:
///
/// 1. Ids are unique
/// 2. Every achievement has at least one requirement
/// 3. Unlocks are monotonic: once unlocked, never re-locked
/// 4. Definitions never change during the process lifetime
