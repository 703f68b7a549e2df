// src/repositories/achievement_repository.rs

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::achievement::AchievementProgress;
use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
pub trait AchievementRepository: Send + Sync {
    /// Records an unlock. Returns false if it was already recorded; the
    /// original timestamp is kept.
    fn mark_unlocked(
        &self,
        user_id: &str,
        achievement_id: &str,
        unlocked_at: DateTime<Utc>,
    ) -> AppResult<bool>;
    fn get_progress(&self, user_id: &str) -> AppResult<AchievementProgress>;
}

pub struct SqliteAchievementRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteAchievementRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_unlock(row: &Row) -> Result<(String, DateTime<Utc>), rusqlite::Error> {
        let achievement_id: String = row.get("achievement_id")?;
        let unlocked_at_str: String = row.get("unlocked_at")?;
        let unlocked_at = DateTime::parse_from_rfc3339(&unlocked_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        Ok((achievement_id, unlocked_at))
    }
}

impl AchievementRepository for SqliteAchievementRepository {
    fn mark_unlocked(
        &self,
        user_id: &str,
        achievement_id: &str,
        unlocked_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO unlocked_achievements (user_id, achievement_id, unlocked_at)
             VALUES (?1, ?2, ?3)",
            params![user_id, achievement_id, unlocked_at.to_rfc3339()],
        )?;
        Ok(inserted == 1)
    }

    fn get_progress(&self, user_id: &str) -> AppResult<AchievementProgress> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT achievement_id, unlocked_at FROM unlocked_achievements
             WHERE user_id = ?1 ORDER BY unlocked_at",
        )?;

        let unlocks = stmt
            .query_map(params![user_id], Self::row_to_unlock)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut progress = AchievementProgress::default();
        for (achievement_id, unlocked_at) in unlocks {
            progress.record_unlock(&achievement_id, unlocked_at);
        }
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_connection_pool, initialize_database};
    use chrono::Duration;
    use tempfile::TempDir;

    fn repo() -> (TempDir, SqliteAchievementRepository) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_connection_pool(&dir.path().join("achievements.db")).unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        (dir, SqliteAchievementRepository::new(Arc::new(pool)))
    }

    #[test]
    fn test_mark_unlocked_is_monotonic() {
        let (_dir, repo) = repo();
        let first = Utc::now();

        assert!(repo.mark_unlocked("u1", "FIRST_RATING", first).unwrap());
        assert!(!repo
            .mark_unlocked("u1", "FIRST_RATING", first + Duration::days(1))
            .unwrap());

        let progress = repo.get_progress("u1").unwrap();
        assert!(progress.is_unlocked("FIRST_RATING"));
        assert_eq!(
            progress.unlocked_at("FIRST_RATING").map(|d| d.timestamp()),
            Some(first.timestamp())
        );
    }

    #[test]
    fn test_progress_is_per_user() {
        let (_dir, repo) = repo();
        repo.mark_unlocked("u1", "MYLIST_5", Utc::now()).unwrap();
        repo.mark_unlocked("u1", "FIRST_ADD_MYLIST", Utc::now()).unwrap();

        assert_eq!(repo.get_progress("u1").unwrap().unlocked_ids.len(), 2);
        assert!(repo.get_progress("u2").unwrap().unlocked_ids.is_empty());
    }
}
