// src/repositories/activity_repository.rs
//
// Activity counter persistence

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::achievement::{Activity, ActivityCounters};
use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
pub trait ActivityRepository: Send + Sync {
    /// Current counters; an unknown user has all counters at zero.
    fn get_counters(&self, user_id: &str) -> AppResult<ActivityCounters>;
    /// Applies one activity atomically.
    fn apply(&self, user_id: &str, activity: &Activity) -> AppResult<()>;
}

pub struct SqliteActivityRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteActivityRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl ActivityRepository for SqliteActivityRepository {
    fn get_counters(&self, user_id: &str) -> AppResult<ActivityCounters> {
        let conn = self.pool.get()?;

        let base = conn
            .query_row(
                "SELECT my_list_count, ratings_count, reviews_count, search_filter_uses_count,
                        trivia_longest_streak, trivia_total_score
                 FROM activity_counters WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(ActivityCounters {
                        my_list_count: row.get::<_, i64>(0)? as u64,
                        ratings_count: row.get::<_, i64>(1)? as u64,
                        reviews_count: row.get::<_, i64>(2)? as u64,
                        search_filter_uses_count: row.get::<_, i64>(3)? as u64,
                        trivia_longest_streak: row.get::<_, i64>(4)? as u64,
                        trivia_total_score: row.get::<_, i64>(5)? as u64,
                        ..Default::default()
                    })
                },
            )
            .optional()?;

        let Some(mut counters) = base else {
            return Ok(ActivityCounters::default());
        };

        let top_genre: i64 = conn.query_row(
            "SELECT COALESCE(MAX(review_count), 0) FROM genre_reviews WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        let decades: i64 = conn.query_row(
            "SELECT COUNT(*) FROM searched_decades WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;

        counters.reviews_by_genre_count = top_genre as u64;
        counters.decades_searched_count = decades as u64;
        Ok(counters)
    }

    fn apply(&self, user_id: &str, activity: &Activity) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();

        tx.execute(
            "INSERT OR IGNORE INTO activity_counters (user_id, updated_at) VALUES (?1, ?2)",
            params![user_id, now],
        )?;

        match activity {
            Activity::AddedToMyList => {
                tx.execute(
                    "UPDATE activity_counters
                     SET my_list_count = my_list_count + 1, updated_at = ?2
                     WHERE user_id = ?1",
                    params![user_id, now],
                )?;
            }
            Activity::RemovedFromMyList => {
                tx.execute(
                    "UPDATE activity_counters
                     SET my_list_count = MAX(my_list_count - 1, 0), updated_at = ?2
                     WHERE user_id = ?1",
                    params![user_id, now],
                )?;
            }
            Activity::Rated => {
                tx.execute(
                    "UPDATE activity_counters
                     SET ratings_count = ratings_count + 1, updated_at = ?2
                     WHERE user_id = ?1",
                    params![user_id, now],
                )?;
            }
            Activity::Reviewed { genre_ids } => {
                tx.execute(
                    "UPDATE activity_counters
                     SET reviews_count = reviews_count + 1, updated_at = ?2
                     WHERE user_id = ?1",
                    params![user_id, now],
                )?;
                let distinct: BTreeSet<u32> = genre_ids.iter().copied().collect();
                for genre_id in distinct {
                    tx.execute(
                        "INSERT INTO genre_reviews (user_id, genre_id, review_count)
                         VALUES (?1, ?2, 1)
                         ON CONFLICT(user_id, genre_id) DO UPDATE SET review_count = review_count + 1",
                        params![user_id, genre_id],
                    )?;
                }
            }
            Activity::SearchFilterUsed => {
                tx.execute(
                    "UPDATE activity_counters
                     SET search_filter_uses_count = search_filter_uses_count + 1, updated_at = ?2
                     WHERE user_id = ?1",
                    params![user_id, now],
                )?;
            }
            Activity::DecadeSearched { decade } => {
                tx.execute(
                    "INSERT OR IGNORE INTO searched_decades (user_id, decade, first_seen_at)
                     VALUES (?1, ?2, ?3)",
                    params![user_id, decade, now],
                )?;
            }
            Activity::TriviaAnswered { correct: true, points } => {
                // RHS expressions see the pre-update row
                tx.execute(
                    "UPDATE activity_counters
                     SET trivia_current_streak = trivia_current_streak + 1,
                         trivia_longest_streak = MAX(trivia_longest_streak, trivia_current_streak + 1),
                         trivia_total_score = trivia_total_score + ?3,
                         updated_at = ?2
                     WHERE user_id = ?1",
                    params![user_id, now, points],
                )?;
            }
            Activity::TriviaAnswered { correct: false, .. } => {
                tx.execute(
                    "UPDATE activity_counters
                     SET trivia_current_streak = 0, updated_at = ?2
                     WHERE user_id = ?1",
                    params![user_id, now],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}
