use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crate::utils::datetime::now_timestamp;

/// Record that a user finished one workout under one enrollment.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Completion {
    pub id: i64,
    pub user_id: i64,
    pub workout_id: i64,
    pub enrollment_id: i64,
    pub finished_at: Option<String>,
}

impl Completion {
    /// Inserts a completion stamped now. The (user, workout, enrollment) triple is
    /// unique, so a repeated call returns the row recorded the first time.
    pub async fn create(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        workout_id: i64,
        enrollment_id: i64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO completions (user_id, workout_id, enrollment_id, finished_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id, workout_id, enrollment_id) DO NOTHING
            "#
        )
        .bind(user_id)
        .bind(workout_id)
        .bind(enrollment_id)
        .bind(now_timestamp())
        .execute(pool)
        .await?;

        sqlx::query_as::<_, Completion>(
            "SELECT id, user_id, workout_id, enrollment_id, finished_at FROM completions WHERE user_id = ? AND workout_id = ? AND enrollment_id = ?"
        )
        .bind(user_id)
        .bind(workout_id)
        .bind(enrollment_id)
        .fetch_one(pool)
        .await
    }

    pub async fn latest_for_enrollment(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        enrollment_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Completion>(
            r#"
            SELECT id, user_id, workout_id, enrollment_id, finished_at
            FROM completions
            WHERE user_id = ? AND enrollment_id = ?
            ORDER BY finished_at DESC, id DESC
            LIMIT 1
            "#
        )
        .bind(user_id)
        .bind(enrollment_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn count_for_enrollment(
        pool: &sqlx::SqlitePool,
        enrollment_id: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM completions WHERE enrollment_id = ?")
            .bind(enrollment_id)
            .fetch_one(pool)
            .await
    }

    /// Ids of the workouts finished under an enrollment.
    pub async fn workout_ids_for_enrollment(
        pool: &sqlx::SqlitePool,
        enrollment_id: i64,
    ) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT workout_id FROM completions WHERE enrollment_id = ? ORDER BY workout_id"
        )
        .bind(enrollment_id)
        .fetch_all(pool)
        .await
    }
}
