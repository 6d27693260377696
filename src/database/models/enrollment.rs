use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crate::utils::datetime::now_timestamp;

/// A user's registration in one training program. Active while `end_date` is null.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub user_id: i64,
    pub program_id: i64,
    pub start_date: String,
    pub end_date: Option<String>,
}

impl Enrollment {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        program_id: i64,
    ) -> Result<Self, sqlx::Error> {
        let start_date = now_timestamp();

        let id = sqlx::query(
            "INSERT INTO enrollments (user_id, program_id, start_date, end_date) VALUES (?, ?, ?, NULL)"
        )
        .bind(user_id)
        .bind(program_id)
        .bind(&start_date)
        .execute(pool)
        .await?
        .last_insert_rowid();

        Ok(Enrollment {
            id,
            user_id,
            program_id,
            start_date,
            end_date: None,
        })
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        enrollment_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Enrollment>(
            "SELECT id, user_id, program_id, start_date, end_date FROM enrollments WHERE id = ?"
        )
        .bind(enrollment_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_active_for_user(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Enrollment>(
            "SELECT id, user_id, program_id, start_date, end_date FROM enrollments WHERE user_id = ? AND end_date IS NULL ORDER BY id DESC LIMIT 1"
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_active_for_program(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        program_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Enrollment>(
            "SELECT id, user_id, program_id, start_date, end_date FROM enrollments WHERE user_id = ? AND program_id = ? AND end_date IS NULL ORDER BY id DESC LIMIT 1"
        )
        .bind(user_id)
        .bind(program_id)
        .fetch_optional(pool)
        .await
    }

    /// Stamps the end date. Returns false when the enrollment was already closed.
    pub async fn close(
        pool: &sqlx::SqlitePool,
        enrollment_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE enrollments SET end_date = ? WHERE id = ? AND end_date IS NULL"
        )
        .bind(now_timestamp())
        .bind(enrollment_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
