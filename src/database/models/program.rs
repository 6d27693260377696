use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crate::utils::datetime::now_timestamp;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TrainingProgram {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    pub program_id: i64,
    pub order_index: i64,
    pub description: String,
    pub plan: String,
    pub warmup: String,
    pub completion_message: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Content of a workout as loaded from a program document.
#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub order_index: i64,
    pub description: String,
    pub plan: String,
    pub warmup: String,
    pub completion_message: String,
}

const PROGRAM_COLUMNS: &str = "id, name, description, created_at, updated_at";
const WORKOUT_COLUMNS: &str =
    "id, program_id, order_index, description, plan, warmup, completion_message, created_at, updated_at";

impl TrainingProgram {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        name: &str,
        description: &str,
    ) -> Result<Self, sqlx::Error> {
        let now = now_timestamp();

        let id = sqlx::query(
            "INSERT INTO training_programs (name, description, created_at, updated_at) VALUES (?, ?, ?, ?)"
        )
        .bind(name)
        .bind(description)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?
        .last_insert_rowid();

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        program_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TrainingProgram>(
            &format!("SELECT {PROGRAM_COLUMNS} FROM training_programs WHERE id = ?")
        )
        .bind(program_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_name(
        pool: &sqlx::SqlitePool,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TrainingProgram>(
            &format!("SELECT {PROGRAM_COLUMNS} FROM training_programs WHERE name = ?")
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// All programs in insertion order.
    pub async fn find_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TrainingProgram>(
            &format!("SELECT {PROGRAM_COLUMNS} FROM training_programs ORDER BY id")
        )
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM training_programs")
            .fetch_one(pool)
            .await
    }
}

impl Workout {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        program_id: i64,
        workout: &NewWorkout,
    ) -> Result<Self, sqlx::Error> {
        let now = now_timestamp();

        let id = sqlx::query(
            r#"
            INSERT INTO workouts (program_id, order_index, description, plan, warmup, completion_message, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(program_id)
        .bind(workout.order_index)
        .bind(&workout.description)
        .bind(&workout.plan)
        .bind(&workout.warmup)
        .bind(&workout.completion_message)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?
        .last_insert_rowid();

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        workout_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Workout>(
            &format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ?")
        )
        .bind(workout_id)
        .fetch_optional(pool)
        .await
    }

    /// Workouts of a program, ordered by their position in the sequence.
    pub async fn find_by_program(
        pool: &sqlx::SqlitePool,
        program_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Workout>(
            &format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE program_id = ? ORDER BY order_index ASC")
        )
        .bind(program_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_program_and_order(
        pool: &sqlx::SqlitePool,
        program_id: i64,
        order_index: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Workout>(
            &format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE program_id = ? AND order_index = ?")
        )
        .bind(program_id)
        .bind(order_index)
        .fetch_optional(pool)
        .await
    }

    /// The workout following `after_order` in the program, if any.
    pub async fn find_next(
        pool: &sqlx::SqlitePool,
        program_id: i64,
        after_order: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Workout>(
            &format!(
                "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE program_id = ? AND order_index > ? ORDER BY order_index ASC LIMIT 1"
            )
        )
        .bind(program_id)
        .bind(after_order)
        .fetch_optional(pool)
        .await
    }

    pub async fn count_for_program(
        pool: &sqlx::SqlitePool,
        program_id: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM workouts WHERE program_id = ?")
            .bind(program_id)
            .fetch_one(pool)
            .await
    }
}
