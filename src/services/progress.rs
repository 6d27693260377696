//! Progress tracking over enrollments and completions.
//!
//! The user's position inside a program is never stored: it is derived from the
//! most recent completion of the active enrollment.

use sqlx::SqlitePool;
use thiserror::Error;
use crate::database::models::*;
use crate::utils::logging::log_database_operation;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("user {user_id} already has an active program ({active_program_id})")]
    AlreadyEnrolled { user_id: i64, active_program_id: i64 },

    #[error("user {user_id} has no active enrollment in program {program_id}")]
    NotEnrolled { user_id: i64, program_id: i64 },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ProgressError {
    /// A rule about enrollment state was broken; nothing was written.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::AlreadyEnrolled { .. } | Self::NotEnrolled { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type ProgressResult<T> = Result<T, ProgressError>;

/// Outcome of resolving a user's next workout.
#[derive(Debug, Clone)]
pub enum NextWorkout {
    NoActiveProgram,
    Ready { enrollment: Enrollment, workout: Workout },
    /// Every workout of the active program has been completed.
    ProgramComplete { enrollment: Enrollment },
}

/// Snapshot used by the `/progress` command.
#[derive(Debug, Clone)]
pub struct ProgressSummary {
    pub program: TrainingProgram,
    pub enrollment: Enrollment,
    pub completed: i64,
    pub total: i64,
}

#[derive(Clone)]
pub struct ProgressService {
    pool: SqlitePool,
}

impl ProgressService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn active_enrollment(&self, user_id: i64) -> ProgressResult<Option<Enrollment>> {
        Ok(Enrollment::find_active_for_user(&self.pool, user_id).await?)
    }

    pub async fn last_completed_workout(
        &self,
        user_id: i64,
        enrollment_id: i64,
    ) -> ProgressResult<Option<Completion>> {
        Ok(Completion::latest_for_enrollment(&self.pool, user_id, enrollment_id).await?)
    }

    pub async fn next_workout(&self, user_id: i64) -> ProgressResult<NextWorkout> {
        let Some(enrollment) = self.active_enrollment(user_id).await? else {
            return Ok(NextWorkout::NoActiveProgram);
        };

        let last_order = match self.last_completed_workout(user_id, enrollment.id).await? {
            Some(completion) => {
                Workout::find_by_id(&self.pool, completion.workout_id)
                    .await?
                    .ok_or(ProgressError::NotFound { entity: "workout", id: completion.workout_id })?
                    .order_index
            }
            None => 0,
        };

        match Workout::find_next(&self.pool, enrollment.program_id, last_order).await? {
            Some(workout) => Ok(NextWorkout::Ready { enrollment, workout }),
            None => Ok(NextWorkout::ProgramComplete { enrollment }),
        }
    }

    pub async fn register(&self, user_id: i64, program_id: i64) -> ProgressResult<Enrollment> {
        if let Some(active) = self.active_enrollment(user_id).await? {
            return Err(ProgressError::AlreadyEnrolled {
                user_id,
                active_program_id: active.program_id,
            });
        }

        if TrainingProgram::find_by_id(&self.pool, program_id).await?.is_none() {
            return Err(ProgressError::NotFound { entity: "program", id: program_id });
        }

        match Enrollment::create(&self.pool, user_id, program_id).await {
            Ok(enrollment) => {
                log_database_operation("INSERT", "enrollments", Some(&format!("user {user_id} program {program_id}")));
                Ok(enrollment)
            }
            // A concurrent registration won the race for the one-active index
            Err(e) if is_unique_violation(&e) => {
                let active_program_id = self
                    .active_enrollment(user_id)
                    .await?
                    .map(|e| e.program_id)
                    .unwrap_or(program_id);
                Err(ProgressError::AlreadyEnrolled { user_id, active_program_id })
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn end(&self, user_id: i64, program_id: i64) -> ProgressResult<Enrollment> {
        let enrollment = Enrollment::find_active_for_program(&self.pool, user_id, program_id)
            .await?
            .ok_or(ProgressError::NotEnrolled { user_id, program_id })?;

        if !Enrollment::close(&self.pool, enrollment.id).await? {
            return Err(ProgressError::NotEnrolled { user_id, program_id });
        }
        log_database_operation("UPDATE", "enrollments", Some(&format!("closed {}", enrollment.id)));

        Enrollment::find_by_id(&self.pool, enrollment.id)
            .await?
            .ok_or(ProgressError::NotFound { entity: "enrollment", id: enrollment.id })
    }

    pub async fn record_completion(
        &self,
        user_id: i64,
        workout_id: i64,
        enrollment_id: i64,
    ) -> ProgressResult<Completion> {
        let completion = Completion::create(&self.pool, user_id, workout_id, enrollment_id).await?;
        log_database_operation(
            "INSERT",
            "completions",
            Some(&format!("user {user_id} workout {workout_id} enrollment {enrollment_id}")),
        );
        Ok(completion)
    }

    pub async fn progress_summary(&self, user_id: i64) -> ProgressResult<Option<ProgressSummary>> {
        let Some(enrollment) = self.active_enrollment(user_id).await? else {
            return Ok(None);
        };

        let program = TrainingProgram::find_by_id(&self.pool, enrollment.program_id)
            .await?
            .ok_or(ProgressError::NotFound { entity: "program", id: enrollment.program_id })?;
        let completed = Completion::count_for_enrollment(&self.pool, enrollment.id).await?;
        let total = Workout::count_for_program(&self.pool, program.id).await?;

        Ok(Some(ProgressSummary { program, enrollment, completed, total }))
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.message().contains("UNIQUE constraint failed"),
        _ => false,
    }
}
