//! Loads training program documents into the database.
//!
//! Seeding is idempotent: a program whose name already exists is reused, and a
//! workout whose number already exists in that program is skipped.

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use crate::database::models::{NewWorkout, TrainingProgram, Workout};
use crate::utils::validation::{validate_program_name, validate_workout_orders, validate_workout_text};

#[derive(Debug, Clone, Deserialize)]
pub struct ProgramDocument {
    #[serde(alias = "program_name")]
    pub name: String,
    #[serde(alias = "program_description", default)]
    pub description: String,
    pub workouts: Vec<WorkoutDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutDocument {
    pub number: i64,
    pub description: String,
    pub plan: String,
    #[serde(alias = "sbu")]
    pub warmup: String,
    #[serde(alias = "final_msg")]
    pub final_message: String,
}

impl ProgramDocument {
    pub fn from_json(raw: &str) -> Result<Self> {
        let document: ProgramDocument = serde_json::from_str(raw)?;
        document.validate()?;
        Ok(document)
    }

    pub fn validate(&self) -> Result<()> {
        validate_program_name(&self.name)?;
        let orders: Vec<i64> = self.workouts.iter().map(|w| w.number).collect();
        validate_workout_orders(&orders)?;
        for workout in &self.workouts {
            validate_workout_text(workout.number, "description", &workout.description)?;
            validate_workout_text(workout.number, "plan", &workout.plan)?;
        }
        Ok(())
    }
}

impl From<&WorkoutDocument> for NewWorkout {
    fn from(doc: &WorkoutDocument) -> Self {
        Self {
            order_index: doc.number,
            description: doc.description.clone(),
            plan: doc.plan.clone(),
            warmup: doc.warmup.clone(),
            completion_message: doc.final_message.clone(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub programs_created: usize,
    pub programs_existing: usize,
    pub workouts_created: usize,
    pub workouts_skipped: usize,
}

impl SeedReport {
    pub fn merge(&mut self, other: SeedReport) {
        self.programs_created += other.programs_created;
        self.programs_existing += other.programs_existing;
        self.workouts_created += other.workouts_created;
        self.workouts_skipped += other.workouts_skipped;
    }
}

pub async fn load_program(pool: &SqlitePool, document: &ProgramDocument) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    let name = document.name.trim();

    let program = match TrainingProgram::find_by_name(pool, name).await? {
        Some(existing) => {
            info!("Program '{}' already exists (id {})", name, existing.id);
            report.programs_existing += 1;
            existing
        }
        None => {
            let created = TrainingProgram::create(pool, name, document.description.trim()).await?;
            info!("Created program '{}' (id {})", name, created.id);
            report.programs_created += 1;
            created
        }
    };

    for workout in &document.workouts {
        if Workout::find_by_program_and_order(pool, program.id, workout.number).await?.is_some() {
            report.workouts_skipped += 1;
            continue;
        }
        Workout::create(pool, program.id, &NewWorkout::from(workout)).await?;
        report.workouts_created += 1;
    }

    info!(
        "Seeded program '{}': {} workouts created, {} already present",
        name, report.workouts_created, report.workouts_skipped
    );
    Ok(report)
}

pub async fn load_file(pool: &SqlitePool, path: &Path) -> Result<SeedReport> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = ProgramDocument::from_json(&raw)
        .with_context(|| format!("Invalid program document {}", path.display()))?;
    load_program(pool, &document).await
}

/// Loads every `*.json` document in `dir`, in file name order.
pub async fn load_dir(pool: &SqlitePool, dir: &Path) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    for path in program_files(dir)? {
        report.merge(load_file(pool, &path).await?);
    }
    Ok(report)
}

pub fn program_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        warn!("Programs directory {} not found", dir.display());
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "program_name": "Run Start",
        "program_description": "From zero to 5 km",
        "workouts": [
            {"number": 1, "description": "Intro", "plan": "Walk 20 min", "sbu": "Leg swings", "final_msg": "Good start!"},
            {"number": 2, "description": "Intervals", "plan": "6x1 min run", "warmup": "Skips", "final_message": "Nice"}
        ]
    }"#;

    #[test]
    fn test_document_accepts_both_key_styles() {
        let document = ProgramDocument::from_json(DOCUMENT).unwrap();
        assert_eq!(document.name, "Run Start");
        assert_eq!(document.workouts.len(), 2);
        assert_eq!(document.workouts[0].warmup, "Leg swings");
        assert_eq!(document.workouts[1].final_message, "Nice");
    }

    #[test]
    fn test_document_rejects_duplicate_numbers() {
        let raw = r#"{"name": "X", "workouts": [
            {"number": 1, "description": "a", "plan": "b", "warmup": "c", "final_message": "d"},
            {"number": 1, "description": "a", "plan": "b", "warmup": "c", "final_message": "d"}
        ]}"#;
        assert!(ProgramDocument::from_json(raw).is_err());
    }

    #[test]
    fn test_report_merge() {
        let mut total = SeedReport::default();
        total.merge(SeedReport { programs_created: 1, programs_existing: 0, workouts_created: 3, workouts_skipped: 0 });
        total.merge(SeedReport { programs_created: 0, programs_existing: 1, workouts_created: 0, workouts_skipped: 3 });
        assert_eq!(total, SeedReport { programs_created: 1, programs_existing: 1, workouts_created: 3, workouts_skipped: 3 });
    }
}
