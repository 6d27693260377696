use anyhow::{anyhow, Result};
use std::collections::HashSet;

pub fn validate_program_name(name: &str) -> Result<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("Program name cannot be empty"));
    }

    if name.chars().count() > 100 {
        return Err(anyhow!("Program name cannot be longer than 100 characters"));
    }

    if name.contains('\n') || name.contains('\r') {
        return Err(anyhow!("Program name cannot contain line breaks"));
    }

    Ok(())
}

/// Workout numbers must be positive and unique within a program.
pub fn validate_workout_orders(orders: &[i64]) -> Result<()> {
    if orders.is_empty() {
        return Err(anyhow!("Program must contain at least one workout"));
    }

    let mut seen = HashSet::new();
    for &order in orders {
        if order < 1 {
            return Err(anyhow!("Workout number {} must be 1 or greater", order));
        }
        if !seen.insert(order) {
            return Err(anyhow!("Workout number {} appears more than once", order));
        }
    }

    Ok(())
}

pub fn validate_workout_text(order: i64, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("Workout {} has an empty {}", order, field));
    }

    // Telegram rejects messages above 4096 characters
    if value.chars().count() > 3000 {
        return Err(anyhow!("Workout {} {} is too long (max 3000 characters)", order, field));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_program_name() {
        assert!(validate_program_name("Run Start").is_ok());
        assert!(validate_program_name("  Бег для здоровья  ").is_ok());
        assert!(validate_program_name("").is_err());
        assert!(validate_program_name("   ").is_err());
        assert!(validate_program_name("Two\nLines").is_err());
        assert!(validate_program_name(&"a".repeat(101)).is_err());
        assert!(validate_program_name(&"a".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_workout_orders() {
        assert!(validate_workout_orders(&[1, 2, 3]).is_ok());
        assert!(validate_workout_orders(&[3, 1, 2]).is_ok());
        assert!(validate_workout_orders(&[1, 3]).is_ok());
        assert!(validate_workout_orders(&[]).is_err());
        assert!(validate_workout_orders(&[0, 1]).is_err());
        assert!(validate_workout_orders(&[1, 2, 2]).is_err());
    }

    #[test]
    fn test_validate_workout_text() {
        assert!(validate_workout_text(1, "plan", "5 km easy").is_ok());
        assert!(validate_workout_text(1, "plan", " ").is_err());
        assert!(validate_workout_text(1, "plan", &"x".repeat(3001)).is_err());
    }
}
