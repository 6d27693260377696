//! Button actions and their callback-data encoding.
//!
//! Callback data has the form `tag[_id...]`: trailing integer segments are
//! entity ids, the remaining segments joined by `_` name the action.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionTag {
    MainMenu,
    Running,
    Strength,
    Programs,
    Program,
    Continue,
    Workouts,
    Enroll,
    End,
    StartProgram,
    Workout,
    Finish,
    Next,
}

impl ActionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionTag::MainMenu => "main_menu",
            ActionTag::Running => "running",
            ActionTag::Strength => "strength",
            ActionTag::Programs => "programs",
            ActionTag::Program => "program",
            ActionTag::Continue => "continue",
            ActionTag::Workouts => "workouts",
            ActionTag::Enroll => "enroll",
            ActionTag::End => "end",
            ActionTag::StartProgram => "start",
            ActionTag::Workout => "workout",
            ActionTag::Finish => "finish",
            ActionTag::Next => "next",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MainMenu,
    Running,
    Strength,
    Programs,
    Program { program_id: i64 },
    Continue { program_id: i64 },
    Workouts { program_id: i64 },
    Enroll { program_id: i64 },
    End { program_id: i64 },
    StartProgram { program_id: i64 },
    Workout { workout_id: i64 },
    Finish { program_id: i64, workout_id: i64 },
    Next { program_id: i64 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseActionError {
    #[error("empty callback data")]
    Empty,
    #[error("unknown action '{0}'")]
    UnknownTag(String),
    #[error("action '{tag}' expects {expected} id(s), got {got}")]
    WrongArity { tag: String, expected: usize, got: usize },
}

impl Action {
    pub fn tag(&self) -> ActionTag {
        match self {
            Action::MainMenu => ActionTag::MainMenu,
            Action::Running => ActionTag::Running,
            Action::Strength => ActionTag::Strength,
            Action::Programs => ActionTag::Programs,
            Action::Program { .. } => ActionTag::Program,
            Action::Continue { .. } => ActionTag::Continue,
            Action::Workouts { .. } => ActionTag::Workouts,
            Action::Enroll { .. } => ActionTag::Enroll,
            Action::End { .. } => ActionTag::End,
            Action::StartProgram { .. } => ActionTag::StartProgram,
            Action::Workout { .. } => ActionTag::Workout,
            Action::Finish { .. } => ActionTag::Finish,
            Action::Next { .. } => ActionTag::Next,
        }
    }

    fn ids(&self) -> Vec<i64> {
        match *self {
            Action::MainMenu | Action::Running | Action::Strength | Action::Programs => Vec::new(),
            Action::Program { program_id }
            | Action::Continue { program_id }
            | Action::Workouts { program_id }
            | Action::Enroll { program_id }
            | Action::End { program_id }
            | Action::StartProgram { program_id }
            | Action::Next { program_id } => vec![program_id],
            Action::Workout { workout_id } => vec![workout_id],
            Action::Finish { program_id, workout_id } => vec![program_id, workout_id],
        }
    }

    pub fn callback_data(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag().as_str())?;
        for id in self.ids() {
            write!(f, "_{id}")?;
        }
        Ok(())
    }
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let data = data.trim();
        if data.is_empty() {
            return Err(ParseActionError::Empty);
        }

        let mut segments: Vec<&str> = data.split('_').collect();
        let mut ids = Vec::new();
        while segments.len() > 1 {
            match segments.last().and_then(|s| s.parse::<i64>().ok()) {
                Some(id) => {
                    ids.push(id);
                    segments.pop();
                }
                None => break,
            }
        }
        ids.reverse();
        let tag = segments.join("_");

        let arity = |expected: usize| ParseActionError::WrongArity {
            tag: tag.clone(),
            expected,
            got: ids.len(),
        };

        let action = match (tag.as_str(), ids.as_slice()) {
            ("main_menu", []) => Action::MainMenu,
            ("running", []) => Action::Running,
            ("strength", []) => Action::Strength,
            ("programs", []) => Action::Programs,
            ("program", [program_id]) => Action::Program { program_id: *program_id },
            ("continue", [program_id]) => Action::Continue { program_id: *program_id },
            ("workouts", [program_id]) => Action::Workouts { program_id: *program_id },
            ("enroll", [program_id]) => Action::Enroll { program_id: *program_id },
            ("end", [program_id]) => Action::End { program_id: *program_id },
            ("start", [program_id]) => Action::StartProgram { program_id: *program_id },
            ("workout", [workout_id]) => Action::Workout { workout_id: *workout_id },
            ("finish", [program_id, workout_id]) => Action::Finish {
                program_id: *program_id,
                workout_id: *workout_id,
            },
            ("next", [program_id]) => Action::Next { program_id: *program_id },
            ("main_menu" | "running" | "strength" | "programs", _) => return Err(arity(0)),
            ("program" | "continue" | "workouts" | "enroll" | "end" | "start" | "workout" | "next", _) => {
                return Err(arity(1))
            }
            ("finish", _) => return Err(arity(2)),
            _ => return Err(ParseActionError::UnknownTag(tag.clone())),
        };

        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_tags() {
        assert_eq!("main_menu".parse::<Action>(), Ok(Action::MainMenu));
        assert_eq!("running".parse::<Action>(), Ok(Action::Running));
        assert_eq!("programs".parse::<Action>(), Ok(Action::Programs));
    }

    #[test]
    fn test_parse_trailing_ids() {
        assert_eq!("program_3".parse::<Action>(), Ok(Action::Program { program_id: 3 }));
        assert_eq!("workout_42".parse::<Action>(), Ok(Action::Workout { workout_id: 42 }));
        assert_eq!(
            "finish_3_12".parse::<Action>(),
            Ok(Action::Finish { program_id: 3, workout_id: 12 })
        );
    }

    #[test]
    fn test_callback_data_matches_parser() {
        let actions = [
            Action::MainMenu,
            Action::Enroll { program_id: 7 },
            Action::Finish { program_id: 7, workout_id: 70 },
        ];
        for action in actions {
            assert_eq!(action.callback_data().parse::<Action>(), Ok(action));
        }
        assert_eq!(Action::Finish { program_id: 1, workout_id: 2 }.callback_data(), "finish_1_2");
    }

    #[test]
    fn test_parse_rejects_bad_data() {
        assert_eq!("".parse::<Action>(), Err(ParseActionError::Empty));
        assert!(matches!("settings_1".parse::<Action>(), Err(ParseActionError::UnknownTag(t)) if t == "settings"));
        assert!(matches!(
            "finish_3".parse::<Action>(),
            Err(ParseActionError::WrongArity { expected: 2, got: 1, .. })
        ));
        assert!(matches!(
            "program".parse::<Action>(),
            Err(ParseActionError::WrongArity { expected: 1, got: 0, .. })
        ));
        assert!(matches!(
            "main_menu_5".parse::<Action>(),
            Err(ParseActionError::WrongArity { expected: 0, got: 1, .. })
        ));
    }

    #[test]
    fn test_numeric_only_data_is_unknown() {
        // A lone number is kept as the tag rather than an id
        assert!(matches!("42".parse::<Action>(), Err(ParseActionError::UnknownTag(t)) if t == "42"));
    }
}
