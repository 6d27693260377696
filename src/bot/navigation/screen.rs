//! Screens of the menu flow and the transitions allowed between them.

use serde::{Deserialize, Serialize};
use super::action::ActionTag;

/// The screen a chat's live message currently shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Screen {
    #[default]
    MainMenu,
    ProgramList,
    ProgramMenu { program_id: i64 },
    AcceptProgram { program_id: i64 },
    WorkoutList { program_id: i64 },
    /// `active` marks the user's next workout, which can be finished from here.
    WorkoutDetails { program_id: i64, workout_id: i64, active: bool },
    WorkoutCompleted { program_id: i64, workout_id: i64 },
    ProgramFinished { program_id: i64 },
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    MainMenu,
    ProgramList,
    ProgramMenu,
    AcceptProgram,
    WorkoutList,
    WorkoutDetails,
    WorkoutCompleted,
    ProgramFinished,
    Error,
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::MainMenu => ScreenKind::MainMenu,
            Screen::ProgramList => ScreenKind::ProgramList,
            Screen::ProgramMenu { .. } => ScreenKind::ProgramMenu,
            Screen::AcceptProgram { .. } => ScreenKind::AcceptProgram,
            Screen::WorkoutList { .. } => ScreenKind::WorkoutList,
            Screen::WorkoutDetails { .. } => ScreenKind::WorkoutDetails,
            Screen::WorkoutCompleted { .. } => ScreenKind::WorkoutCompleted,
            Screen::ProgramFinished { .. } => ScreenKind::ProgramFinished,
            Screen::Error => ScreenKind::Error,
        }
    }

    pub fn program_id(&self) -> Option<i64> {
        match *self {
            Screen::ProgramMenu { program_id }
            | Screen::AcceptProgram { program_id }
            | Screen::WorkoutList { program_id }
            | Screen::WorkoutDetails { program_id, .. }
            | Screen::WorkoutCompleted { program_id, .. }
            | Screen::ProgramFinished { program_id } => Some(program_id),
            Screen::MainMenu | Screen::ProgramList | Screen::Error => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self.kind() {
            ScreenKind::MainMenu => "main_menu",
            ScreenKind::ProgramList => "program_list",
            ScreenKind::ProgramMenu => "program_menu",
            ScreenKind::AcceptProgram => "accept_program",
            ScreenKind::WorkoutList => "workout_list",
            ScreenKind::WorkoutDetails => "workout_details",
            ScreenKind::WorkoutCompleted => "workout_completed",
            ScreenKind::ProgramFinished => "program_finished",
            ScreenKind::Error => "error",
        }
    }
}

/// Reachable from every screen.
const GLOBAL_ACTIONS: &[ActionTag] = &[ActionTag::MainMenu, ActionTag::Running];

const TRANSITIONS: &[(ScreenKind, &[ActionTag])] = &[
    (ScreenKind::MainMenu, &[ActionTag::Strength]),
    (ScreenKind::ProgramList, &[ActionTag::Program]),
    (
        ScreenKind::ProgramMenu,
        &[
            ActionTag::Continue,
            ActionTag::Workouts,
            ActionTag::Enroll,
            ActionTag::End,
            ActionTag::Programs,
        ],
    ),
    (ScreenKind::AcceptProgram, &[ActionTag::StartProgram, ActionTag::Program]),
    (ScreenKind::WorkoutList, &[ActionTag::Workout, ActionTag::Program]),
    (
        ScreenKind::WorkoutDetails,
        &[ActionTag::Finish, ActionTag::Workouts, ActionTag::Program],
    ),
    (ScreenKind::WorkoutCompleted, &[ActionTag::Next, ActionTag::Program]),
    (ScreenKind::ProgramFinished, &[ActionTag::Program, ActionTag::Programs]),
    (ScreenKind::Error, &[]),
];

/// Whether a button with `tag` may be pressed while `from` is shown.
pub fn is_allowed(from: ScreenKind, tag: ActionTag) -> bool {
    if GLOBAL_ACTIONS.contains(&tag) {
        return true;
    }
    TRANSITIONS
        .iter()
        .find(|(kind, _)| *kind == from)
        .is_some_and(|(_, tags)| tags.contains(&tag))
}
