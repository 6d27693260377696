//! MarkdownV2 text and inline keyboards for each screen.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use crate::database::models::{TrainingProgram, Workout};
use crate::utils::markdown::{bold, escape_markdown};
use super::action::Action;

/// A rendered screen, ready to be sent or edited into the live message.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub text: String,
    pub keyboard: InlineKeyboardMarkup,
}

impl View {
    fn new(text: String, rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self {
            text,
            keyboard: InlineKeyboardMarkup::new(rows),
        }
    }

    /// Callback data of every button, row by row.
    pub fn callback_data(&self) -> Vec<String> {
        use teloxide::types::InlineKeyboardButtonKind;

        self.keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|button| match &button.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }
}

fn button(label: &str, action: Action) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label.to_string(), action.callback_data())
}

fn main_menu_row() -> Vec<InlineKeyboardButton> {
    vec![button("👑 Main menu", Action::MainMenu)]
}

/// Training type choices shown under the main menu and the `/start` greeting.
pub fn main_keyboard() -> Vec<Vec<InlineKeyboardButton>> {
    vec![
        vec![
            button("🏃 Running", Action::Running),
            button("💪 Strength", Action::Strength),
        ],
        main_menu_row(),
    ]
}

pub fn main_menu(greeting_name: Option<&str>) -> View {
    let text = match greeting_name {
        Some(name) => format!(
            "👋 Hi, {}\\! I will guide you through your training programs\\.\n\nChoose a training type:",
            bold(name)
        ),
        None => format!("{}\n\nChoose a training type:", bold("Main menu")),
    };
    View::new(text, main_keyboard())
}

pub fn program_list(programs: &[TrainingProgram], active_program_id: Option<i64>) -> View {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = programs
        .iter()
        .map(|program| {
            let label = if Some(program.id) == active_program_id {
                format!("⭐ {}", program.name)
            } else {
                program.name.clone()
            };
            vec![button(&label, Action::Program { program_id: program.id })]
        })
        .collect();
    rows.push(vec![button("⬅️ Back", Action::MainMenu)]);

    let text = if programs.is_empty() {
        "No training programs are available yet\\.".to_string()
    } else if active_program_id.is_some() {
        "Choose a training program\\.\n⭐ marks your active program\\.".to_string()
    } else {
        "Choose a training program:".to_string()
    };
    View::new(text, rows)
}

/// `active` is true when this program is the user's active enrollment.
pub fn program_menu(program: &TrainingProgram, workout_count: i64, active: bool) -> View {
    let mut text = format!(
        "{}\n\n{}\n\nWorkouts: {}",
        bold(&program.name),
        escape_markdown(&program.description),
        workout_count
    );

    let program_id = program.id;
    let mut rows = Vec::new();
    if active {
        text.push_str("\n\n✅ This is your active program\\.");
        rows.push(vec![button("▶️ Continue", Action::Continue { program_id })]);
        rows.push(vec![button("📋 Workouts", Action::Workouts { program_id })]);
        rows.push(vec![button("⏹ End program", Action::End { program_id })]);
    } else {
        rows.push(vec![button("✍️ Enroll", Action::Enroll { program_id })]);
        rows.push(vec![button("📋 Workouts", Action::Workouts { program_id })]);
    }
    rows.push(vec![button("⬅️ Programs", Action::Programs)]);
    rows.push(main_menu_row());
    View::new(text, rows)
}

pub fn accept_program(program: &TrainingProgram) -> View {
    let text = format!(
        "🎉 You are enrolled in {}\\!\n\nReady for the first workout?",
        bold(&program.name)
    );
    View::new(
        text,
        vec![
            vec![button("🚀 Start", Action::StartProgram { program_id: program.id })],
            vec![button("⬅️ Back", Action::Program { program_id: program.id })],
        ],
    )
}

/// `completed` holds ids of workouts already finished in the active enrollment.
pub fn workout_list(program: &TrainingProgram, workouts: &[Workout], completed: &[i64]) -> View {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = workouts
        .iter()
        .map(|workout| {
            let mark = if completed.contains(&workout.id) { "✅ " } else { "" };
            let label = format!("{}Workout {}", mark, workout.order_index);
            vec![button(&label, Action::Workout { workout_id: workout.id })]
        })
        .collect();
    rows.push(vec![button("⬅️ Back", Action::Program { program_id: program.id })]);

    let text = if workouts.is_empty() {
        format!("{}\n\nThis program has no workouts yet\\.", bold(&program.name))
    } else {
        format!("{}\n\nChoose a workout:", bold(&program.name))
    };
    View::new(text, rows)
}

pub fn workout_details(program: &TrainingProgram, workout: &Workout, active: bool) -> View {
    let text = format!(
        "{}\n{}\n\n🎯 {}\n{}\n\n🔥 {}\n{}\n\n🏃 {}\n{}",
        bold(&program.name),
        bold(&format!("Workout {}", workout.order_index)),
        bold("Description:"),
        escape_markdown(&workout.description),
        bold("Warm-up:"),
        escape_markdown(&workout.warmup),
        bold("Plan:"),
        escape_markdown(&workout.plan),
    );

    let rows = if active {
        vec![
            vec![button(
                "🏁 Finish workout",
                Action::Finish { program_id: program.id, workout_id: workout.id },
            )],
            vec![button("⬅️ Program", Action::Program { program_id: program.id })],
        ]
    } else {
        vec![
            vec![button("⬅️ Workouts", Action::Workouts { program_id: program.id })],
            vec![button("⬅️ Program", Action::Program { program_id: program.id })],
            main_menu_row(),
        ]
    };
    View::new(text, rows)
}

pub fn workout_completed(program: &TrainingProgram, workout: &Workout) -> View {
    let mut text = format!("🎉 {}", bold(&format!("Workout {} finished!", workout.order_index)));
    if !workout.completion_message.trim().is_empty() {
        text.push_str("\n\n");
        text.push_str(&escape_markdown(&workout.completion_message));
    }
    View::new(
        text,
        vec![
            vec![button("➡️ Next workout", Action::Next { program_id: program.id })],
            vec![button("⬅️ Program", Action::Program { program_id: program.id })],
        ],
    )
}

pub fn program_finished(program: &TrainingProgram) -> View {
    let text = format!(
        "🏆 You completed every workout of {}\\!\n\nEnd the program from its menu to pick a new one\\.",
        bold(&program.name)
    );
    View::new(
        text,
        vec![
            vec![button("⬅️ Program", Action::Program { program_id: program.id })],
            vec![button("📚 Programs", Action::Programs)],
        ],
    )
}

pub fn not_found(entity: &str) -> View {
    let text = format!(
        "😕 {} not found\\. Please try again\\.",
        escape_markdown(&capitalize(entity))
    );
    View::new(text, vec![main_menu_row()])
}

pub fn apology() -> View {
    View::new(
        "😔 Sorry, something went wrong\\. Please try again from the main menu\\.".to_string(),
        vec![main_menu_row()],
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
