//! Executes button actions against progress state and picks the next screen.

use thiserror::Error;
use tracing::{debug, warn};
use crate::database::models::{Completion, TrainingProgram, User, UserProfile, Workout};
use crate::services::progress::{NextWorkout, ProgressError, ProgressService};
use super::action::Action;
use super::screen::{is_allowed, Screen};
use super::view::{self, View};

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error(transparent)]
    Progress(#[from] ProgressError),

    #[error("telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("session storage failed: {0}")]
    Session(Box<dyn std::error::Error + Send + Sync>),
}

impl From<sqlx::Error> for NavigationError {
    fn from(error: sqlx::Error) -> Self {
        Self::Progress(ProgressError::Database(error))
    }
}

/// The next screen together with its rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub screen: Screen,
    pub view: View,
}

/// Short text shown on the tapped button; `alert` asks for a modal popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub alert: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// `None` leaves the live message and the screen untouched.
    pub transition: Option<Transition>,
    pub notice: Option<Notice>,
}

impl Outcome {
    fn show(transition: Transition) -> Self {
        Self { transition: Some(transition), notice: None }
    }

    fn notice(text: impl Into<String>, alert: bool) -> Self {
        Self {
            transition: None,
            notice: Some(Notice { text: text.into(), alert }),
        }
    }

    fn with_toast(mut self, text: impl Into<String>) -> Self {
        self.notice = Some(Notice { text: text.into(), alert: false });
        self
    }
}

pub const STALE_BUTTON: &str = "This menu is outdated, here is the current one.";
pub const STRENGTH_COMING_SOON: &str = "💪 Strength programs are coming soon!";

#[derive(Clone)]
pub struct Navigator {
    progress: ProgressService,
}

impl Navigator {
    pub fn new(progress: ProgressService) -> Self {
        Self { progress }
    }

    pub fn progress(&self) -> &ProgressService {
        &self.progress
    }

    /// Applies `action` pressed by `user` while `current` is shown.
    ///
    /// Missing entities become the error screen and broken enrollment rules
    /// become an alert. Any other failure is returned to the caller.
    pub async fn handle(
        &self,
        user: &UserProfile,
        current: &Screen,
        action: Action,
    ) -> Result<Outcome, NavigationError> {
        let tag = action.tag();

        if !is_allowed(current.kind(), tag) || !finishes_shown_workout(current, action) {
            debug!("Stale '{}' button pressed on {}", tag.as_str(), current.name());
            return self.recover(user.id, current).await;
        }

        match self.apply(user, action).await {
            Ok(outcome) => Ok(outcome),
            Err(NavigationError::Progress(e)) if e.is_not_found() => {
                warn!("{} for action '{}'", e, action);
                Ok(Outcome::show(not_found_transition(&e)))
            }
            Err(NavigationError::Progress(e)) if e.is_invariant_violation() => {
                Ok(Outcome::notice(self.rejection_text(&e).await?, true))
            }
            Err(e) => Err(e),
        }
    }

    async fn apply(&self, user: &UserProfile, action: Action) -> Result<Outcome, NavigationError> {
        let user_id = user.id;
        let outcome = match action {
            Action::MainMenu => Outcome::show(self.render(user_id, &Screen::MainMenu).await?),
            Action::Running => match self.progress.active_enrollment(user_id).await? {
                Some(_) => Outcome::show(self.resume(user_id, None).await?),
                None => Outcome::show(self.render(user_id, &Screen::ProgramList).await?),
            },
            Action::Strength => Outcome::notice(STRENGTH_COMING_SOON, false),
            Action::Programs => Outcome::show(self.render(user_id, &Screen::ProgramList).await?),
            Action::Program { program_id } => {
                Outcome::show(self.render(user_id, &Screen::ProgramMenu { program_id }).await?)
            }
            Action::Continue { program_id }
            | Action::StartProgram { program_id }
            | Action::Next { program_id } => {
                Outcome::show(self.resume(user_id, Some(program_id)).await?)
            }
            Action::Workouts { program_id } => {
                Outcome::show(self.render(user_id, &Screen::WorkoutList { program_id }).await?)
            }
            Action::Enroll { program_id } => {
                User::get_or_create(self.progress.pool(), user).await?;
                self.progress.register(user_id, program_id).await?;
                Outcome::show(self.render(user_id, &Screen::AcceptProgram { program_id }).await?)
            }
            Action::End { program_id } => {
                self.progress.end(user_id, program_id).await?;
                Outcome::show(self.render(user_id, &Screen::ProgramList).await?)
                    .with_toast("Program ended")
            }
            Action::Workout { workout_id } => {
                let workout = self.workout(workout_id).await?;
                let screen = Screen::WorkoutDetails {
                    program_id: workout.program_id,
                    workout_id,
                    active: false,
                };
                Outcome::show(self.render(user_id, &screen).await?)
            }
            Action::Finish { program_id, workout_id } => {
                let enrollment = self
                    .progress
                    .active_enrollment(user_id)
                    .await?
                    .filter(|e| e.program_id == program_id)
                    .ok_or(ProgressError::NotEnrolled { user_id, program_id })?;
                let workout = self.workout(workout_id).await?;
                if workout.program_id != program_id {
                    return Err(ProgressError::NotFound { entity: "workout", id: workout_id }.into());
                }
                self.progress
                    .record_completion(user_id, workout_id, enrollment.id)
                    .await?;
                let screen = Screen::WorkoutCompleted { program_id, workout_id };
                Outcome::show(self.render(user_id, &screen).await?)
            }
        };
        Ok(outcome)
    }

    /// Jumps to the next workout of the active enrollment, or to the finish
    /// screen when every workout is done. `expected` pins the program the
    /// pressed button belongs to.
    async fn resume(&self, user_id: i64, expected: Option<i64>) -> Result<Transition, NavigationError> {
        let screen = match self.progress.next_workout(user_id).await? {
            NextWorkout::NoActiveProgram => {
                return Err(ProgressError::NotEnrolled {
                    user_id,
                    program_id: expected.unwrap_or_default(),
                }
                .into())
            }
            NextWorkout::Ready { enrollment, .. } | NextWorkout::ProgramComplete { enrollment }
                if expected.is_some_and(|id| id != enrollment.program_id) =>
            {
                return Err(ProgressError::NotEnrolled {
                    user_id,
                    program_id: expected.unwrap_or_default(),
                }
                .into())
            }
            NextWorkout::Ready { enrollment, workout } => Screen::WorkoutDetails {
                program_id: enrollment.program_id,
                workout_id: workout.id,
                active: true,
            },
            NextWorkout::ProgramComplete { enrollment } => Screen::ProgramFinished {
                program_id: enrollment.program_id,
            },
        };
        self.render(user_id, &screen).await
    }

    /// Builds the view for `screen` from current data.
    pub async fn render(&self, user_id: i64, screen: &Screen) -> Result<Transition, NavigationError> {
        let pool = self.progress.pool();
        let view = match *screen {
            Screen::MainMenu => view::main_menu(None),
            Screen::ProgramList => {
                let programs = TrainingProgram::find_all(pool).await?;
                let active = self.progress.active_enrollment(user_id).await?;
                view::program_list(&programs, active.map(|e| e.program_id))
            }
            Screen::ProgramMenu { program_id } => {
                let program = self.program(program_id).await?;
                let count = Workout::count_for_program(pool, program_id).await?;
                let active = self
                    .progress
                    .active_enrollment(user_id)
                    .await?
                    .is_some_and(|e| e.program_id == program_id);
                view::program_menu(&program, count, active)
            }
            Screen::AcceptProgram { program_id } => view::accept_program(&self.program(program_id).await?),
            Screen::WorkoutList { program_id } => {
                let program = self.program(program_id).await?;
                let workouts = Workout::find_by_program(pool, program_id).await?;
                let completed = match self.progress.active_enrollment(user_id).await? {
                    Some(e) if e.program_id == program_id => {
                        Completion::workout_ids_for_enrollment(pool, e.id).await?
                    }
                    _ => Vec::new(),
                };
                view::workout_list(&program, &workouts, &completed)
            }
            Screen::WorkoutDetails { program_id, workout_id, active } => {
                let program = self.program(program_id).await?;
                let workout = self.workout(workout_id).await?;
                view::workout_details(&program, &workout, active)
            }
            Screen::WorkoutCompleted { program_id, workout_id } => {
                let program = self.program(program_id).await?;
                let workout = self.workout(workout_id).await?;
                view::workout_completed(&program, &workout)
            }
            Screen::ProgramFinished { program_id } => view::program_finished(&self.program(program_id).await?),
            Screen::Error => view::apology(),
        };
        Ok(Transition { screen: *screen, view })
    }

    /// Re-renders the current screen after a stale button press.
    async fn recover(&self, user_id: i64, current: &Screen) -> Result<Outcome, NavigationError> {
        let transition = match self.render(user_id, current).await {
            Ok(transition) => transition,
            Err(NavigationError::Progress(e)) if e.is_not_found() => not_found_transition(&e),
            Err(e) => return Err(e),
        };
        Ok(Outcome::show(transition).with_toast(STALE_BUTTON))
    }

    async fn rejection_text(&self, error: &ProgressError) -> Result<String, NavigationError> {
        let text = match error {
            ProgressError::AlreadyEnrolled { active_program_id, .. } => {
                match TrainingProgram::find_by_id(self.progress.pool(), *active_program_id).await? {
                    Some(program) => format!(
                        "You are already enrolled in \"{}\". End it before starting another program.",
                        program.name
                    ),
                    None => "You are already enrolled in another program.".to_string(),
                }
            }
            ProgressError::NotEnrolled { .. } => {
                "You are not enrolled in this program. Enroll first from the program menu.".to_string()
            }
            other => other.to_string(),
        };
        Ok(text)
    }

    async fn program(&self, program_id: i64) -> Result<TrainingProgram, NavigationError> {
        TrainingProgram::find_by_id(self.progress.pool(), program_id)
            .await?
            .ok_or_else(|| ProgressError::NotFound { entity: "program", id: program_id }.into())
    }

    async fn workout(&self, workout_id: i64) -> Result<Workout, NavigationError> {
        Workout::find_by_id(self.progress.pool(), workout_id)
            .await?
            .ok_or_else(|| ProgressError::NotFound { entity: "workout", id: workout_id }.into())
    }
}

/// `finish` only counts for the active workout currently on screen.
fn finishes_shown_workout(current: &Screen, action: Action) -> bool {
    match (action, *current) {
        (
            Action::Finish { program_id, workout_id },
            Screen::WorkoutDetails { program_id: shown_program, workout_id: shown_workout, active: true },
        ) => program_id == shown_program && workout_id == shown_workout,
        (Action::Finish { .. }, _) => false,
        _ => true,
    }
}

fn not_found_transition(error: &ProgressError) -> Transition {
    let entity = match error {
        ProgressError::NotFound { entity, .. } => *entity,
        _ => "item",
    };
    Transition {
        screen: Screen::Error,
        view: view::not_found(entity),
    }
}
