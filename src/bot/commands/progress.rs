use teloxide::prelude::*;
use teloxide::types::ParseMode;
use crate::bot::HandlerResult;
use crate::services::progress::{ProgressService, ProgressSummary};
use crate::utils::datetime::format_date;
use crate::utils::feedback::CommandFeedback;
use crate::utils::markdown::{bold, escape_markdown};

pub async fn handle_progress(bot: Bot, msg: Message, progress: &ProgressService) -> HandlerResult {
    let Some(from) = msg.from() else {
        return Ok(());
    };
    let user_id = from.id.0 as i64;
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    match progress.progress_summary(user_id).await {
        Ok(Some(summary)) => {
            bot.send_message(msg.chat.id, format_summary(&summary))
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
        }
        Ok(None) => {
            feedback
                .validation_error(
                    "You have no active training program",
                    "Use /start and pick a program under Running.",
                )
                .await?;
        }
        Err(e) => {
            tracing::error!("Failed to load progress for user {}: {}", user_id, e);
            feedback.error("Failed to load your progress, please try again later").await?;
        }
    }
    Ok(())
}

pub fn format_summary(summary: &ProgressSummary) -> String {
    let mut text = format!(
        "📈 {}\n\nProgram: {}\nStarted: {}\nCompleted: {} of {} workouts",
        bold("Your progress"),
        escape_markdown(&summary.program.name),
        escape_markdown(&format_date(&summary.enrollment.start_date)),
        summary.completed,
        summary.total,
    );
    if summary.total > 0 && summary.completed >= summary.total {
        text.push_str("\n\n🏆 Every workout is done\\!");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Enrollment, TrainingProgram};

    fn summary(completed: i64, total: i64) -> ProgressSummary {
        ProgressSummary {
            program: TrainingProgram {
                id: 1,
                name: "Run Start".to_string(),
                description: String::new(),
                created_at: String::new(),
                updated_at: String::new(),
            },
            enrollment: Enrollment {
                id: 1,
                user_id: 7,
                program_id: 1,
                start_date: "2024-03-05T08:00:00.000000Z".to_string(),
                end_date: None,
            },
            completed,
            total,
        }
    }

    #[test]
    fn test_summary_lists_counts_and_date() {
        let text = format_summary(&summary(2, 8));
        assert!(text.contains("Completed: 2 of 8 workouts"));
        assert!(text.contains("05\\.03\\.2024"));
        assert!(!text.contains("🏆"));
    }

    #[test]
    fn test_summary_marks_finished_program() {
        assert!(format_summary(&summary(8, 8)).contains("🏆"));
    }
}
