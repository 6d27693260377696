use teloxide::prelude::*;
use crate::bot::HandlerResult;
use crate::utils::feedback::CommandFeedback;

pub async fn handle_general_message(bot: Bot, msg: Message) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    match hint_for(text) {
        Some(Hint::UnknownCommand(command)) => {
            let error_msg = format!("Unknown command: {command}");
            feedback
                .validation_error(&error_msg, "Use /help to see all available commands.")
                .await?;
        }
        Some(Hint::Menu) => {
            feedback.info("Use /start to open the training menu.").await?;
        }
        // Other chatter gets no reply
        None => {}
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Hint<'a> {
    UnknownCommand(&'a str),
    Menu,
}

fn hint_for(text: &str) -> Option<Hint<'_>> {
    let text = text.trim();
    if text.starts_with('/') {
        return Some(Hint::UnknownCommand(text.split_whitespace().next().unwrap_or(text)));
    }

    let lower = text.to_lowercase();
    if ["menu", "training", "workout", "program", "help"]
        .iter()
        .any(|word| lower.contains(word))
    {
        return Some(Hint::Menu);
    }
    None
}
