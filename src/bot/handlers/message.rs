use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::Instrument;
use uuid::Uuid;
use crate::bot::commands::{progress, start, Command};
use crate::bot::navigation::Navigator;
use crate::bot::session::{SessionDialogue, SessionTracker};
use crate::bot::HandlerResult;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: SessionDialogue,
    navigator: Navigator,
) -> HandlerResult {
    let span = tracing::info_span!(
        "command",
        id = %Uuid::new_v4(),
        chat_id = msg.chat.id.0,
        command = ?cmd,
    );

    async move {
        let tracker = SessionTracker::new(dialogue);
        match cmd {
            Command::Help => {
                bot.send_message(msg.chat.id, Command::descriptions().to_string()).await?;
            }
            Command::Start => {
                start::handle_start(bot, msg, &tracker, navigator.progress()).await?;
            }
            Command::Progress => {
                progress::handle_progress(bot, msg, navigator.progress()).await?;
            }
        }
        Ok(())
    }
    .instrument(span)
    .await
}
