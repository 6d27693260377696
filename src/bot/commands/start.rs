use teloxide::prelude::*;
use teloxide::types::ParseMode;
use crate::bot::navigation::{view, Screen};
use crate::bot::session::SessionTracker;
use crate::bot::HandlerResult;
use crate::database::models::{User, UserProfile};
use crate::services::progress::ProgressService;
use crate::utils::logging::{log_action_start, log_action_success};

/// Greets the user with a fresh main menu message, which becomes the live
/// message for the following screens.
pub async fn handle_start(
    bot: Bot,
    msg: Message,
    tracker: &SessionTracker,
    progress: &ProgressService,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let Some(from) = msg.from() else {
        return Ok(());
    };

    let profile = UserProfile::from(from);
    log_action_start("start", profile.id, chat_id.0, None);

    let user = User::get_or_create(progress.pool(), &profile).await?;
    let menu = view::main_menu(Some(&user.display_name()));

    let sent = bot
        .send_message(chat_id, menu.text)
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(menu.keyboard)
        .await?;

    tracker.update_message(sent.chat.id.0, sent.id.0).await?;
    tracker.set_screen(Screen::MainMenu).await?;
    tracker.clear_extra(None).await?;

    log_action_success("start", profile.id, chat_id.0, Screen::MainMenu.name());
    Ok(())
}
