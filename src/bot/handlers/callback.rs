use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use teloxide::{ApiError, RequestError};
use tracing::Instrument;
use uuid::Uuid;
use crate::bot::navigation::{view, Action, NavigationError, Navigator, Notice, Screen, View};
use crate::bot::session::{SessionDialogue, SessionTracker};
use crate::bot::HandlerResult;
use crate::database::models::UserProfile;
use crate::utils::logging::{log_action_error, log_action_rejected, log_action_start, log_action_success};

const GENERIC_FAILURE: &str = "Something went wrong";

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: SessionDialogue,
    navigator: Navigator,
) -> HandlerResult {
    let span = tracing::info_span!(
        "interaction",
        id = %Uuid::new_v4(),
        user_id = q.from.id.0,
        chat_id = dialogue.chat_id().0,
        data = q.data.as_deref().unwrap_or_default(),
    );

    handle_callback(bot, q, SessionTracker::new(dialogue), navigator)
        .instrument(span)
        .await
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    tracker: SessionTracker,
    navigator: Navigator,
) -> HandlerResult {
    let profile = UserProfile::from(&q.from);
    let user_id = profile.id;
    let chat_id = tracker.chat_id().0;

    let action = match q.data.as_deref().unwrap_or_default().parse::<Action>() {
        Ok(action) => action,
        Err(e) => {
            log_action_rejected("callback", user_id, chat_id, &e.to_string());
            acknowledge(&bot, &q.id, Some(&notice("Unknown button", false))).await;
            return Ok(());
        }
    };
    let action_name = action.to_string();
    log_action_start(&action_name, user_id, chat_id, None);

    let current = match tracker.screen().await {
        Ok(screen) => screen,
        Err(e) => {
            log_action_error(&action_name, user_id, chat_id, &e.to_string());
            acknowledge(&bot, &q.id, Some(&notice(GENERIC_FAILURE, false))).await;
            apologize(&bot, &tracker, &q).await;
            return Ok(());
        }
    };

    match navigator.handle(&profile, &current, action).await {
        Ok(outcome) => {
            acknowledge(&bot, &q.id, outcome.notice.as_ref()).await;
            if let Some(n) = outcome.notice.as_ref().filter(|n| n.alert) {
                log_action_rejected(&action_name, user_id, chat_id, &n.text);
            }

            let Some(transition) = outcome.transition else {
                return Ok(());
            };
            if let Err(e) = present(&bot, &tracker, &q, &transition.view).await {
                log_action_error(&action_name, user_id, chat_id, &e.to_string());
                apologize(&bot, &tracker, &q).await;
                return Ok(());
            }
            tracker.set_screen(transition.screen).await?;
            log_action_success(&action_name, user_id, chat_id, transition.screen.name());
        }
        Err(e) => {
            log_action_error(&action_name, user_id, chat_id, &e.to_string());
            acknowledge(&bot, &q.id, Some(&notice(GENERIC_FAILURE, false))).await;
            apologize(&bot, &tracker, &q).await;
        }
    }

    Ok(())
}

/// Shows the generic apology and parks the session on the error screen.
/// Runs after the query has been answered, so failures here are only logged.
async fn apologize(bot: &Bot, tracker: &SessionTracker, q: &CallbackQuery) {
    if let Err(e) = present(bot, tracker, q, &view::apology()).await {
        tracing::error!("Failed to show apology: {}", e);
    }
    if let Err(e) = tracker.set_screen(Screen::Error).await {
        tracing::error!("Failed to store error screen: {}", e);
    }
}

fn notice(text: &str, alert: bool) -> Notice {
    Notice { text: text.to_string(), alert }
}

/// Answers the callback query. A failed answer only stops the button spinner,
/// so it is logged and otherwise ignored.
async fn acknowledge(bot: &Bot, query_id: &str, notice: Option<&Notice>) {
    let mut request = bot.answer_callback_query(query_id);
    if let Some(notice) = notice {
        request = request.text(notice.text.clone()).show_alert(notice.alert);
    }
    if let Err(e) = request.await {
        tracing::warn!("Failed to answer callback query: {}", e);
    }
}

/// Renders `view` into the live message. Without a tracked live message the
/// tapped message is adopted; if neither can be edited a new message is sent
/// and becomes live.
pub async fn present(
    bot: &Bot,
    tracker: &SessionTracker,
    q: &CallbackQuery,
    view: &View,
) -> Result<(), NavigationError> {
    let live = tracker.get_active_message().await.map_err(NavigationError::Session)?;
    let target = match live {
        Some(live) => Some((ChatId(live.chat_id), MessageId(live.message_id))),
        None => q.message.as_ref().map(|m| (m.chat.id, m.id)),
    };

    if let Some((chat_id, message_id)) = target {
        let edited = bot
            .edit_message_text(chat_id, message_id, view.text.clone())
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(view.keyboard.clone())
            .await;

        match edited {
            Ok(_) => {
                if live.is_none() {
                    tracker
                        .update_message(chat_id.0, message_id.0)
                        .await
                        .map_err(NavigationError::Session)?;
                }
                return Ok(());
            }
            Err(e) if is_not_modified(&e) => return Ok(()),
            Err(e) if is_uneditable(&e) => {
                tracing::debug!("Live message {} can no longer be edited: {}", message_id.0, e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let sent = bot
        .send_message(tracker.chat_id(), view.text.clone())
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(view.keyboard.clone())
        .await?;
    tracker
        .update_message(sent.chat.id.0, sent.id.0)
        .await
        .map_err(NavigationError::Session)?;
    Ok(())
}

/// Editing a message to identical content is reported as an error by Telegram.
pub fn is_not_modified(error: &RequestError) -> bool {
    matches!(error, RequestError::Api(ApiError::MessageNotModified))
}

pub fn is_uneditable(error: &RequestError) -> bool {
    matches!(
        error,
        RequestError::Api(ApiError::MessageToEditNotFound | ApiError::MessageCantBeEdited)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::session::{SessionState, SessionStorage};
    use crate::services::progress::ProgressService;
    use sqlx::SqlitePool;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;
    use teloxide::dispatching::dialogue::{InMemStorage, Storage};

    type StorageFuture<T> = Pin<Box<dyn Future<Output = Result<T, std::io::Error>> + Send>>;

    fn storage_down() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::Other, "storage down")
    }

    /// Storage whose every operation fails.
    struct BrokenStorage;

    impl Storage<SessionState> for BrokenStorage {
        type Error = std::io::Error;

        fn remove_dialogue(self: Arc<Self>, _chat_id: ChatId) -> StorageFuture<()> {
            Box::pin(async { Err(storage_down()) })
        }

        fn update_dialogue(self: Arc<Self>, _chat_id: ChatId, _dialogue: SessionState) -> StorageFuture<()> {
            Box::pin(async { Err(storage_down()) })
        }

        fn get_dialogue(self: Arc<Self>, _chat_id: ChatId) -> StorageFuture<Option<SessionState>> {
            Box::pin(async { Err(storage_down()) })
        }
    }

    /// Bot pointed at a closed local port, so every request fails.
    fn offline_bot() -> Bot {
        Bot::new("1:test").set_api_url("http://127.0.0.1:9/".parse().expect("valid url"))
    }

    fn navigator() -> Navigator {
        let pool = SqlitePool::connect_lazy("sqlite::memory:").expect("lazy pool");
        Navigator::new(ProgressService::new(pool))
    }

    fn query(data: &str) -> CallbackQuery {
        serde_json::from_value(serde_json::json!({
            "id": "q1",
            "from": { "id": 7, "is_bot": false, "first_name": "Anna" },
            "chat_instance": "c1",
            "data": data,
        }))
        .expect("valid callback query")
    }

    fn tracker(storage: Arc<SessionStorage>) -> SessionTracker {
        SessionTracker::for_chat(storage, ChatId(7))
    }

    #[tokio::test]
    async fn test_failed_render_ends_on_error_screen() {
        let storage = InMemStorage::<SessionState>::new().erase();

        let result = handle_callback(offline_bot(), query("main_menu"), tracker(storage.clone()), navigator()).await;
        assert!(result.is_ok());
        assert_eq!(tracker(storage).screen().await.unwrap(), Screen::Error);
    }

    #[tokio::test]
    async fn test_session_failure_is_answered_not_propagated() {
        let storage = Arc::new(BrokenStorage).erase();

        let result = handle_callback(offline_bot(), query("main_menu"), tracker(storage), navigator()).await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_not_modified_is_suppressed() {
        assert!(is_not_modified(&RequestError::Api(ApiError::MessageNotModified)));
        assert!(!is_not_modified(&RequestError::Api(ApiError::BotBlocked)));
    }

    #[test]
    fn test_uneditable_messages_fall_back_to_send() {
        assert!(is_uneditable(&RequestError::Api(ApiError::MessageToEditNotFound)));
        assert!(is_uneditable(&RequestError::Api(ApiError::MessageCantBeEdited)));
        assert!(!is_uneditable(&RequestError::Api(ApiError::MessageNotModified)));
    }
}
