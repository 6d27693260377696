//! Per-chat conversation state.
//!
//! The state lives in teloxide dialogue storage keyed by chat id. It is created
//! with defaults on first access and kept for as long as the storage lives.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use teloxide::dispatching::dialogue::{Dialogue, ErasedStorage, InMemStorage, SqliteStorage, Storage};
use teloxide::dispatching::dialogue::serializer::Json;
use teloxide::types::ChatId;
use crate::bot::navigation::Screen;
use crate::config::{Config, SessionBackend};

pub type SessionStorage = ErasedStorage<SessionState>;
pub type SessionDialogue = Dialogue<SessionState, SessionStorage>;
pub type SessionError = Box<dyn std::error::Error + Send + Sync>;

/// The bot message that successive screens are rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveMessage {
    pub chat_id: i64,
    pub message_id: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub live_message: Option<LiveMessage>,
    pub screen: Screen,
    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,
}

pub async fn build_storage(config: &Config) -> anyhow::Result<Arc<SessionStorage>> {
    match config.session_backend {
        SessionBackend::Memory => Ok(InMemStorage::<SessionState>::new().erase()),
        SessionBackend::Sqlite => {
            if let Some(parent) = Path::new(&config.session_db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let storage = SqliteStorage::open(&config.session_db_path, Json)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to open session storage: {}", e))?;
            Ok(storage.erase())
        }
    }
}

/// Typed access to one chat's [`SessionState`].
#[derive(Clone)]
pub struct SessionTracker {
    dialogue: SessionDialogue,
}

impl SessionTracker {
    pub fn new(dialogue: SessionDialogue) -> Self {
        Self { dialogue }
    }

    pub fn for_chat(storage: Arc<SessionStorage>, chat_id: ChatId) -> Self {
        Self::new(Dialogue::new(storage, chat_id))
    }

    pub fn chat_id(&self) -> ChatId {
        self.dialogue.chat_id()
    }

    pub async fn state(&self) -> Result<SessionState, SessionError> {
        self.dialogue.get_or_default().await
    }

    pub async fn get_active_message(&self) -> Result<Option<LiveMessage>, SessionError> {
        Ok(self.state().await?.live_message)
    }

    /// Makes a freshly sent message the edit target for later screens.
    pub async fn update_message(&self, chat_id: i64, message_id: i32) -> Result<(), SessionError> {
        self.modify(|state| state.live_message = Some(LiveMessage { chat_id, message_id }))
            .await
    }

    pub async fn screen(&self) -> Result<Screen, SessionError> {
        Ok(self.state().await?.screen)
    }

    pub async fn set_screen(&self, screen: Screen) -> Result<(), SessionError> {
        self.modify(|state| state.screen = screen).await
    }

    pub async fn set_extra(&self, key: &str, value: serde_json::Value) -> Result<(), SessionError> {
        self.modify(|state| {
            state.extra.insert(key.to_string(), value);
        })
        .await
    }

    pub async fn extra(&self, key: &str) -> Result<Option<serde_json::Value>, SessionError> {
        Ok(self.state().await?.extra.get(key).cloned())
    }

    /// Removes the given keys, or everything when `keys` is `None`.
    pub async fn clear_extra(&self, keys: Option<&[&str]>) -> Result<(), SessionError> {
        self.modify(|state| match keys {
            Some(keys) => {
                for key in keys {
                    state.extra.remove(*key);
                }
            }
            None => state.extra.clear(),
        })
        .await
    }

    async fn modify(&self, f: impl FnOnce(&mut SessionState)) -> Result<(), SessionError> {
        let mut state = self.state().await?;
        f(&mut state);
        self.dialogue.update(state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(chat_id: i64) -> (Arc<SessionStorage>, SessionTracker) {
        let storage = InMemStorage::<SessionState>::new().erase();
        let tracker = SessionTracker::for_chat(storage.clone(), ChatId(chat_id));
        (storage, tracker)
    }

    #[tokio::test]
    async fn test_defaults_on_first_touch() {
        let (_storage, tracker) = tracker(1);
        let state = tracker.state().await.unwrap();
        assert_eq!(state, SessionState::default());
        assert_eq!(tracker.get_active_message().await.unwrap(), None);
        assert_eq!(tracker.screen().await.unwrap(), Screen::MainMenu);
    }

    #[tokio::test]
    async fn test_update_message_overwrites_pointer() {
        let (_storage, tracker) = tracker(1);
        tracker.update_message(1, 10).await.unwrap();
        tracker.update_message(1, 11).await.unwrap();
        assert_eq!(
            tracker.get_active_message().await.unwrap(),
            Some(LiveMessage { chat_id: 1, message_id: 11 })
        );
    }

    #[tokio::test]
    async fn test_state_is_scoped_per_chat() {
        let (storage, first) = tracker(1);
        let second = SessionTracker::for_chat(storage, ChatId(2));
        first.update_message(1, 5).await.unwrap();
        first.set_screen(Screen::ProgramList).await.unwrap();

        assert_eq!(second.get_active_message().await.unwrap(), None);
        assert_eq!(second.screen().await.unwrap(), Screen::MainMenu);
        assert_eq!(first.screen().await.unwrap(), Screen::ProgramList);
    }

    #[tokio::test]
    async fn test_screen_change_keeps_live_message() {
        let (_storage, tracker) = tracker(1);
        tracker.update_message(1, 7).await.unwrap();
        tracker.set_screen(Screen::WorkoutList { program_id: 3 }).await.unwrap();
        assert_eq!(
            tracker.get_active_message().await.unwrap(),
            Some(LiveMessage { chat_id: 1, message_id: 7 })
        );
    }

    #[tokio::test]
    async fn test_extra_set_and_clear() {
        let (_storage, tracker) = tracker(1);
        tracker.set_extra("a", serde_json::json!(1)).await.unwrap();
        tracker.set_extra("b", serde_json::json!("two")).await.unwrap();
        tracker.clear_extra(Some(&["a"])).await.unwrap();

        assert_eq!(tracker.extra("a").await.unwrap(), None);
        assert_eq!(tracker.extra("b").await.unwrap(), Some(serde_json::json!("two")));

        tracker.clear_extra(None).await.unwrap();
        assert!(tracker.state().await.unwrap().extra.is_empty());
    }
}
