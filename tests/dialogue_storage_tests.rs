use std::sync::Arc;
use teloxide::dispatching::dialogue::{InMemStorage, SqliteStorage, Storage};
use teloxide::dispatching::dialogue::serializer::Json;
use teloxide::types::ChatId;
use tempfile::TempDir;
use training_bot::bot::handlers::BotHandler;
use training_bot::bot::navigation::{Navigator, Screen};
use training_bot::bot::session::{LiveMessage, SessionState, SessionStorage, SessionTracker};
use training_bot::database::connection::DatabaseManager;
use training_bot::services::progress::ProgressService;

#[tokio::test]
async fn test_dialogue_schema_builds() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

    let db = DatabaseManager::new(&db_url)
        .await
        .expect("Failed to create test database");
    db.run_migrations().await.expect("Failed to run migrations");

    let handler = BotHandler::new(Navigator::new(ProgressService::new(db.pool.clone())));
    let _storage: Arc<SessionStorage> = InMemStorage::<SessionState>::new().erase();

    // Building the tree must not panic
    let _schema = handler.schema();
}

#[tokio::test]
async fn test_sqlite_sessions_survive_reopen() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("sessions.db");
    let path = path.to_str().expect("temp path is not utf-8");

    {
        let storage: Arc<SessionStorage> = SqliteStorage::open(path, Json)
            .await
            .expect("Failed to open session storage")
            .erase();
        let tracker = SessionTracker::for_chat(storage, ChatId(77));
        tracker.update_message(77, 1234).await.unwrap();
        tracker.set_screen(Screen::ProgramMenu { program_id: 3 }).await.unwrap();
    }

    let storage: Arc<SessionStorage> = SqliteStorage::open(path, Json)
        .await
        .expect("Failed to reopen session storage")
        .erase();
    let tracker = SessionTracker::for_chat(storage, ChatId(77));

    assert_eq!(
        tracker.get_active_message().await.unwrap(),
        Some(LiveMessage { chat_id: 77, message_id: 1234 })
    );
    assert_eq!(tracker.screen().await.unwrap(), Screen::ProgramMenu { program_id: 3 });
}

#[tokio::test]
async fn test_sessions_are_per_chat() {
    let storage: Arc<SessionStorage> = InMemStorage::<SessionState>::new().erase();
    let first = SessionTracker::for_chat(storage.clone(), ChatId(1));
    let second = SessionTracker::for_chat(storage, ChatId(-100123));

    first.update_message(1, 10).await.unwrap();
    second.update_message(-100123, 20).await.unwrap();

    assert_eq!(first.get_active_message().await.unwrap().unwrap().message_id, 10);
    assert_eq!(second.get_active_message().await.unwrap().unwrap().message_id, 20);
    assert_eq!(second.chat_id(), ChatId(-100123));
}
