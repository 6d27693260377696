use std::env;
use std::sync::Mutex;
use training_bot::config::{Config, SessionBackend};

// Mutex to ensure config tests run sequentially to avoid environment variable conflicts
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

const VARS: &[&str] = &[
    "TELEGRAM_BOT_TOKEN",
    "DATABASE_URL",
    "HTTP_PORT",
    "SESSION_STORAGE",
    "SESSION_DB_PATH",
    "PROGRAMS_DIR",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token_123");
    env::set_var("DATABASE_URL", "sqlite:test.db");
    env::set_var("HTTP_PORT", "8080");
    env::set_var("SESSION_STORAGE", "sqlite");
    env::set_var("SESSION_DB_PATH", "/tmp/sessions.db");
    env::set_var("PROGRAMS_DIR", "/srv/trainings");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "test_token_123");
    assert_eq!(config.database_url, "sqlite:test.db");
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.session_backend, SessionBackend::Sqlite);
    assert_eq!(config.session_db_path, "/tmp/sessions.db");
    assert_eq!(config.programs_dir, "/srv/trainings");

    clear_env();
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "required_token");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "required_token");
    assert_eq!(config.database_url, "sqlite:./data/training.db");
    assert_eq!(config.http_port, 3000);
    assert_eq!(config.session_backend, SessionBackend::Memory);
    assert_eq!(config.session_db_path, "./data/sessions.db");
    assert_eq!(config.programs_dir, "./trainings");

    clear_env();
}

#[test]
fn test_config_missing_required_token() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    let result = Config::from_env();
    assert!(result.is_err());

    let error_msg = result.unwrap_err().to_string();
    assert!(error_msg.contains("TELEGRAM_BOT_TOKEN must be set"));
}

#[test]
fn test_config_empty_token_is_fatal() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "   ");
    let result = Config::from_env();
    assert!(result.is_err());

    clear_env();
}

#[test]
fn test_config_invalid_port() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("HTTP_PORT", "invalid_port");

    let result = Config::from_env();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Invalid HTTP_PORT"));

    env::set_var("HTTP_PORT", "-1");
    assert!(Config::from_env().is_err());

    env::set_var("HTTP_PORT", "  65535  ");
    assert_eq!(Config::from_env().unwrap().http_port, 65535);

    clear_env();
}

#[test]
fn test_config_unknown_session_backend() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("SESSION_STORAGE", "redis");
    assert!(Config::from_env().is_err());

    env::set_var("SESSION_STORAGE", "MEMORY");
    assert_eq!(Config::from_env().unwrap().session_backend, SessionBackend::Memory);

    clear_env();
}

#[test]
fn test_config_empty_database_url_uses_default() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("DATABASE_URL", "");
    assert_eq!(Config::database_url_from_env(), "sqlite:./data/training.db");

    clear_env();
}
