use anyhow::{anyhow, Result};
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite:./data/training.db";
const DEFAULT_SESSION_DB_PATH: &str = "./data/sessions.db";
const DEFAULT_PROGRAMS_DIR: &str = "./trainings";

/// Where per-chat conversation state is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// Lost on restart.
    Memory,
    /// Persisted in a separate SQLite file.
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    pub session_backend: SessionBackend,
    pub session_db_path: String,
    pub programs_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let port_str = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str.trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let session_backend = match env::var("SESSION_STORAGE") {
            Ok(value) => parse_session_backend(&value)?,
            Err(_) => SessionBackend::Memory,
        };

        Ok(Config {
            telegram_bot_token: token,
            database_url: Self::database_url_from_env(),
            http_port,
            session_backend,
            session_db_path: non_empty_or(env::var("SESSION_DB_PATH").ok(), DEFAULT_SESSION_DB_PATH),
            programs_dir: Self::programs_dir_from_env(),
        })
    }

    /// Database location only; used by tooling that never talks to Telegram.
    pub fn database_url_from_env() -> String {
        non_empty_or(env::var("DATABASE_URL").ok(), DEFAULT_DATABASE_URL)
    }

    pub fn programs_dir_from_env() -> String {
        non_empty_or(env::var("PROGRAMS_DIR").ok(), DEFAULT_PROGRAMS_DIR)
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

fn parse_session_backend(value: &str) -> Result<SessionBackend> {
    match value.trim().to_lowercase().as_str() {
        "" | "memory" => Ok(SessionBackend::Memory),
        "sqlite" => Ok(SessionBackend::Sqlite),
        other => Err(anyhow!("Invalid SESSION_STORAGE '{}', expected 'memory' or 'sqlite'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_backend() {
        assert_eq!(parse_session_backend("memory").ok(), Some(SessionBackend::Memory));
        assert_eq!(parse_session_backend(" SQLite ").ok(), Some(SessionBackend::Sqlite));
        assert_eq!(parse_session_backend("").ok(), Some(SessionBackend::Memory));
        assert!(parse_session_backend("redis").is_err());
    }

    #[test]
    fn test_non_empty_or() {
        assert_eq!(non_empty_or(None, "fallback"), "fallback");
        assert_eq!(non_empty_or(Some("   ".to_string()), "fallback"), "fallback");
        assert_eq!(non_empty_or(Some("value".to_string()), "fallback"), "value");
    }
}
