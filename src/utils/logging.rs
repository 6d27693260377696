use tracing::{error, info, warn, debug};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "training_bot=debug,tower_http=debug";

/// Installs the global subscriber. `LOG_FORMAT=json` selects JSON lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Logs an interaction start with consistent format
pub fn log_action_start(action: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "ACTION_START: {} by {} in chat {} - {}",
            action, user_id, chat_id, d
        ),
        None => info!(
            "ACTION_START: {} by {} in chat {}",
            action, user_id, chat_id
        ),
    }
}

/// Logs an interaction that rendered its next screen
pub fn log_action_success(action: &str, user_id: i64, chat_id: i64, screen: &str) {
    info!(
        "ACTION_SUCCESS: {} by {} in chat {} -> {}",
        action, user_id, chat_id, screen
    );
}

/// Logs an interaction rejected by a progress rule
pub fn log_action_rejected(action: &str, user_id: i64, chat_id: i64, reason: &str) {
    warn!(
        "ACTION_REJECTED: {} by {} in chat {} - {}",
        action, user_id, chat_id, reason
    );
}

/// Logs interaction errors with consistent format
pub fn log_action_error(action: &str, user_id: i64, chat_id: i64, error: &str) {
    error!(
        "ACTION_ERROR: {} by {} in chat {} - {}",
        action, user_id, chat_id, error
    );
}

/// Logs database operations with consistent format
pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("DB_OP: {} on {} - {}", operation, table, d),
        None => debug!("DB_OP: {} on {}", operation, table),
    }
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
