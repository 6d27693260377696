//! # Training Bot Main Entry Point
//!
//! Initializes logging, loads configuration, prepares the database and the
//! program catalogue, then runs the Telegram bot next to the health server.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{info, warn};

use training_bot::bot::handlers::BotHandler;
use training_bot::bot::navigation::Navigator;
use training_bot::bot::session::build_storage;
use training_bot::config::Config;
use training_bot::database::connection::DatabaseManager;
use training_bot::services::health::HealthService;
use training_bot::services::progress::ProgressService;
use training_bot::services::seed;
use training_bot::utils::logging::{init_tracing, log_system_event};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;

    info!("Starting Training Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Sessions: {:?}",
        config.database_url, config.http_port, config.session_backend
    );

    // Initialize database
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    log_system_event("database ready", Some(&config.database_url));

    // A broken document must not keep the bot down; programs already stored stay usable
    match seed::load_dir(&db_arc.pool, Path::new(&config.programs_dir)).await {
        Ok(report) => info!(
            "Program catalogue loaded: {} new programs, {} new workouts",
            report.programs_created, report.workouts_created
        ),
        Err(e) => warn!("Failed to load programs from {}: {:#}", config.programs_dir, e),
    }

    let storage = build_storage(&config).await?;

    let bot = Bot::new(&config.telegram_bot_token);
    let navigator = Navigator::new(ProgressService::new(db_arc.pool.clone()));
    let handler = BotHandler::new(navigator);
    log_system_event("telegram bot initialized", None);

    let health_service = HealthService::new(db_arc.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    let bot_task = tokio::spawn(async move {
        Dispatcher::builder(bot, handler.schema())
            .dependencies(dptree::deps![storage])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    tokio::select! {
        result = bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result = health_task => {
            if let Err(e) = result {
                tracing::error!("Health task error: {}", e);
            }
        }
    }

    log_system_event("application stopped", None);
    Ok(())
}
