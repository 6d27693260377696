//! # Training Bot
//!
//! A Telegram bot that guides users through running training programs one
//! workout at a time.
//!
//! ## Features
//! - Menu navigation rendered into a single, edited-in-place message
//! - Enrollment in one program at a time with derived progress
//! - Idempotent loading of programs from JSON documents
//! - SQLite persistence with embedded migrations

/// Telegram handlers, commands, menu navigation and per-chat sessions
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database models, connections, and migrations
pub mod database;
/// Progress tracking, program seeding and the health endpoint
pub mod services;
/// Utility functions for datetime, validation, logging and formatting
pub mod utils;
