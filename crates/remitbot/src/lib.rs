//! Remitbot — Telegram bot quoting ZMW↔RUB transfer fees.
//!
//! This library exposes the bot wiring so integration tests can build the
//! same dispatcher schema that production runs.
//!
//! # Module Structure
//!
//! - `bot`: bot construction, command enum, reply-keyboard menu
//! - `handlers`: dptree schema and the individual update handlers
//! - `cli`: command-line interface
//! - `logging`: console + file logger setup

pub mod bot;
pub mod cli;
pub mod handlers;
pub mod logging;

// Re-export commonly used types for convenience
pub use bot::{create_bot, menu_keyboard, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps, HandlerError};
