//! Remitcore — quoting engine for the ZMW↔RUB remittance bot
//!
//! This library holds everything that does not touch Telegram:
//!
//! - `config`: immutable settings loaded once at startup
//! - `fees`: the fixed Kwacha fee-bracket table and lookup
//! - `rate`: Google Sheet CSV rate source (URL normalization + fetch + parse)
//! - `quote`: bidirectional quote math and HTML rendering
//! - `session`: per-chat conversation state
//! - `error`: error types shared across the crate

pub mod config;
pub mod error;
pub mod fees;
pub mod quote;
pub mod rate;
pub mod session;

// Re-export commonly used types for convenience
pub use config::Settings;
pub use error::{ConfigError, QuoteError, RateError};
pub use fees::{FeeBracket, FeeTable};
pub use quote::{KwachaQuote, RubleQuote};
pub use rate::{derive_csv_url, RateQuote, RateSource};
pub use session::{ConversationState, SessionStore};
