//! Immutable runtime settings.
//!
//! Everything the quoting core needs is loaded once at startup into a
//! [`Settings`] value and passed down explicitly — handlers never read the
//! environment themselves.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;
use crate::fees::FeeTable;

/// Default timeout for the rate fetch, matching the transport-level request
/// timeout of 10 seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Immutable configuration for the quoting core.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Raw sheet URL as configured; normalized to a CSV export URL by the
    /// rate source.
    pub sheet_url: String,
    /// WhatsApp agent phone in international format without `+`. When unset,
    /// quotes are rendered without the agent handoff link.
    pub agent_phone: Option<String>,
    /// Timeout applied to the single rate-fetch HTTP GET.
    pub fetch_timeout: Duration,
    /// Fee bracket table.
    pub fee_table: FeeTable,
}

impl Settings {
    /// Loads settings from the environment.
    ///
    /// `GOOGLE_SHEET_CSV_URL` (preferred) or `GOOGLE_SHEET_URL` is required.
    /// `WHATSAPP_AGENT_PHONE` is optional; `RATE_FETCH_TIMEOUT_SECS` defaults
    /// to 10 and must parse as a positive integer when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let sheet_url = env::var("GOOGLE_SHEET_CSV_URL")
            .or_else(|_| env::var("GOOGLE_SHEET_URL"))
            .map_err(|_| ConfigError::Missing("GOOGLE_SHEET_URL"))?;

        let agent_phone = env::var("WHATSAPP_AGENT_PHONE")
            .ok()
            .map(|s| s.trim().trim_start_matches('+').to_string())
            .filter(|s| !s.is_empty());

        let fetch_timeout = match env::var("RATE_FETCH_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: "RATE_FETCH_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        name: "RATE_FETCH_TIMEOUT_SECS",
                        value: raw,
                    });
                }
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        };

        Ok(Self {
            sheet_url,
            agent_phone,
            fetch_timeout,
            fee_table: FeeTable::standard(),
        })
    }
}
