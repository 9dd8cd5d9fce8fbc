use thiserror::Error;

/// Startup configuration errors. All of these are fatal: the bot refuses to
/// start rather than run with a half-configured rate source.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Errors while fetching or parsing the published sheet.
///
/// Every variant is surfaced to the user as the same "rate unavailable"
/// failure message; the distinction only matters for logs.
#[derive(Debug, Error)]
pub enum RateError {
    #[error("HTTP request failed with status: {0}")]
    Http(reqwest::StatusCode),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("rate source returned HTML — the sheet is not published as CSV")]
    HtmlBody,
    #[error("could not parse a numeric rate from: {0:?}")]
    NoNumber(String),
}

/// Errors produced while building a quote for a user-entered amount.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error(transparent)]
    RateUnavailable(#[from] RateError),
    #[error("cannot read an amount from {input:?}")]
    InvalidAmount { input: String },
    #[error("amount {amount:.2} K is outside the supported {min:.0}\u{2013}{max:.0} K range")]
    AmountOutOfRange { amount: f64, min: f64, max: f64 },
    #[error("no fee bracket covers {amount:.2} K")]
    NoBracketMatch { amount: f64 },
}
