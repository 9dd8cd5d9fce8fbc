//! Rate source: a public Google Sheet published as CSV.
//!
//! The configured share URL is normalized into a CSV export URL once, then
//! each quote request performs a single bounded-timeout GET and extracts the
//! first decimal number from the body. No caching, no retry — repeated user
//! requests repeat the round trip.
//!
//! The body sniffing (HTML detection, first-numeric-token scan) is fragile by
//! nature and deliberately confined to this module so it can be swapped for a
//! structured API without touching the quote math.

use std::time::Duration;

use chrono::{DateTime, Utc};
use lazy_regex::regex;
use reqwest::header::ACCEPT;
use url::Url;

use crate::error::RateError;

/// Accept header sent with the CSV fetch. A misconfigured sheet ignores it
/// and answers with an HTML login/consent page, which we reject.
const CSV_ACCEPT: &str = "text/csv, text/plain;q=0.9, */*;q=0.1";

/// How much of an unparsable body to keep in the error for logs.
const BODY_PREVIEW_CHARS: usize = 120;

/// A single fetched exchange rate. Never persisted; lives for one reply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateQuote {
    /// Rubles per one Kwacha.
    pub rub_per_zmw: f64,
    pub fetched_at: DateTime<Utc>,
}

impl RateQuote {
    /// Inverse rate, Kwacha per one Ruble. Infinite when the sheet publishes
    /// a zero rate, mirroring how the rate display guards division.
    pub fn zmw_per_rub(&self) -> f64 {
        if self.rub_per_zmw == 0.0 {
            f64::INFINITY
        } else {
            1.0 / self.rub_per_zmw
        }
    }
}

/// Fetches the current rate from the published sheet.
#[derive(Debug, Clone)]
pub struct RateSource {
    client: reqwest::Client,
    csv_url: String,
}

impl RateSource {
    /// Builds a source from the raw configured sheet URL. The URL is
    /// normalized to its CSV export shape here, once.
    pub fn new(sheet_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            csv_url: derive_csv_url(sheet_url),
        })
    }

    /// The normalized CSV export URL this source fetches from.
    pub fn csv_url(&self) -> &str {
        &self.csv_url
    }

    /// Performs one GET against the CSV export URL and parses the rate.
    ///
    /// Fails with [`RateError`] when the request errors or times out, the
    /// response status is not successful, the body is HTML, or no numeric
    /// token is found.
    pub async fn fetch(&self) -> Result<RateQuote, RateError> {
        let response = self.client.get(&self.csv_url).header(ACCEPT, CSV_ACCEPT).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::Http(status));
        }

        let body = response.text().await?;
        let body = body.trim();

        if looks_like_html(body) {
            return Err(RateError::HtmlBody);
        }

        let rate = extract_first_number(body)
            .ok_or_else(|| RateError::NoNumber(body.chars().take(BODY_PREVIEW_CHARS).collect()))?;

        Ok(RateQuote {
            rub_per_zmw: rate,
            fetched_at: Utc::now(),
        })
    }
}

/// Normalizes a spreadsheet share URL into its CSV export shape.
///
/// Handles four URL shapes:
/// - published HTML (`/d/e/…/pubhtml`) → `/pub` with `output=csv`;
/// - published non-HTML (`/d/e/…/pub`) → forced `output=csv`;
/// - generic share link (`/d/<id>` with optional `gid` query) → canonical
///   `export?format=csv&gid=<gid>` URL;
/// - anything else, including unparsable URLs, passes through unchanged.
///
/// Deriving from an already-derived export URL returns it unchanged.
pub fn derive_csv_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };

    let path = url.path().to_string();

    if path.contains("/spreadsheets/d/e/") && path.contains("/pubhtml") {
        let published = path.replace("/pubhtml", "/pub");
        url.set_path(&published);
        force_query_param(&mut url, "output", "csv");
        return url.to_string();
    }

    if path.contains("/spreadsheets/d/e/") && path.contains("/pub") {
        force_query_param(&mut url, "output", "csv");
        return url.to_string();
    }

    if let Some(caps) = regex!(r"/spreadsheets/d/([A-Za-z0-9_-]+)").captures(&path) {
        let sheet_id = &caps[1];
        let gid = url
            .query_pairs()
            .find(|(key, _)| key == "gid")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_else(|| "0".to_string());
        return format!("https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv&gid={gid}");
    }

    raw.to_string()
}

/// Replaces any existing `key` query pairs with a single `key=value`,
/// preserving the other parameters.
fn force_query_param(url: &mut Url, key: &str, value: &str) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (k, v) in &kept {
        pairs.append_pair(k, v);
    }
    pairs.append_pair(key, value);
    drop(pairs);
}

/// An HTML body means the sheet is not actually published as CSV (usually a
/// login or consent page), so treat it as a configuration error.
fn looks_like_html(body: &str) -> bool {
    body.to_lowercase().contains("<html")
}

/// Extracts the first decimal number occurring anywhere in `body`, accepting
/// either a comma or a dot as the decimal separator.
fn extract_first_number(body: &str) -> Option<f64> {
    let token = regex!(r"[-+]?\d+(?:[.,]\d+)?").find(body)?;
    token.as_str().replace(',', ".").parse().ok()
}
