//! Quote math and message rendering.
//!
//! Two symmetric operations over the fee table and a fetched rate:
//!
//! - Kwacha-received: wanted Kwacha `W` → fee `F` → total basis `W + F` →
//!   rubles to send `(W + F) × rate`;
//! - Ruble-received: wanted Rubles `R` → base Kwacha `B = R / rate` → fee on
//!   `B` → total Kwacha to send `B + F`.
//!
//! Rendering produces Telegram HTML: a bold header plus a fixed-width
//! label/value block, optionally followed by a WhatsApp deep link carrying
//! the quote as a URL-encoded prefilled message.

use crate::error::QuoteError;
use crate::fees::FeeTable;
use crate::rate::RateQuote;

/// Column width of the label part in rendered `<pre>` blocks.
const LABEL_WIDTH: usize = 18;

/// Parses a user-entered amount. Spaces are stripped and a comma is accepted
/// as the decimal separator ("6 500,50" → 6500.5).
pub fn parse_amount(text: &str) -> Result<f64, QuoteError> {
    let normalized: String = text.trim().replace(' ', "").replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| QuoteError::InvalidAmount {
            input: text.trim().to_string(),
        })
}

/// A completed Kwacha-received quote: the recipient gets `wanted_kwacha`,
/// the sender pays `rubles_to_send`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KwachaQuote {
    pub rate: RateQuote,
    pub wanted_kwacha: f64,
    pub fee: f64,
    pub bracket: (f64, f64),
    pub total_basis: f64,
    pub rubles_to_send: f64,
}

/// A completed Ruble-received quote: the recipient gets `wanted_rubles`,
/// the sender hands over `total_kwacha`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RubleQuote {
    pub rate: RateQuote,
    pub wanted_rubles: f64,
    pub base_kwacha: f64,
    pub fee: f64,
    pub bracket: (f64, f64),
    pub total_kwacha: f64,
}

/// Builds a Kwacha-received quote for `wanted_kwacha`.
///
/// The amount is range-checked against the table's global bounds before the
/// bracket lookup; an in-range amount that falls in a bracket gap is an
/// explicit [`QuoteError::NoBracketMatch`].
pub fn kwacha_received_quote(table: &FeeTable, rate: RateQuote, wanted_kwacha: f64) -> Result<KwachaQuote, QuoteError> {
    let (min, max) = (table.min_kwacha(), table.max_kwacha());
    if wanted_kwacha < min || wanted_kwacha > max {
        return Err(QuoteError::AmountOutOfRange {
            amount: wanted_kwacha,
            min,
            max,
        });
    }

    let bracket = table
        .fee_for(wanted_kwacha)
        .ok_or(QuoteError::NoBracketMatch { amount: wanted_kwacha })?;

    let total_basis = wanted_kwacha + bracket.fee;
    Ok(KwachaQuote {
        rate,
        wanted_kwacha,
        fee: bracket.fee,
        bracket: (bracket.low, bracket.high),
        total_basis,
        rubles_to_send: total_basis * rate.rub_per_zmw,
    })
}

/// Builds a Ruble-received quote for `wanted_rubles`. The base Kwacha amount
/// `wanted_rubles / rate` must fall within the table's global bounds.
pub fn ruble_received_quote(table: &FeeTable, rate: RateQuote, wanted_rubles: f64) -> Result<RubleQuote, QuoteError> {
    let base_kwacha = wanted_rubles / rate.rub_per_zmw;

    let (min, max) = (table.min_kwacha(), table.max_kwacha());
    if !base_kwacha.is_finite() || base_kwacha < min || base_kwacha > max {
        return Err(QuoteError::AmountOutOfRange {
            amount: base_kwacha,
            min,
            max,
        });
    }

    let bracket = table
        .fee_for(base_kwacha)
        .ok_or(QuoteError::NoBracketMatch { amount: base_kwacha })?;

    Ok(RubleQuote {
        rate,
        wanted_rubles,
        base_kwacha,
        fee: bracket.fee,
        bracket: (bracket.low, bracket.high),
        total_kwacha: base_kwacha + bracket.fee,
    })
}

/// Formats a money amount with thousands separators and two decimals,
/// dropping a trailing `.00` ("6,825 K", "153,562.50 RUB").
pub fn fmt_money(amount: f64, currency: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = if amount < 0.0 { format!("-{grouped}") } else { grouped };
    if frac_part != "00" {
        out.push('.');
        out.push_str(frac_part);
    }
    if !currency.is_empty() {
        out.push(' ');
        out.push_str(currency);
    }
    out
}

/// Bold message header, one trailing newline.
pub fn header(title: &str) -> String {
    format!("<b>{title}</b>\n")
}

/// One fixed-width label/value line inside a `<pre>` block.
pub fn line(label: &str, value: &str) -> String {
    format!("{label:<width$} {value}\n", width = LABEL_WIDTH)
}

/// Fixed-width label/value block wrapped in `<pre>` tags.
pub fn calc_block<'a>(pairs: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let mut block = String::from("<pre>");
    for (label, value) in pairs {
        block.push_str(&line(label, &value));
    }
    block.push_str("</pre>");
    block
}

/// WhatsApp deep link with `text` URL-encoded as the prefilled message.
/// Rendered as a clickable link only, never fetched.
pub fn whatsapp_link(agent_phone: &str, text: &str) -> String {
    format!("https://wa.me/{agent_phone}?text={}", urlencoding::encode(text))
}

/// Plain rate display: direct and inverse rate plus provenance.
pub fn render_rate(rate: &RateQuote) -> String {
    let mut text = header("📈 Current Google rate");
    text.push_str(&calc_block([
        ("1 ZMW → RUB", format!("{:.4}", rate.rub_per_zmw)),
        ("1 RUB → ZMW", format!("{:.4}", rate.zmw_per_rub())),
        ("Updated", rate.fetched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ("Source", "Google Sheet (CSV)".to_string()),
    ]));
    text
}

fn bracket_label(bracket: (f64, f64)) -> String {
    format!("Fee ({}\u{2013}{})", fmt_money(bracket.0, ""), fmt_money(bracket.1, ""))
}

fn push_agent_link(text: &mut String, agent_phone: Option<&str>, summary: &str) {
    if let Some(phone) = agent_phone {
        let link = whatsapp_link(phone, summary);
        text.push_str(&format!("\n<a href=\"{link}\">💬 Send this quote to our agent on WhatsApp</a>"));
    }
}

impl KwachaQuote {
    /// Telegram HTML rendering, with the agent handoff link when a phone is
    /// configured.
    pub fn render(&self, agent_phone: Option<&str>) -> String {
        let mut text = header("💸 Receive Kwacha");
        text.push_str(&calc_block([
            ("You receive", fmt_money(self.wanted_kwacha, "K")),
            (bracket_label(self.bracket).as_str(), fmt_money(self.fee, "K")),
            ("Total basis", fmt_money(self.total_basis, "K")),
            ("Rate (ZMW → RUB)", format!("{:.4}", self.rate.rub_per_zmw)),
            ("Rubles to send", fmt_money(self.rubles_to_send, "RUB")),
        ]));
        push_agent_link(&mut text, agent_phone, &self.plain_summary());
        text
    }

    /// One-line plain-text version used as the WhatsApp prefill.
    pub fn plain_summary(&self) -> String {
        format!(
            "Transfer quote: receive {}, fee {}, send {} at rate {:.4}",
            fmt_money(self.wanted_kwacha, "K"),
            fmt_money(self.fee, "K"),
            fmt_money(self.rubles_to_send, "RUB"),
            self.rate.rub_per_zmw,
        )
    }
}

impl RubleQuote {
    /// Telegram HTML rendering, with the agent handoff link when a phone is
    /// configured.
    pub fn render(&self, agent_phone: Option<&str>) -> String {
        let mut text = header("💶 Receive Rubles");
        text.push_str(&calc_block([
            ("You receive", fmt_money(self.wanted_rubles, "RUB")),
            ("Rate (ZMW → RUB)", format!("{:.4}", self.rate.rub_per_zmw)),
            ("Base amount", fmt_money(self.base_kwacha, "K")),
            (bracket_label(self.bracket).as_str(), fmt_money(self.fee, "K")),
            ("Total to send", fmt_money(self.total_kwacha, "K")),
        ]));
        push_agent_link(&mut text, agent_phone, &self.plain_summary());
        text
    }

    /// One-line plain-text version used as the WhatsApp prefill.
    pub fn plain_summary(&self) -> String {
        format!(
            "Transfer quote: receive {}, fee {}, send {} at rate {:.4}",
            fmt_money(self.wanted_rubles, "RUB"),
            fmt_money(self.fee, "K"),
            fmt_money(self.total_kwacha, "K"),
            self.rate.rub_per_zmw,
        )
    }
}

/// Renders the full fee table, one bracket per line.
pub fn render_fee_table(table: &FeeTable) -> String {
    let mut text = String::from("<b>📋 Fee table (Kwacha)</b>");
    for bracket in table.brackets() {
        text.push_str(&format!(
            "\n{}\u{2013}{} K → <b>{} K</b>",
            fmt_money(bracket.low, ""),
            fmt_money(bracket.high, ""),
            fmt_money(bracket.fee, ""),
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn rate(rub_per_zmw: f64) -> RateQuote {
        RateQuote {
            rub_per_zmw,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn parse_amount_accepts_spaces_and_comma_decimal() {
        assert_eq!(parse_amount("6500").unwrap(), 6500.0);
        assert_eq!(parse_amount("6 500,50").unwrap(), 6500.5);
        assert_eq!(parse_amount(" 100.25 ").unwrap(), 100.25);
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert!(matches!(parse_amount("abc"), Err(QuoteError::InvalidAmount { .. })));
        assert!(matches!(parse_amount(""), Err(QuoteError::InvalidAmount { .. })));
        assert!(matches!(parse_amount("1.2.3"), Err(QuoteError::InvalidAmount { .. })));
    }

    #[test]
    fn kwacha_quote_matches_worked_example() {
        // Worked example: rate 22.5, wanted 6500 → fee 325 → basis 6825 →
        // 153,562.50 RUB to send.
        let table = FeeTable::standard();
        let q = kwacha_received_quote(&table, rate(22.5), 6_500.0).unwrap();
        assert_eq!(q.fee, 325.0);
        assert_eq!(q.bracket, (6_500.0, 10_000.0));
        assert_eq!(q.total_basis, 6_825.0);
        assert_eq!(q.rubles_to_send, 153_562.5);
    }

    #[test]
    fn ruble_quote_matches_worked_example() {
        // Worked example: rate 22.5, wanted 100000 RUB → base 4444.44 → fee 150
        // (3500–6400 bracket) → total 4594.44 K.
        let table = FeeTable::standard();
        let q = ruble_received_quote(&table, rate(22.5), 100_000.0).unwrap();
        assert!((q.base_kwacha - 4_444.444_444).abs() < 1e-3);
        assert_eq!(q.fee, 150.0);
        assert_eq!(q.bracket, (3_500.0, 6_400.0));
        assert!((q.total_kwacha - 4_594.444_444).abs() < 1e-3);
    }

    #[test]
    fn quote_round_trips_within_tolerance() {
        let table = FeeTable::standard();
        for wanted in [100.0, 450.0, 1_250.0, 6_500.0, 19_999.0, 40_000.0] {
            let r = rate(22.5);
            let q = kwacha_received_quote(&table, r, wanted).unwrap();
            let recovered = q.rubles_to_send / r.rub_per_zmw;
            let expected = wanted + q.fee;
            assert!(
                ((recovered - expected) / expected).abs() < 1e-9,
                "round trip drifted for {wanted}: {recovered} vs {expected}"
            );
        }
    }

    #[test]
    fn out_of_range_amounts_are_rejected_before_lookup() {
        let table = FeeTable::standard();
        assert!(matches!(
            kwacha_received_quote(&table, rate(22.5), 99.0),
            Err(QuoteError::AmountOutOfRange { .. })
        ));
        assert!(matches!(
            kwacha_received_quote(&table, rate(22.5), 40_001.0),
            Err(QuoteError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn gap_amounts_are_an_explicit_no_match() {
        let table = FeeTable::standard();
        assert!(matches!(
            kwacha_received_quote(&table, rate(22.5), 451.0),
            Err(QuoteError::NoBracketMatch { .. })
        ));
    }

    #[test]
    fn ruble_quote_rejects_base_outside_bounds() {
        let table = FeeTable::standard();
        // 100 RUB at 22.5 → ~4.4 K base, below MIN_K.
        assert!(matches!(
            ruble_received_quote(&table, rate(22.5), 100.0),
            Err(QuoteError::AmountOutOfRange { .. })
        ));
        // Zero rate → infinite base.
        assert!(matches!(
            ruble_received_quote(&table, rate(0.0), 100_000.0),
            Err(QuoteError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn money_formatting_groups_thousands_and_trims_zero_cents() {
        assert_eq!(fmt_money(450.0, ""), "450");
        assert_eq!(fmt_money(6_500.0, "K"), "6,500 K");
        assert_eq!(fmt_money(153_562.5, "RUB"), "153,562.50 RUB");
        assert_eq!(fmt_money(4_444.444, "K"), "4,444.44 K");
        assert_eq!(fmt_money(1_000_000.0, ""), "1,000,000");
        assert_eq!(fmt_money(-1_234.5, "K"), "-1,234.50 K");
    }

    #[test]
    fn rendered_kwacha_quote_contains_block_and_link() {
        let table = FeeTable::standard();
        let q = kwacha_received_quote(&table, rate(22.5), 6_500.0).unwrap();
        let text = q.render(Some("260971234567"));

        assert!(text.starts_with("<b>💸 Receive Kwacha</b>\n<pre>"));
        assert!(text.contains("153,562.50 RUB"));
        assert!(text.contains("Fee (6,500\u{2013}10,000)"));
        assert!(text.contains("https://wa.me/260971234567?text="));
        // The prefill must be URL-encoded, so no raw spaces after `text=`.
        let prefill = text.split("text=").nth(1).unwrap();
        let prefill = prefill.split('"').next().unwrap();
        assert!(!prefill.contains(' '));
    }

    #[test]
    fn rendered_quote_omits_link_without_agent_phone() {
        let table = FeeTable::standard();
        let q = kwacha_received_quote(&table, rate(22.5), 6_500.0).unwrap();
        assert!(!q.render(None).contains("wa.me"));
    }

    #[test]
    fn rate_display_includes_inverse_and_source() {
        let text = render_rate(&rate(22.5));
        assert!(text.contains("22.5000"));
        assert!(text.contains("0.0444"));
        assert!(text.contains("Google Sheet (CSV)"));
        assert!(text.contains("UTC"));
    }

    #[test]
    fn fee_table_rendering_lists_every_bracket() {
        let table = FeeTable::standard();
        let text = render_fee_table(&table);
        assert!(text.contains("100\u{2013}450 K → <b>25 K</b>"));
        assert!(text.contains("20,001\u{2013}40,000 K → <b>1,000 K</b>"));
        assert_eq!(text.lines().count(), 1 + table.brackets().len());
    }
}
