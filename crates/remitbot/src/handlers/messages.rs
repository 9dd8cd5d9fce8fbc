//! The amount-entry step of the two-step quote forms.
//!
//! State policy (see DESIGN.md): an unparsable amount re-prompts and keeps
//! the chat in its Awaiting state; every other outcome — a rendered quote, an
//! out-of-range or no-bracket rejection, or a failed rate fetch — returns the
//! chat to Idle.

use teloxide::prelude::*;
use teloxide::types::{Message, ParseMode};

use remitcore::quote::{fmt_money, kwacha_received_quote, parse_amount, ruble_received_quote};
use remitcore::{ConversationState, QuoteError};

use super::types::{HandlerDeps, HandlerError};
use crate::bot::menu_keyboard;

/// Handles free text from a chat that is in one of the Awaiting states.
pub(super) async fn handle_amount_message(
    bot: &Bot,
    msg: &Message,
    deps: &HandlerDeps,
    state: ConversationState,
) -> Result<(), HandlerError> {
    let chat_id = msg.chat.id;
    let text = msg.text().unwrap_or_default();

    let wanted = match parse_amount(text) {
        Ok(amount) => amount,
        Err(e) => {
            // Re-prompt within the same state; the next message gets another try.
            log::info!("Unparsable amount from chat {}: {:?}", chat_id, text);
            bot.send_message(chat_id, failure_text(&e, deps)).await?;
            return Ok(());
        }
    };

    let rate = match deps.rate_source.fetch().await {
        Ok(rate) => rate,
        Err(e) => {
            log::error!("Rate fetch failed mid-form for chat {}: {}", chat_id, e);
            deps.sessions.reset(chat_id.0);
            bot.send_message(chat_id, failure_text(&QuoteError::RateUnavailable(e), deps))
                .reply_markup(menu_keyboard())
                .await?;
            return Ok(());
        }
    };

    let table = &deps.settings.fee_table;
    let agent_phone = deps.settings.agent_phone.as_deref();
    let rendered = match state {
        ConversationState::AwaitingKwachaAmount => {
            kwacha_received_quote(table, rate, wanted).map(|q| q.render(agent_phone))
        }
        ConversationState::AwaitingRubleAmount => {
            ruble_received_quote(table, rate, wanted).map(|q| q.render(agent_phone))
        }
        // The schema filter only routes Awaiting chats here.
        ConversationState::Idle => return Ok(()),
    };

    deps.sessions.reset(chat_id.0);
    match rendered {
        Ok(text) => {
            bot.send_message(chat_id, text)
                .parse_mode(ParseMode::Html)
                .reply_markup(menu_keyboard())
                .await?;
        }
        Err(e) => {
            log::info!("Quote rejected for chat {}: {}", chat_id, e);
            bot.send_message(chat_id, failure_text(&e, deps))
                .reply_markup(menu_keyboard())
                .await?;
        }
    }
    Ok(())
}

/// Plain-language failure message for each error kind. No failure is ever
/// swallowed into a default quote.
fn failure_text(err: &QuoteError, deps: &HandlerDeps) -> String {
    let table = &deps.settings.fee_table;
    match err {
        QuoteError::RateUnavailable(_) => {
            "Sorry, the rate could not be fetched right now. Please try again from the menu.".to_string()
        }
        QuoteError::InvalidAmount { input } => {
            format!("\"{input}\" doesn't look like a number. Please send an amount like 6500 or 6 500,50.")
        }
        QuoteError::AmountOutOfRange { .. } => format!(
            "Amounts from {} K to {} K are supported. Please start again from the menu.",
            fmt_money(table.min_kwacha(), ""),
            fmt_money(table.max_kwacha(), ""),
        ),
        QuoteError::NoBracketMatch { amount } => format!(
            "No fee is defined for {} — this amount is not supported. See the fee table for covered ranges.",
            fmt_money(*amount, "K"),
        ),
    }
}
