//! Menu and slash-command handlers.
//!
//! Every menu action resets the conversation state first: picking a menu
//! option while a form is half-filled abandons the form.

use teloxide::prelude::*;
use teloxide::types::{Message, ParseMode};

use remitcore::quote::{fmt_money, render_fee_table, render_rate};
use remitcore::ConversationState;

use super::types::{HandlerDeps, HandlerError};
use crate::bot::menu_keyboard;

/// Handle /start: reset state, show the quick menu.
pub(super) async fn handle_start(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    deps.sessions.reset(msg.chat.id.0);

    let text = "<b>🚀 MONEY TRANSFER — Quick Menu</b>\n\
                • 📈 Google rate\n\
                • 💸 Receive Kwacha\n\
                • 💶 Receive Rubles\n\
                • ℹ️ Fees\n";
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(menu_keyboard())
        .await?;
    Ok(())
}

/// Handle the fee-table request.
pub(super) async fn handle_fees(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    deps.sessions.reset(msg.chat.id.0);

    bot.send_message(msg.chat.id, render_fee_table(&deps.settings.fee_table))
        .parse_mode(ParseMode::Html)
        .reply_markup(menu_keyboard())
        .await?;
    Ok(())
}

/// Handle the plain rate display: one fresh fetch, no caching.
pub(super) async fn handle_rate(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    deps.sessions.reset(msg.chat.id.0);

    match deps.rate_source.fetch().await {
        Ok(rate) => {
            bot.send_message(msg.chat.id, render_rate(&rate))
                .parse_mode(ParseMode::Html)
                .reply_markup(menu_keyboard())
                .await?;
        }
        Err(e) => {
            log::error!("Rate fetch failed for chat {}: {}", msg.chat.id, e);
            bot.send_message(msg.chat.id, "Sorry, the rate could not be fetched right now. Please try again.")
                .reply_markup(menu_keyboard())
                .await?;
        }
    }
    Ok(())
}

/// Start the Kwacha-received form: prompt and wait for the amount.
pub(super) async fn handle_receive_kwacha(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    deps.sessions.set(msg.chat.id.0, ConversationState::AwaitingKwachaAmount);
    bot.send_message(msg.chat.id, amount_prompt(deps, "Kwacha the recipient should get"))
        .await?;
    Ok(())
}

/// Start the Ruble-received form: prompt and wait for the amount.
pub(super) async fn handle_receive_rubles(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    deps.sessions.set(msg.chat.id.0, ConversationState::AwaitingRubleAmount);
    bot.send_message(msg.chat.id, amount_prompt(deps, "Rubles the recipient should get"))
        .await?;
    Ok(())
}

fn amount_prompt(deps: &HandlerDeps, what: &str) -> String {
    let table = &deps.settings.fee_table;
    format!(
        "Enter the amount of {what} (supported range {}\u{2013}{} K):",
        fmt_money(table.min_kwacha(), ""),
        fmt_money(table.max_kwacha(), ""),
    )
}
