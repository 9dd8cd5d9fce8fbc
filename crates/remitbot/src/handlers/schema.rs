//! Dispatcher schema and handler chain builders.

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use remitcore::ConversationState;

use super::commands::{handle_fees, handle_rate, handle_receive_kwacha, handle_receive_rubles, handle_start};
use super::messages::handle_amount_message;
use super::types::{HandlerDeps, HandlerError};
use crate::bot::{Command, BTN_FEES, BTN_KWACHA, BTN_RATE, BTN_RUBLES};

/// Creates the main dispatcher schema for the bot.
///
/// The same schema runs in production and in integration tests. Order
/// matters: slash commands first, then the fixed menu labels, then free text
/// from chats that are mid-form.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_menu = deps.clone();

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(menu_handler(deps_menu))
        .branch(amount_handler(deps))
}

/// Handler for slash commands (/start, /rate, /fees, /kwacha, /rubles).
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("Received command {:?} from chat {}", cmd, msg.chat.id);
                match cmd {
                    Command::Start => handle_start(&bot, &msg, &deps).await,
                    Command::Rate => handle_rate(&bot, &msg, &deps).await,
                    Command::Fees => handle_fees(&bot, &msg, &deps).await,
                    Command::Kwacha => handle_receive_kwacha(&bot, &msg, &deps).await,
                    Command::Rubles => handle_receive_rubles(&bot, &msg, &deps).await,
                }
            }
        },
    ))
}

/// Handler for the fixed reply-keyboard labels.
fn menu_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| {
            msg.text()
                .map(|text| matches!(text, BTN_RATE | BTN_KWACHA | BTN_RUBLES | BTN_FEES))
                .unwrap_or(false)
        })
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                match msg.text() {
                    Some(BTN_RATE) => handle_rate(&bot, &msg, &deps).await,
                    Some(BTN_KWACHA) => handle_receive_kwacha(&bot, &msg, &deps).await,
                    Some(BTN_RUBLES) => handle_receive_rubles(&bot, &msg, &deps).await,
                    Some(BTN_FEES) => handle_fees(&bot, &msg, &deps).await,
                    _ => Ok(()),
                }
            }
        })
}

/// Handler for free text while a chat is in an Awaiting state.
fn amount_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let sessions = deps.sessions.clone();

    Update::filter_message()
        .filter(move |msg: Message| {
            msg.text().is_some() && sessions.get(msg.chat.id.0) != ConversationState::Idle
        })
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let state = deps.sessions.get(msg.chat.id.0);
                handle_amount_message(&bot, &msg, &deps, state).await
            }
        })
}
