//! Bot initialization, command enum and the fixed reply-keyboard menu.

use std::time::Duration;

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, KeyboardButton, KeyboardMarkup};
use teloxide::utils::command::BotCommands;

/// Fixed menu labels. Incoming message text is matched against these
/// verbatim, so the emoji are part of the protocol.
pub const BTN_RATE: &str = "📈 Google rate";
pub const BTN_KWACHA: &str = "💸 Receive Kwacha";
pub const BTN_RUBLES: &str = "💶 Receive Rubles";
pub const BTN_FEES: &str = "ℹ️ Fees";

/// Timeout for Telegram API calls themselves (not the rate fetch, which has
/// its own budget from settings).
const BOT_CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Slash commands mirroring the reply-keyboard menu.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "I can:")]
pub enum Command {
    #[command(description = "show the main menu")]
    Start,
    #[command(description = "current Google Sheet rate")]
    Rate,
    #[command(description = "fee table")]
    Fees,
    #[command(description = "quote an amount to receive in Kwacha")]
    Kwacha,
    #[command(description = "quote an amount to receive in Rubles")]
    Rubles,
}

/// Creates a Bot instance with a timeout-configured client and an optional
/// custom API URL from `BOT_API_URL`.
pub fn create_bot(token: &str) -> anyhow::Result<Bot> {
    let client = ClientBuilder::new().timeout(BOT_CLIENT_TIMEOUT).build()?;
    let bot = Bot::with_client(token, client);

    if let Ok(bot_api_url) = std::env::var("BOT_API_URL") {
        log::info!("Using custom Bot API URL: {}", bot_api_url);
        let url = url::Url::parse(&bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
        return Ok(bot.set_api_url(url));
    }

    Ok(bot)
}

/// Sets up slash commands in the Telegram UI.
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(vec![
        BotCommand::new("start", "show the main menu"),
        BotCommand::new("rate", "current Google Sheet rate"),
        BotCommand::new("fees", "fee table"),
        BotCommand::new("kwacha", "quote an amount to receive in Kwacha"),
        BotCommand::new("rubles", "quote an amount to receive in Rubles"),
    ])
    .await?;

    Ok(())
}

/// The four-option reply keyboard attached to every reply.
pub fn menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(BTN_RATE)],
        vec![KeyboardButton::new(BTN_KWACHA), KeyboardButton::new(BTN_RUBLES)],
        vec![KeyboardButton::new(BTN_FEES)],
    ])
    .resize_keyboard()
    .persistent()
    .input_field_placeholder("Choose an option…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_descriptions_cover_the_menu() {
        let descriptions = format!("{}", Command::descriptions());
        assert!(descriptions.contains("I can:"));
        for cmd in ["start", "rate", "fees", "kwacha", "rubles"] {
            assert!(descriptions.contains(cmd), "missing /{cmd}");
        }
    }

    #[test]
    fn keyboard_has_four_menu_options() {
        let keyboard = menu_keyboard();
        let buttons: usize = keyboard.keyboard.iter().map(|row| row.len()).sum();
        assert_eq!(buttons, 4);
    }
}
