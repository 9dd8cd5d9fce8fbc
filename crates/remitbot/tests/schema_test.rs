//! The dispatcher schema must build from plain settings, and the command
//! enum must parse the slash commands the menu advertises.

use std::sync::Arc;
use std::time::Duration;

use teloxide::utils::command::BotCommands;

use remitbot::{schema, Command, HandlerDeps};
use remitcore::fees::FeeTable;
use remitcore::{RateSource, SessionStore, Settings};

fn test_deps() -> HandlerDeps {
    let settings = Settings {
        sheet_url: "https://docs.google.com/spreadsheets/d/1AbC/edit#gid=0".to_string(),
        agent_phone: Some("260971234567".to_string()),
        fetch_timeout: Duration::from_secs(2),
        fee_table: FeeTable::standard(),
    };
    let rate_source =
        RateSource::new(&settings.sheet_url, settings.fetch_timeout).expect("failed to build rate source");
    HandlerDeps::new(Arc::new(settings), Arc::new(rate_source), Arc::new(SessionStore::new()))
}

#[test]
fn schema_builds_from_settings() {
    let _handler = schema(test_deps());
}

#[test]
fn rate_source_normalizes_share_link_at_construction() {
    let deps = test_deps();
    assert_eq!(
        deps.rate_source.csv_url(),
        "https://docs.google.com/spreadsheets/d/1AbC/export?format=csv&gid=0"
    );
}

#[test]
fn slash_commands_parse() {
    assert!(matches!(Command::parse("/start", "remitbot"), Ok(Command::Start)));
    assert!(matches!(Command::parse("/rate", "remitbot"), Ok(Command::Rate)));
    assert!(matches!(Command::parse("/fees", "remitbot"), Ok(Command::Fees)));
    assert!(matches!(Command::parse("/kwacha", "remitbot"), Ok(Command::Kwacha)));
    assert!(matches!(Command::parse("/rubles", "remitbot"), Ok(Command::Rubles)));
    assert!(Command::parse("6500", "remitbot").is_err());
}
