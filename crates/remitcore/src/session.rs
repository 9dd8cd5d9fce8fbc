//! Per-chat conversation state.
//!
//! The only mutable state in the whole bot: a volatile flag saying whether a
//! chat is mid-way through one of the two amount-entry forms. Keyed by the
//! transport's chat id and owned here, outside the quote logic — handlers
//! read the state by value, decide, and write the next state back.

use dashmap::DashMap;

/// Where a chat currently is in the two-step quote forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingKwachaAmount,
    AwaitingRubleAmount,
}

/// Volatile map of chat id → conversation state. Chats that were never seen,
/// or whose form completed, are simply absent and read as `Idle`.
#[derive(Debug, Default)]
pub struct SessionStore {
    states: DashMap<i64, ConversationState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a chat; `Idle` when unknown.
    pub fn get(&self, chat_id: i64) -> ConversationState {
        self.states.get(&chat_id).map(|s| *s).unwrap_or_default()
    }

    /// Stores the next state. Setting `Idle` removes the entry so the map
    /// only holds chats that are actually mid-form.
    pub fn set(&self, chat_id: i64, state: ConversationState) {
        if state == ConversationState::Idle {
            self.states.remove(&chat_id);
        } else {
            self.states.insert(chat_id, state);
        }
    }

    /// Back to `Idle`, whatever the current state.
    pub fn reset(&self, chat_id: i64) {
        self.states.remove(&chat_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_chats_are_idle() {
        let store = SessionStore::new();
        assert_eq!(store.get(12345), ConversationState::Idle);
    }

    #[test]
    fn set_and_reset_round_trip() {
        let store = SessionStore::new();
        store.set(1, ConversationState::AwaitingKwachaAmount);
        assert_eq!(store.get(1), ConversationState::AwaitingKwachaAmount);

        store.set(1, ConversationState::AwaitingRubleAmount);
        assert_eq!(store.get(1), ConversationState::AwaitingRubleAmount);

        store.reset(1);
        assert_eq!(store.get(1), ConversationState::Idle);
    }

    #[test]
    fn states_are_per_chat() {
        let store = SessionStore::new();
        store.set(1, ConversationState::AwaitingKwachaAmount);
        store.set(2, ConversationState::AwaitingRubleAmount);
        assert_eq!(store.get(1), ConversationState::AwaitingKwachaAmount);
        assert_eq!(store.get(2), ConversationState::AwaitingRubleAmount);
        assert_eq!(store.get(3), ConversationState::Idle);
    }

    #[test]
    fn setting_idle_clears_the_entry() {
        let store = SessionStore::new();
        store.set(7, ConversationState::AwaitingKwachaAmount);
        store.set(7, ConversationState::Idle);
        assert_eq!(store.get(7), ConversationState::Idle);
    }
}
