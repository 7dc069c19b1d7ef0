//! Bounded per-user conversation history

use std::collections::VecDeque;

use dashmap::DashMap;

use crate::models::ChatTurn;
use crate::models::Role;

/// Number of turns kept per user when no limit is configured
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// In-memory chat history keyed by user id. Each user's turns are capped at
/// `limit`, evicting the oldest first.
pub struct ChatHistoryStore {
    histories: DashMap<String, VecDeque<ChatTurn>>,
    limit: usize,
}

impl ChatHistoryStore {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            histories: DashMap::new(),
            limit,
        }
    }

    /// Snapshot of the user's turns, oldest first
    #[must_use]
    pub fn recent(&self, user_id: &str) -> Vec<ChatTurn> {
        self.histories
            .get(user_id)
            .map(|turns| turns.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Append a user turn and the assistant's answer under one entry lock
    pub fn append_exchange(&self, user_id: &str, user_text: &str, assistant_text: &str) {
        let mut turns = self.histories.entry(user_id.to_string()).or_default();
        turns.push_back(ChatTurn::new(Role::User, user_text));
        turns.push_back(ChatTurn::new(Role::Assistant, assistant_text));
        truncate_front(&mut turns, self.limit);
    }

    /// Empty the user's history. Returns whether the user had one.
    pub fn clear(&self, user_id: &str) -> bool {
        match self.histories.get_mut(user_id) {
            Some(mut turns) => {
                turns.clear();
                true
            }
            None => false,
        }
    }

    /// Number of users with a history entry
    pub fn user_count(&self) -> usize {
        self.histories.len()
    }
}

impl Default for ChatHistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

fn truncate_front(turns: &mut VecDeque<ChatTurn>, limit: usize) {
    while turns.len() > limit {
        turns.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_exchange() {
        let store = ChatHistoryStore::default();
        store.append_exchange("farmer-1", "Hello", "Hi there!");

        let turns = store.recent("farmer-1");
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].content, "Hello");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].content, "Hi there!");
    }

    #[test]
    fn test_history_limit_keeps_most_recent() {
        let store = ChatHistoryStore::default();
        for i in 0..6 {
            store.append_exchange("farmer-1", &format!("q{i}"), &format!("a{i}"));
        }

        let turns = store.recent("farmer-1");
        assert_eq!(turns.len(), 10);
        assert_eq!(turns[0].content, "q1");
        assert_eq!(turns[9].content, "a5");
        let contents: Vec<&str> = turns.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(
            contents,
            ["q1", "a1", "q2", "a2", "q3", "a3", "q4", "a4", "q5", "a5"]
        );
    }

    #[test]
    fn test_odd_limit_evicts_single_turns() {
        let store = ChatHistoryStore::new(3);
        for i in 0..3 {
            store.append_exchange("u", &format!("q{i}"), &format!("a{i}"));
        }
        let contents: Vec<String> = store.recent("u").into_iter().map(|t| t.content).collect();
        assert_eq!(contents, ["a1", "q2", "a2"]);
    }

    #[test]
    fn test_unknown_user_has_empty_history() {
        let store = ChatHistoryStore::default();
        assert!(store.recent("nobody").is_empty());
        assert_eq!(store.user_count(), 0);
    }

    #[test]
    fn test_clear() {
        let store = ChatHistoryStore::default();
        store.append_exchange("farmer-1", "Hello", "Hi");

        assert!(store.clear("farmer-1"));
        assert!(store.recent("farmer-1").is_empty());
        // A cleared user keeps an (empty) entry
        assert!(store.clear("farmer-1"));
        assert!(!store.clear("farmer-2"));
    }

    #[test]
    fn test_users_are_isolated() {
        let store = ChatHistoryStore::default();
        store.append_exchange("a", "qa", "aa");
        store.append_exchange("b", "qb", "ab");
        assert_eq!(store.recent("a")[0].content, "qa");
        assert_eq!(store.recent("b")[0].content, "qb");
        assert_eq!(store.user_count(), 2);
    }
}
