//! Rolling conversation log with a hard length cap.
//!
//! [`ConversationHistory`] keeps the most recent dialogue turns and hands
//! out immutable snapshots for the reply-generation request. The buffer is
//! owned solely by the voice loop; collaborators only ever see copies.
//!
//! Eviction is one entry at a time: after every push, the single oldest
//! turn is dropped until the buffer is back under the cap. Turns arrive in
//! user/assistant pairs, so once the buffer is full its head alternates
//! between the two roles — that asymmetry is intentional and covered by
//! tests.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Role / ConversationTurn
// ---------------------------------------------------------------------------

/// Who produced a turn. Serialized lowercase to match the chat wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One dialogue turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ConversationHistory
// ---------------------------------------------------------------------------

/// Ordered dialogue log, capped at `max_turns` entries.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: VecDeque<ConversationTurn>,
    max_turns: usize,
}

impl ConversationHistory {
    /// Create a history capped at `max_turns` entries.
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_turns + 1),
            max_turns,
        }
    }

    /// Append a turn, then evict single oldest entries until the cap holds.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.max_turns {
            self.turns.pop_front();
        }
    }

    /// Immutable copy of the current turns, oldest first.
    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.turns.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(10)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let history = ConversationHistory::default();
        assert!(history.is_empty());
        assert!(history.snapshot().is_empty());
    }

    /// The cap holds after every single push, for any push sequence.
    #[test]
    fn length_never_exceeds_cap() {
        let mut history = ConversationHistory::new(10);
        for i in 0..37 {
            history.push(ConversationTurn::user(format!("turn {i}")));
            assert!(history.len() <= 10, "cap broken at push {i}");
        }
        assert_eq!(history.len(), 10);
    }

    /// Eviction removes exactly the single oldest entry.
    #[test]
    fn eviction_drops_oldest_first() {
        let mut history = ConversationHistory::new(3);
        history.push(ConversationTurn::user("a"));
        history.push(ConversationTurn::assistant("b"));
        history.push(ConversationTurn::user("c"));
        history.push(ConversationTurn::assistant("d"));

        let snapshot = history.snapshot();
        let contents: Vec<&str> = snapshot.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["b", "c", "d"]);
    }

    /// Turns arrive in user/assistant pairs; with an even cap the buffer
    /// stays role-aligned, evicting one entry per push once full.
    #[test]
    fn paired_appends_respect_cap() {
        let mut history = ConversationHistory::new(10);
        for round in 0..8 {
            history.push(ConversationTurn::user(format!("question {round}")));
            assert!(history.len() <= 10);
            history.push(ConversationTurn::assistant(format!("answer {round}")));
            assert!(history.len() <= 10);
        }

        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 10);
        // The oldest surviving entry is the user turn of round 3.
        assert_eq!(snapshot[0], ConversationTurn::user("question 3"));
        assert_eq!(snapshot[9], ConversationTurn::assistant("answer 7"));
    }

    /// Snapshots are copies — mutating the history later does not change a
    /// snapshot already taken.
    #[test]
    fn snapshot_is_detached() {
        let mut history = ConversationHistory::new(5);
        history.push(ConversationTurn::user("hello"));
        let snapshot = history.snapshot();

        history.push(ConversationTurn::assistant("world"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn roles_serialize_lowercase() {
        let turn = ConversationTurn::assistant("hi");
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"role\":\"assistant\""));

        let back: ConversationTurn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, turn);
    }
}
