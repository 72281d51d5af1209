//! Bounded conversation memory shared with the reply-generation service.

pub mod history;

pub use history::{ConversationHistory, ConversationTurn, Role};
