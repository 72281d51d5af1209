//! Reply-generation collaborator boundary.
//!
//! Each interaction round sends the transcribed utterance plus a snapshot of
//! the conversation history to a hosted chat-completions service and gets
//! the robot's reply back.

pub mod responder;

pub use responder::{ChatApiResponder, ChatError, Responder};
