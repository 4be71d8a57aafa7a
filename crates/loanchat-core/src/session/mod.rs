//! Conversation session coordination.
//!
//! A `ConversationSession` owns the session identity, sequences calls to the
//! conversation engine, feeds each result to the dispatcher, and applies the
//! resulting effects through a [`Renderer`].

mod chat;
mod manager;
mod types;


pub use manager::ConversationSession;
pub use types::{Renderer, TurnOutcome, UploadStatus};
