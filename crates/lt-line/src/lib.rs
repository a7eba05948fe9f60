//! lt-line: LINE webhook for line-translator
//!
//! Receives text messages from the LINE Messaging API, runs them through
//! translation, transliteration, speech synthesis and knowledge-base
//! lookup, and replies with the composed text and audio messages.

pub mod api;
pub mod bot;
pub mod error;
pub mod handler;
pub mod types;
pub mod webhook;

pub use bot::LineBot;
pub use error::{LineError, Result};
pub use handler::MessageHandler;
