//! lt-core: shared types for line-translator
//!
//! Configuration loading, the language model used by the translation
//! pipeline, and the per-request translation context.

pub mod config;
pub mod error;
pub mod language;

pub use config::{
    Config, DeployConfig, LineConfig, QnaConfig, ReplyConfig, ServerConfig, SpeechConfig,
    TranslatorConfig,
};
pub use error::{Error, Result};
pub use language::{Language, TranslationContext};
