//! lt-azure: Azure Cognitive Services clients for line-translator
//!
//! Thin REST clients for the services the reply pipeline talks to:
//!
//! - **Translator**: text translation into the four target languages and
//!   transliteration into Latin script
//! - **Speech**: text-to-speech into WAV files with measured duration
//! - **Question answering**: best-matching answer from a custom knowledge base
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lt_azure::{SpeechClient, TranslatorClient, Voice};
//!
//! let translator = TranslatorClient::new(&config.translator)?;
//! let ctx = translator.translate("Good morning").await?;
//!
//! let speech = SpeechClient::new(&config.speech, &config.server.static_dir)?;
//! let audio = speech.synthesize(ctx.zh_hant.as_deref().unwrap_or_default(), Voice::ZH_TW).await?;
//! println!("{} ms", audio.duration_ms);
//! ```

pub mod error;
pub mod qna;
pub mod speech;
pub mod translator;

pub use error::{AzureError, Result};
pub use qna::QnaClient;
pub use speech::{SpeechClient, Synthesis, Voice};
pub use translator::{Script, TranslatorClient};
