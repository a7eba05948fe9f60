//! Languages handled by the translation pipeline
//!
//! The translator is always asked for the same four targets. Which of them
//! end up in a [`TranslationContext`] depends on the detected source
//! language.

use serde::{Deserialize, Serialize};

/// A language as reported by the translator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    English,
    TraditionalChinese,
    Japanese,
    Korean,
    /// Any language outside the fixed target set
    Other(String),
}

impl Language {
    /// Targets requested on every translate call, in request order
    pub const TARGETS: [Language; 4] = [
        Language::English,
        Language::TraditionalChinese,
        Language::Japanese,
        Language::Korean,
    ];

    /// Translator language code
    pub fn code(&self) -> &str {
        match self {
            Self::English => "en",
            Self::TraditionalChinese => "zh-Hant",
            Self::Japanese => "ja",
            Self::Korean => "ko",
            Self::Other(code) => code,
        }
    }
}

impl From<&str> for Language {
    fn from(code: &str) -> Self {
        match code {
            "en" => Self::English,
            "zh-Hant" => Self::TraditionalChinese,
            "ja" => Self::Japanese,
            "ko" => Self::Korean,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Language {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_string()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-request translation state
///
/// Each field is either absent or holds the latest translation for that
/// language. It replaces any framework-managed session: the handler builds
/// one per message and passes it down the call chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationContext {
    /// Language the translator detected for the input
    pub detected: Language,
    pub en: Option<String>,
    pub zh_hant: Option<String>,
    pub ja: Option<String>,
    pub ko: Option<String>,
}

impl TranslationContext {
    /// Empty context for a detected language
    pub fn new(detected: Language) -> Self {
        Self {
            detected,
            en: None,
            zh_hant: None,
            ja: None,
            ko: None,
        }
    }

    /// Build a context from translator output.
    ///
    /// `translations` pairs each returned text with the language it was
    /// translated to. Which targets are kept depends on `detected`:
    /// English input keeps all four, Chinese and Japanese input drop their
    /// own language, anything else drops Korean.
    pub fn from_response<I, S>(detected: Language, translations: I) -> Self
    where
        I: IntoIterator<Item = (Language, S)>,
        S: Into<String>,
    {
        let mut ctx = Self::new(detected);
        for (target, text) in translations {
            if ctx.keeps(&target) {
                ctx.set(&target, text.into());
            }
        }
        ctx
    }

    /// Whether a translation into `target` is stored for this source
    fn keeps(&self, target: &Language) -> bool {
        match (&self.detected, target) {
            (_, Language::Other(_)) => false,
            (Language::English, _) => true,
            (Language::TraditionalChinese, Language::TraditionalChinese) => false,
            (Language::Japanese, Language::Japanese) => false,
            (Language::TraditionalChinese | Language::Japanese, _) => true,
            (_, Language::Korean) => false,
            _ => true,
        }
    }

    fn set(&mut self, target: &Language, text: String) {
        match target {
            Language::English => self.en = Some(text),
            Language::TraditionalChinese => self.zh_hant = Some(text),
            Language::Japanese => self.ja = Some(text),
            Language::Korean => self.ko = Some(text),
            Language::Other(_) => {}
        }
    }

    /// Stored translation for `target`
    pub fn get(&self, target: &Language) -> Option<&str> {
        match target {
            Language::English => self.en.as_deref(),
            Language::TraditionalChinese => self.zh_hant.as_deref(),
            Language::Japanese => self.ja.as_deref(),
            Language::Korean => self.ko.as_deref(),
            Language::Other(_) => None,
        }
    }

    /// Text to use for `target`: the stored translation, or the input
    /// itself when it was already written in that language.
    pub fn text_in<'a>(&'a self, target: &Language, source_text: &'a str) -> Option<&'a str> {
        if &self.detected == target {
            return Some(source_text);
        }
        self.get(target)
    }

    /// Populated translations other than the source language, newline-joined
    pub fn summary(&self) -> String {
        Language::TARGETS
            .iter()
            .filter(|target| **target != self.detected)
            .filter_map(|target| self.get(target))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
