//! Text-to-speech synthesis
//!
//! Calls the Azure Speech REST endpoint, stores the returned WAV in the
//! static directory and measures its duration for LINE audio messages.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use reqwest::Client;
use tracing::{debug, info};

use lt_core::SpeechConfig;

use crate::error::{AzureError, Result};

/// A neural voice and the file its output is stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    pub name: &'static str,
    pub locale: &'static str,
    pub file_name: &'static str,
}

impl Voice {
    pub const ZH_TW: Voice = Voice {
        name: "zh-TW-YunJheNeural",
        locale: "zh-TW",
        file_name: "outputaudio_hant.wav",
    };

    pub const JA_JP: Voice = Voice {
        name: "ja-JP-NanamiNeural",
        locale: "ja-JP",
        file_name: "outputaudio_ja.wav",
    };

    pub const KO_KR: Voice = Voice {
        name: "ko-KR-InJoonNeural",
        locale: "ko-KR",
        file_name: "outputaudio_ko.wav",
    };

    /// SSML document speaking `text` with this voice
    pub fn ssml(&self, text: &str) -> String {
        format!(
            "<speak version='1.0' xml:lang='{locale}'><voice xml:lang='{locale}' name='{name}'>{text}</voice></speak>",
            locale = self.locale,
            name = self.name,
            text = quick_xml::escape::escape(text),
        )
    }
}

/// Result of a synthesis call
#[derive(Debug, Clone)]
pub struct Synthesis {
    /// Where the WAV file was written
    pub path: PathBuf,
    /// File name inside the static directory
    pub file_name: &'static str,
    /// Audio length in milliseconds
    pub duration_ms: u64,
}

/// Duration of a WAV file in milliseconds, rounded
pub fn wav_duration_ms(wav: &[u8]) -> Result<u64> {
    let reader = hound::WavReader::new(Cursor::new(wav))?;
    let sample_rate = reader.spec().sample_rate;
    if sample_rate == 0 {
        return Err(AzureError::ParseError("WAV sample rate is zero".to_string()));
    }
    let frames = u64::from(reader.duration());
    Ok((frames * 1000 + u64::from(sample_rate) / 2) / u64::from(sample_rate))
}

/// Azure Speech synthesis client
#[derive(Clone)]
pub struct SpeechClient {
    client: Client,
    key: String,
    endpoint: String,
    output_format: String,
    static_dir: PathBuf,
}

impl SpeechClient {
    /// Create a new speech client writing into `static_dir`
    pub fn new(config: &SpeechConfig, static_dir: impl AsRef<Path>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| AzureError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            key: config.key.clone(),
            endpoint: config.endpoint(),
            output_format: config.output_format.clone(),
            static_dir: static_dir.as_ref().to_path_buf(),
        })
    }

    /// Synthesize `text` with `voice` and store it as the voice's file
    pub async fn synthesize(&self, text: &str, voice: Voice) -> Result<Synthesis> {
        let url = format!("{}/cognitiveservices/v1", self.endpoint);

        info!("Synthesizing speech: {} chars using {}", text.chars().count(), voice.name);
        debug!("Output format: {}", self.output_format);

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", &self.output_format)
            .header("User-Agent", "line-translator")
            .body(voice.ssml(text))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AzureError::from_response(response).await);
        }

        let audio = response.bytes().await?;
        let duration_ms = wav_duration_ms(&audio)?;

        let path = self.static_dir.join(voice.file_name);
        tokio::fs::write(&path, &audio).await?;

        info!(
            "Speech synthesized, saved {} bytes to {} ({} ms)",
            audio.len(),
            path.display(),
            duration_ms
        );

        Ok(Synthesis {
            path,
            file_name: voice.file_name,
            duration_ms,
        })
    }
}
