//! Configuration management
//!
//! Settings are resolved in this order:
//! 1. Environment variables
//! 2. `line-translator.toml` configuration file
//! 3. Default values
//!
//! `${VAR_NAME}` inside the configuration file expands to the value of the
//! environment variable.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "line-translator.toml";

/// Main configuration for line-translator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub line: LineConfig,
    pub server: ServerConfig,
    pub deploy: DeployConfig,
    pub translator: TranslatorConfig,
    pub speech: SpeechConfig,
    pub question_answering: QnaConfig,
    pub reply: ReplyConfig,
}

/// LINE Messaging API credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    pub channel_secret: String,
    pub channel_access_token: String,
    /// Messaging API base URL
    pub api_base_url: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_secret: String::new(),
            channel_access_token: String::new(),
            api_base_url: "https://api.line.me/v2".to_string(),
        }
    }
}

/// Webhook server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory synthesized audio is written to and served from
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            static_dir: "static".to_string(),
        }
    }
}

/// Public deployment settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Public base URL, used to build audio links sent to LINE
    pub url: String,
}

impl DeployConfig {
    /// Public URL of a file in the static directory
    pub fn static_url(&self, file_name: &str) -> String {
        format!("{}/static/{}", self.url.trim_end_matches('/'), file_name)
    }
}

/// Azure Translator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub key: String,
    pub region: String,
    pub endpoint: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            region: String::new(),
            endpoint: "https://api.cognitive.microsofttranslator.com".to_string(),
        }
    }
}

/// Azure Speech settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub key: String,
    pub region: String,
    /// Overrides the regional endpoint
    pub endpoint: Option<String>,
    /// `X-Microsoft-OutputFormat` value; must be a RIFF (WAV) format
    pub output_format: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            region: String::new(),
            endpoint: None,
            output_format: "riff-24khz-16bit-mono-pcm".to_string(),
        }
    }
}

impl SpeechConfig {
    /// Effective synthesis endpoint
    pub fn endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.tts.speech.microsoft.com", self.region),
        }
    }
}

/// Azure custom question answering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QnaConfig {
    pub endpoint: String,
    pub key: String,
    pub project_name: String,
    pub deployment_name: String,
    pub api_version: String,
}

impl Default for QnaConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            key: String::new(),
            project_name: String::new(),
            deployment_name: "production".to_string(),
            api_version: "2021-10-01".to_string(),
        }
    }
}

/// Which optional languages are added to the reply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyConfig {
    pub include_japanese: bool,
    pub include_korean: bool,
}

impl Config {
    /// Expand `${VAR_NAME}` references with environment variable values.
    ///
    /// Unset variables expand to an empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Parse configuration from TOML text, expanding environment references
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let expanded = Self::expand_env_vars(content);
        toml::from_str(&expanded).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from a TOML file.
    ///
    /// Environment variables override values from the file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut cfg = Self::from_toml_str(&content)?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg
    }

    /// Load configuration.
    ///
    /// Uses `path` when given, otherwise `./line-translator.toml` if it
    /// exists, otherwise the environment alone.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let cfg = match path {
            Some(path) => Self::from_toml_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(DEFAULT_CONFIG_FILE)?
            }
            None => {
                tracing::debug!("No {} found, using environment only", DEFAULT_CONFIG_FILE);
                Self::from_env()
            }
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the webhook cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.line.channel_secret.is_empty() {
            return Err(Error::Config(
                "LINE channel secret not configured (line.channel_secret / LINE_CHANNEL_SECRET)"
                    .to_string(),
            ));
        }
        if self.line.channel_access_token.is_empty() {
            return Err(Error::Config(
                "LINE channel access token not configured (line.channel_access_token / LINE_CHANNEL_ACCESS_TOKEN)"
                    .to_string(),
            ));
        }
        if self.deploy.url.is_empty() {
            tracing::warn!("deploy.url is empty; audio links sent to LINE will not resolve");
        }
        Ok(())
    }

    /// Override settings with environment variables
    fn apply_env_overrides(&mut self) {
        fn set(target: &mut String, var: &str) {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    *target = value;
                }
            }
        }

        fn flag(target: &mut bool, var: &str) {
            if let Ok(value) = std::env::var(var) {
                *target = matches!(value.to_lowercase().as_str(), "1" | "true" | "yes");
            }
        }

        set(&mut self.line.channel_secret, "LINE_CHANNEL_SECRET");
        set(&mut self.line.channel_access_token, "LINE_CHANNEL_ACCESS_TOKEN");
        set(&mut self.line.api_base_url, "LINE_API_BASE_URL");

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        set(&mut self.server.static_dir, "STATIC_DIR");
        set(&mut self.deploy.url, "DEPLOY_URL");

        set(&mut self.translator.key, "TRANSLATOR_KEY");
        set(&mut self.translator.region, "TRANSLATOR_REGION");
        set(&mut self.translator.endpoint, "TRANSLATOR_ENDPOINT");

        set(&mut self.speech.key, "SPEECH_KEY");
        set(&mut self.speech.region, "SPEECH_REGION");
        if let Ok(endpoint) = std::env::var("SPEECH_ENDPOINT") {
            if !endpoint.is_empty() {
                self.speech.endpoint = Some(endpoint);
            }
        }

        set(&mut self.question_answering.endpoint, "QNA_ENDPOINT");
        set(&mut self.question_answering.key, "QNA_KEY");
        set(&mut self.question_answering.project_name, "QNA_PROJECT_NAME");
        set(&mut self.question_answering.deployment_name, "QNA_DEPLOYMENT_NAME");

        flag(&mut self.reply.include_japanese, "REPLY_INCLUDE_JAPANESE");
        flag(&mut self.reply.include_korean, "REPLY_INCLUDE_KOREAN");
    }
}
