//! Message handler: the translate → transliterate → synthesize → answer → reply chain
//!
//! Vendor failures never abort the chain. Each failing step is logged and
//! its value becomes `None`; reply parts that depend on it are left out.

use tracing::{debug, error, info, warn};

use lt_azure::{QnaClient, Script, SpeechClient, TranslatorClient, Voice};
use lt_core::{Config, DeployConfig, Language, ReplyConfig, TranslationContext};

use crate::api::LineApiClient;
use crate::error::Result;
use crate::types::{LineEvent, MessageContent, MAX_MESSAGES_PER_REQUEST};

/// One language block of the reply: a text message and its audio
struct Section {
    language: Language,
    label: &'static str,
    script: Script,
    voice: Voice,
}

impl Section {
    fn chinese() -> Self {
        Self {
            language: Language::TraditionalChinese,
            label: "中文",
            script: Script::Hant,
            voice: Voice::ZH_TW,
        }
    }

    fn japanese() -> Self {
        Self {
            language: Language::Japanese,
            label: "日文",
            script: Script::Jpan,
            voice: Voice::JA_JP,
        }
    }

    fn korean() -> Self {
        Self {
            language: Language::Korean,
            label: "韓文",
            script: Script::Kore,
            voice: Voice::KO_KR,
        }
    }
}

/// Message handler for LINE
pub struct MessageHandler {
    api_client: LineApiClient,
    translator: TranslatorClient,
    speech: SpeechClient,
    qna: QnaClient,
    deploy: DeployConfig,
    reply: ReplyConfig,
}

impl MessageHandler {
    /// Create a new message handler
    pub fn new(
        api_client: LineApiClient,
        translator: TranslatorClient,
        speech: SpeechClient,
        qna: QnaClient,
        deploy: DeployConfig,
        reply: ReplyConfig,
    ) -> Self {
        Self {
            api_client,
            translator,
            speech,
            qna,
            deploy,
            reply,
        }
    }

    /// Build a handler and its clients from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            LineApiClient::new(&config.line.channel_access_token, &config.line.api_base_url)?,
            TranslatorClient::new(&config.translator)?,
            SpeechClient::new(&config.speech, &config.server.static_dir)?,
            QnaClient::new(&config.question_answering)?,
            config.deploy.clone(),
            config.reply.clone(),
        ))
    }

    /// Process an incoming event
    pub async fn process_event(&self, event: &LineEvent) -> Result<()> {
        let Some(text) = event.text() else {
            debug!("Ignoring {} event", event.event_type);
            return Ok(());
        };

        let content = text.trim();
        if content.is_empty() {
            return Ok(());
        }

        let Some(reply_token) = event.reply_token.as_deref() else {
            debug!("Message event without reply token");
            return Ok(());
        };

        info!("Processing message: {}", content);

        let messages = self.compose_reply(content).await;
        if messages.is_empty() {
            warn!("Every step failed, nothing to reply");
            return Ok(());
        }

        self.send_reply(reply_token, event.source.user_id.as_deref(), &messages)
            .await
    }

    fn sections(&self) -> Vec<Section> {
        let mut sections = vec![Section::chinese()];
        if self.reply.include_japanese {
            sections.push(Section::japanese());
        }
        if self.reply.include_korean {
            sections.push(Section::korean());
        }
        sections
    }

    /// Run the whole chain for one message and return the reply to send
    pub async fn compose_reply(&self, text: &str) -> Vec<MessageContent> {
        let ctx = self.translate(text).await;
        let mut messages = Vec::new();

        for section in self.sections() {
            let Some(translated) = ctx.as_ref().and_then(|c| c.text_in(&section.language, text)) else {
                warn!("No {} text available", section.language);
                continue;
            };

            let romanized = self.transliterate(translated, section.script).await;
            let mut body = format!("{}\n{}", section.label, translated);
            if let Some(romanized) = romanized {
                body.push('\n');
                body.push_str(&romanized);
            }
            messages.push(MessageContent::text(body));

            if let Some(duration) = self.synthesize(translated, section.voice).await {
                messages.push(MessageContent::audio(
                    self.deploy.static_url(section.voice.file_name),
                    duration,
                ));
            }
        }

        let question = ctx
            .as_ref()
            .and_then(|c| c.text_in(&Language::TraditionalChinese, text));
        if let Some(answer) = self.answer_in_english(question).await {
            messages.push(MessageContent::text(answer));
        }

        messages
    }

    /// Ask the knowledge base and translate its answer to English
    async fn answer_in_english(&self, question: Option<&str>) -> Option<String> {
        let question = question?;

        let answer = match self.qna.answer(question).await {
            Ok(Some(answer)) => answer,
            Ok(None) => {
                warn!("Knowledge base returned no answer");
                return None;
            }
            Err(e) => {
                error!("Knowledge base query failed: {}", e);
                return None;
            }
        };

        let ctx = self.translate(&answer).await?;
        ctx.text_in(&Language::English, &answer).map(str::to_string)
    }

    async fn translate(&self, text: &str) -> Option<TranslationContext> {
        match self.translator.translate(text).await {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                error!("Translation failed: {}", e);
                None
            }
        }
    }

    async fn transliterate(&self, text: &str, script: Script) -> Option<String> {
        match self.translator.transliterate(text, script).await {
            Ok(result) => result,
            Err(e) => {
                error!("Transliteration from {} failed: {}", script.code(), e);
                None
            }
        }
    }

    async fn synthesize(&self, text: &str, voice: Voice) -> Option<u64> {
        match self.speech.synthesize(text, voice).await {
            Ok(synthesis) => {
                debug!("Audio for {} ready at {}", voice.locale, synthesis.path.display());
                Some(synthesis.duration_ms)
            }
            Err(e) => {
                error!("Speech synthesis with {} failed: {}", voice.name, e);
                None
            }
        }
    }

    /// Send the reply, pushing whatever does not fit into one reply
    async fn send_reply(
        &self,
        reply_token: &str,
        user_id: Option<&str>,
        messages: &[MessageContent],
    ) -> Result<()> {
        let split = messages.len().min(MAX_MESSAGES_PER_REQUEST);
        let (first, rest) = messages.split_at(split);

        self.api_client.reply_messages(reply_token, first).await?;

        if rest.is_empty() {
            return Ok(());
        }
        match user_id {
            Some(user_id) => self.api_client.push_messages(user_id, rest).await,
            None => {
                warn!("Dropping {} messages: no user to push to", rest.len());
                Ok(())
            }
        }
    }
}
