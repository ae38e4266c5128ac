use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::{AppError, AppResult};

pub const LANG_CJK: &str = "zh-CN";
pub const LANG_DEFAULT: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechOptions {
    pub lang: String,
    pub rate: f64,
    pub pitch: f64,
    pub volume: f64,
}

impl SpeechOptions {
    /// Fixed rate/pitch/volume presets for `lang`
    pub fn preset(lang: &str) -> Self {
        Self { lang: lang.to_string(), rate: 1.0, pitch: 1.0, volume: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    pub options: SpeechOptions,
}

/// One speech capability: the privileged host channel or local synthesis
#[async_trait]
pub trait SpeechChannel: Send + Sync {
    fn name(&self) -> &'static str;
    async fn speak(&self, request: &SpeechRequest) -> AppResult<()>;
    async fn pause(&self) -> AppResult<()>;
    async fn stop(&self) -> AppResult<()>;
}

/// Which channel carried out a speech action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechRoute {
    Host,
    Local,
}

#[derive(Debug, Clone, Copy)]
enum SpeechAction<'a> {
    Speak(&'a SpeechRequest),
    Pause,
    Stop,
}

impl SpeechAction<'_> {
    fn label(&self) -> &'static str {
        match self {
            SpeechAction::Speak(_) => "speak",
            SpeechAction::Pause => "pause",
            SpeechAction::Stop => "stop",
        }
    }

    async fn run_on(&self, channel: &dyn SpeechChannel) -> AppResult<()> {
        match self {
            SpeechAction::Speak(request) => channel.speak(request).await,
            SpeechAction::Pause => channel.pause().await,
            SpeechAction::Stop => channel.stop().await,
        }
    }
}

/// Host speech first, local synthesis on any host failure.
///
/// The two channels share no playback state: pause/stop simply go to
/// whichever channel accepts them.
pub struct SpeechBridge {
    host: Arc<dyn SpeechChannel>,
    local: Option<Arc<dyn SpeechChannel>>,
}

impl SpeechBridge {
    pub fn new(host: Arc<dyn SpeechChannel>, local: Option<Arc<dyn SpeechChannel>>) -> Self {
        Self { host, local }
    }

    pub async fn speak(&self, text: &str, lang: &str) -> AppResult<SpeechRoute> {
        let request = SpeechRequest { text: text.to_string(), options: SpeechOptions::preset(lang) };
        self.with_fallback(SpeechAction::Speak(&request)).await
    }

    pub async fn pause(&self) -> AppResult<SpeechRoute> {
        self.with_fallback(SpeechAction::Pause).await
    }

    pub async fn stop(&self) -> AppResult<SpeechRoute> {
        self.with_fallback(SpeechAction::Stop).await
    }

    async fn with_fallback(&self, action: SpeechAction<'_>) -> AppResult<SpeechRoute> {
        let host_err = match action.run_on(self.host.as_ref()).await {
            Ok(()) => return Ok(SpeechRoute::Host),
            Err(e) => e,
        };
        tracing::warn!(
            action = action.label(),
            channel = self.host.name(),
            error = %host_err,
            "[SpeechBridge] Host channel failed, trying local synthesis"
        );

        let Some(local) = &self.local else {
            return Err(AppError::SpeechUnavailable(format!(
                "{} failed and no local synthesis is available: {}",
                action.label(),
                host_err
            )));
        };

        action.run_on(local.as_ref()).await.map_err(|local_err| {
            tracing::warn!(action = action.label(), error = %local_err, "[SpeechBridge] Local synthesis failed");
            AppError::SpeechUnavailable(format!("{} failed on every channel: {}", action.label(), local_err))
        })?;
        Ok(SpeechRoute::Local)
    }
}

/// True when `text` contains a CJK unified ideograph (U+4E00..=U+9FA5)
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4E00}'..='\u{9FA5}').contains(&c))
}

/// Speech language tag for the selected text
pub fn detect_speech_lang(text: &str) -> &'static str {
    if contains_cjk(text) {
        LANG_CJK
    } else {
        LANG_DEFAULT
    }
}
