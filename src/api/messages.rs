//! Inter-process messages between the page script, the background worker and
//! the popup. The wire shape is JSON tagged by `type`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::speech::{SpeechChannel, SpeechOptions, SpeechRequest};
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AssistantConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostMessage {
    GetConfig,
    SpeakText {
        text: String,
        options: SpeechOptions,
    },
    TtsPause,
    TtsStop,
}

/// Reply to the TTS messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HostReply {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, error: Some(error.into()) }
    }

    pub fn from_result(result: AppResult<()>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::failed(e.to_string()),
        }
    }

    /// An unsuccessful reply is a failure of the channel
    pub fn into_result(self) -> AppResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(AppError::SpeechUnavailable(
                self.error.unwrap_or_else(|| "host reported failure".to_string()),
            ))
        }
    }
}

/// Reply to `GET_CONFIG`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigReply {
    pub config: AssistantConfig,
}

/// Request/response transport to another extension context
#[async_trait]
pub trait MessageChannel: Send + Sync {
    async fn send(&self, message: HostMessage) -> AppResult<Value>;
}

/// Page-side answer for messages addressed to the content script.
/// Returns `None` for messages it does not own.
pub fn handle_content_message(config: &AssistantConfig, message: &HostMessage) -> AppResult<Option<Value>> {
    match message {
        HostMessage::GetConfig => {
            let reply = ConfigReply { config: config.clone() };
            Ok(Some(serde_json::to_value(reply)?))
        }
        _ => Ok(None),
    }
}

/// The privileged speech channel, reached through the background worker
pub struct MessagingSpeechChannel {
    channel: Arc<dyn MessageChannel>,
}

impl MessagingSpeechChannel {
    pub fn new(channel: Arc<dyn MessageChannel>) -> Self {
        Self { channel }
    }

    async fn round_trip(&self, message: HostMessage) -> AppResult<()> {
        let reply = self.channel.send(message).await?;
        let reply: HostReply = serde_json::from_value(reply)?;
        reply.into_result()
    }
}

#[async_trait]
impl SpeechChannel for MessagingSpeechChannel {
    fn name(&self) -> &'static str {
        "host-tts"
    }

    async fn speak(&self, request: &SpeechRequest) -> AppResult<()> {
        self.round_trip(HostMessage::SpeakText {
            text: request.text.clone(),
            options: request.options.clone(),
        })
        .await
    }

    async fn pause(&self) -> AppResult<()> {
        self.round_trip(HostMessage::TtsPause).await
    }

    async fn stop(&self) -> AppResult<()> {
        self.round_trip(HostMessage::TtsStop).await
    }
}
