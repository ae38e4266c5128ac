//! Background-worker side of the speech messages

use async_trait::async_trait;

use super::messages::{HostMessage, HostReply};
use crate::engine::selection::monitor::preview;
use crate::engine::speech::SpeechOptions;
use crate::shared::error::{AppError, AppResult};

/// The privileged text-to-speech engine available to the background worker
#[async_trait]
pub trait TtsEngine: Send + Sync {
    /// Resolves once playback has started
    async fn speak(&self, text: &str, options: &SpeechOptions) -> AppResult<()>;
    fn pause(&self) -> AppResult<()>;
    fn stop(&self) -> AppResult<()>;
}

/// Answer a speech message. `None` for messages the background does not own.
pub async fn handle_background_message(engine: &dyn TtsEngine, message: HostMessage) -> Option<HostReply> {
    let (action, result) = match message {
        HostMessage::SpeakText { text, options } => {
            if text.trim().is_empty() {
                ("speak", Err(AppError::Validation("Nothing to speak".to_string())))
            } else {
                tracing::debug!(lang = %options.lang, text = %preview(&text, 20), "[Background] Speaking");
                ("speak", engine.speak(&text, &options).await)
            }
        }
        HostMessage::TtsPause => ("pause", engine.pause()),
        HostMessage::TtsStop => ("stop", engine.stop()),
        HostMessage::GetConfig => return None,
    };

    if let Err(e) = &result {
        tracing::error!(action, error = %e, "[Background] TTS error");
    }
    Some(HostReply::from_result(result))
}
