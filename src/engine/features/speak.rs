use async_trait::async_trait;

use super::{DispatchContext, FeatureAsync, FunctionOutput, FunctionSpec};
use crate::engine::speech::detect_speech_lang;
use crate::shared::error::AppResult;
use crate::shared::types::PanelFunction;

/// Read the selection aloud. Side-effecting only: there is no result view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeakFeature;

impl FunctionSpec for SpeakFeature {
    fn function(&self) -> PanelFunction {
        PanelFunction::Speak
    }

    fn display_name(&self) -> &'static str {
        "朗读"
    }

    fn requires_credential(&self) -> bool {
        false
    }
}

#[async_trait]
impl FeatureAsync for SpeakFeature {
    async fn execute(&self, ctx: &DispatchContext, text: &str) -> AppResult<FunctionOutput> {
        let lang = detect_speech_lang(text);
        let route = ctx.speech.speak(text, lang).await?;
        tracing::info!(lang, ?route, "[Speak] Playback requested");
        Ok(FunctionOutput::Spoken { lang, route })
    }
}
