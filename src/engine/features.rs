//! Panel functions with enum dispatch
//!
//! Sync metadata goes through `enum_dispatch` (`FunctionSpec`); async
//! execution is dispatched by hand since `enum_dispatch` has no async support.

use std::sync::Arc;

use async_trait::async_trait;
use enum_dispatch::enum_dispatch;

use crate::engine::speech::{SpeechBridge, SpeechRoute};
use crate::shared::error::AppResult;
use crate::shared::settings::AssistantConfig;
use crate::shared::types::{PanelFunction, TargetLanguage};

pub mod completion_client;
pub mod explain;
pub mod translate;
pub mod speak;
pub mod polish;

pub use completion_client::{CompletionClient, TextService};

/// Collaborators a function may call while executing
pub struct DispatchContext {
    pub config: AssistantConfig,
    pub text_service: Arc<dyn TextService>,
    pub speech: SpeechBridge,
}

/// Successful result of one function execution
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionOutput {
    Explanation(String),
    /// Translate's first step: show the language chooser, nothing requested yet
    TranslateChooser,
    Translation { language: TargetLanguage, text: String },
    Spoken { lang: &'static str, route: SpeechRoute },
    Polished(String),
}

#[enum_dispatch]
pub trait FunctionSpec {
    fn function(&self) -> PanelFunction;

    /// Label on the button and in loading/error views
    fn display_name(&self) -> &'static str;

    /// Whether the function calls the remote text service
    fn requires_credential(&self) -> bool;
}

#[async_trait]
pub trait FeatureAsync: Send + Sync {
    async fn execute(&self, ctx: &DispatchContext, text: &str) -> AppResult<FunctionOutput>;
}

#[enum_dispatch(FunctionSpec)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureHandler {
    Explain(explain::ExplainFeature),
    Translate(translate::TranslateFeature),
    Speak(speak::SpeakFeature),
    Polish(polish::PolishFeature),
}

impl FeatureHandler {
    pub fn for_function(function: PanelFunction) -> Self {
        match function {
            PanelFunction::Explain => explain::ExplainFeature.into(),
            PanelFunction::Translate => translate::TranslateFeature.into(),
            PanelFunction::Speak => speak::SpeakFeature.into(),
            PanelFunction::Polish => polish::PolishFeature.into(),
        }
    }

    pub fn loading_label(&self) -> String {
        format!("正在{}中...", self.display_name())
    }

    pub fn failure_title(&self) -> String {
        format!("{}失败", self.display_name())
    }

    /// Credential gate first, then the function-specific handler
    pub async fn execute(&self, ctx: &DispatchContext, text: &str) -> AppResult<FunctionOutput> {
        if self.requires_credential() {
            ctx.config.credential()?;
        }
        match self {
            FeatureHandler::Explain(f) => f.execute(ctx, text).await,
            FeatureHandler::Translate(f) => f.execute(ctx, text).await,
            FeatureHandler::Speak(f) => f.execute(ctx, text).await,
            FeatureHandler::Polish(f) => f.execute(ctx, text).await,
        }
    }
}

pub fn display_name(function: PanelFunction) -> &'static str {
    FeatureHandler::for_function(function).display_name()
}
