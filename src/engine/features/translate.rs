//! Translate to one of the two offered target languages
//!
//! Activation alone only opens the language chooser. The request itself is
//! made by [`TranslateFeature::translate`] once the user confirms a target.

use async_trait::async_trait;

use super::{DispatchContext, FeatureAsync, FunctionOutput, FunctionSpec};
use crate::shared::error::AppResult;
use crate::shared::types::{PanelFunction, TargetLanguage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslateFeature;

impl TranslateFeature {
    pub fn prompt(text: &str, language: TargetLanguage) -> String {
        format!(
            "请将以下文本翻译成{}：\n\n\"{}\"\n\n只返回翻译结果，不要其他内容。",
            language.label(),
            text
        )
    }

    pub async fn translate(
        &self,
        ctx: &DispatchContext,
        text: &str,
        language: TargetLanguage,
    ) -> AppResult<FunctionOutput> {
        ctx.config.credential()?;
        let translated = ctx.text_service.complete(&Self::prompt(text, language)).await?;
        Ok(FunctionOutput::Translation { language, text: translated })
    }
}

impl FunctionSpec for TranslateFeature {
    fn function(&self) -> PanelFunction {
        PanelFunction::Translate
    }

    fn display_name(&self) -> &'static str {
        "翻译"
    }

    fn requires_credential(&self) -> bool {
        true
    }
}

#[async_trait]
impl FeatureAsync for TranslateFeature {
    async fn execute(&self, _ctx: &DispatchContext, _text: &str) -> AppResult<FunctionOutput> {
        Ok(FunctionOutput::TranslateChooser)
    }
}
