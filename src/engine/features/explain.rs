//! Explain the selected text in plain Chinese

use async_trait::async_trait;

use super::{DispatchContext, FeatureAsync, FunctionOutput, FunctionSpec};
use crate::shared::error::AppResult;
use crate::shared::types::PanelFunction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplainFeature;

impl ExplainFeature {
    pub fn prompt(text: &str) -> String {
        format!("请解释以下文本的含义：\n\n\"{}\"\n\n请用简洁明了的中文进行解释。", text)
    }
}

impl FunctionSpec for ExplainFeature {
    fn function(&self) -> PanelFunction {
        PanelFunction::Explain
    }

    fn display_name(&self) -> &'static str {
        "解释"
    }

    fn requires_credential(&self) -> bool {
        true
    }
}

#[async_trait]
impl FeatureAsync for ExplainFeature {
    async fn execute(&self, ctx: &DispatchContext, text: &str) -> AppResult<FunctionOutput> {
        let result = ctx.text_service.complete(&Self::prompt(text)).await?;
        Ok(FunctionOutput::Explanation(result))
    }
}
