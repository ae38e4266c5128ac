//! Rewrite the selection more fluently; the result is editable in place

use async_trait::async_trait;

use super::{DispatchContext, FeatureAsync, FunctionOutput, FunctionSpec};
use crate::shared::error::AppResult;
use crate::shared::types::PanelFunction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolishFeature;

impl PolishFeature {
    pub fn prompt(text: &str) -> String {
        format!(
            "请对以下文本进行润色，使其更加优美、流畅：\n\n\"{}\"\n\n只返回润色后的文本，不要其他内容。",
            text
        )
    }
}

impl FunctionSpec for PolishFeature {
    fn function(&self) -> PanelFunction {
        PanelFunction::Polish
    }

    fn display_name(&self) -> &'static str {
        "润色"
    }

    fn requires_credential(&self) -> bool {
        true
    }
}

#[async_trait]
impl FeatureAsync for PolishFeature {
    async fn execute(&self, ctx: &DispatchContext, text: &str) -> AppResult<FunctionOutput> {
        let polished = ctx.text_service.complete(&Self::prompt(text)).await?;
        Ok(FunctionOutput::Polished(polished))
    }
}
