//! Popup status line: asks the active page for its config and reports
//! whether the remote functions are usable.

use serde::Deserialize;
use serde_json::Value;

use super::messages::{HostMessage, MessageChannel};
use crate::shared::error::AppResult;
use crate::shared::settings::is_usable_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStatus {
    Ready,
    MissingCredential,
    /// No page answered, or the answer had no config
    Unreachable,
}

// Only the key is read; other config fields may be absent
#[derive(Deserialize)]
struct ConfigProbe {
    config: Option<KeyProbe>,
}

#[derive(Deserialize)]
struct KeyProbe {
    #[serde(default, rename = "apiKey")]
    api_key: Option<String>,
}

impl ConfigStatus {
    pub fn classify(reply: AppResult<Value>) -> Self {
        let reply = match reply {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "[Popup] Config check failed");
                return ConfigStatus::Unreachable;
            }
        };
        match serde_json::from_value::<ConfigProbe>(reply) {
            Ok(ConfigProbe { config: Some(config) }) => {
                if config.api_key.as_deref().is_some_and(is_usable_key) {
                    ConfigStatus::Ready
                } else {
                    ConfigStatus::MissingCredential
                }
            }
            _ => ConfigStatus::Unreachable,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ConfigStatus::Ready => "✅ 配置正常，API功能可用",
            ConfigStatus::MissingCredential => "⚠️ 请先配置API Key",
            ConfigStatus::Unreachable => "❌ 无法获取配置信息",
        }
    }

    /// CSS class for the status line
    pub fn class(&self) -> &'static str {
        match self {
            ConfigStatus::Ready => "success",
            _ => "error",
        }
    }
}

pub async fn check_config_status(page: &dyn MessageChannel) -> ConfigStatus {
    ConfigStatus::classify(page.send(HostMessage::GetConfig).await)
}
