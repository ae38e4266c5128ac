use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{AppError, AppResult};

pub const DEFAULT_API_BASE_URL: &str = "https://api.moonshot.cn/v1";
pub const DEFAULT_MODEL: &str = "moonshot-v1-8k";
/// Shipped in the stock config file; treated the same as an empty key
pub const PLACEHOLDER_API_KEY: &str = "YOUR_KIMI_API_KEY_HERE";

const KEYRING_SERVICE: &str = "text-assistant";
const KEYRING_ACCOUNT: &str = "completion_api_key";

const ENV_API_KEY: &str = "TEXT_ASSISTANT_API_KEY";
const ENV_API_URL: &str = "TEXT_ASSISTANT_API_URL";
const ENV_MODEL: &str = "TEXT_ASSISTANT_MODEL";
const ENV_TIMEOUT_MS: &str = "TEXT_ASSISTANT_TIMEOUT_MS";

/// Static configuration record, loaded once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    #[serde(rename = "apiUrl")]
    pub api_base_url: String,
    pub api_key: String,
    pub model: String,
    #[serde(with = "duration_ms", rename = "timeoutMs")]
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: PLACEHOLDER_API_KEY.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_millis(30_000),
            max_retries: 3,
        }
    }
}

impl AssistantConfig {
    /// Defaults, overlaid by environment variables, with the OS keyring as the
    /// credential source when the environment has none.
    pub fn load() -> Self {
        let mut config = Self::default().with_overrides(|name| std::env::var(name).ok());

        if !config.has_credential() {
            match Self::keyring_api_key() {
                Ok(Some(key)) => {
                    tracing::debug!("[Config] Using API key from keyring");
                    config.api_key = key;
                }
                Ok(None) => tracing::warn!("[Config] No API key configured; explain, translate and polish are disabled"),
                Err(e) => tracing::warn!(error = %e, "[Config] Keyring lookup failed"),
            }
        }

        config
    }

    /// Apply `TEXT_ASSISTANT_*` overrides from `lookup`; blank values are ignored
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(url) = get(ENV_API_URL) {
            self.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = get(ENV_MODEL) {
            self.model = model;
        }
        if let Some(raw) = get(ENV_TIMEOUT_MS) {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => self.timeout = Duration::from_millis(ms),
                _ => tracing::warn!(value = %raw, "[Config] Ignoring invalid {}", ENV_TIMEOUT_MS),
            }
        }
        self
    }

    fn keyring_api_key() -> AppResult<Option<String>> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)
            .map_err(|e| AppError::Configuration(e.to_string()))?;
        match entry.get_password() {
            Ok(key) if !key.trim().is_empty() => Ok(Some(key.trim().to_string())),
            Ok(_) => Ok(None),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AppError::Configuration(e.to_string())),
        }
    }

    pub fn has_credential(&self) -> bool {
        is_usable_key(&self.api_key)
    }

    /// The bearer credential, or a configuration error when missing or a placeholder
    pub fn credential(&self) -> AppResult<&str> {
        if self.has_credential() {
            Ok(self.api_key.trim())
        } else {
            Err(AppError::Configuration("API key is not configured".to_string()))
        }
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base_url.trim_end_matches('/'))
    }
}

/// A key counts as configured when non-blank and not the shipped placeholder
pub fn is_usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}

/// Fixed delays driving the panel state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelTimings {
    /// Quiet period before a selection burst is evaluated
    pub debounce: Duration,
    /// Window between display and the `show` class
    pub entry_animation: Duration,
    pub outside_click_delay: Duration,
    pub exit_delay: Duration,
    pub speak_hide_delay: Duration,
    /// Upper bound on a dispatch before processing is force-released
    pub processing_watchdog: Duration,
}

impl PanelTimings {
    pub fn for_config(config: &AssistantConfig) -> Self {
        Self {
            processing_watchdog: config.timeout + Duration::from_secs(5),
            ..Self::default()
        }
    }
}

impl Default for PanelTimings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            entry_animation: Duration::from_millis(10),
            outside_click_delay: Duration::from_millis(100),
            exit_delay: Duration::from_millis(150),
            speak_hide_delay: Duration::from_millis(300),
            processing_watchdog: Duration::from_secs(35),
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
