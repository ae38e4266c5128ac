use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AssistantConfig;

pub const MAX_TOKENS: u32 = 1000;
pub const TEMPERATURE: f64 = 0.7;

/// Remote text-completion capability
#[async_trait]
pub trait TextService: Send + Sync {
    /// Send one prompt and return the generated text. Never retries.
    async fn complete(&self, prompt: &str) -> AppResult<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// OpenAI-compatible `chat/completions` client
pub struct CompletionClient {
    http: Client,
    url: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(config: &AssistantConfig) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent("text-assistant/completion")
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            url: config.completions_url(),
            api_key: config.api_key.trim().to_string(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl TextService for CompletionClient {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        if self.api_key.is_empty() {
            return Err(AppError::Configuration("API key is not configured".to_string()));
        }

        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage { role: "user", content: prompt }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "[CompletionClient] Request failed");
                AppError::Transport(format!("Completion request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "[CompletionClient] Non-success status");
            return Err(AppError::BadStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let text = response.text().await?;
        let json: Value = serde_json::from_str(&text)?;
        parse_completion(&json)
    }
}

/// Extract `choices[0].message.content`
pub fn parse_completion(body: &Value) -> AppResult<String> {
    // Safe: get() chain so a malformed body can't panic
    body.get("choices")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("message"))
        .and_then(|v| v.get("content"))
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .ok_or_else(|| {
            AppError::MalformedResponse(
                "unexpected response format: missing choices[0].message.content".to_string(),
            )
        })
}
