//! Minimal OpenAI-compatible chat-completions client.

use faqbot_core::{CapabilityFailure, CoreConfig};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const CHAT_PATH: &str = "/chat/completions";

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Sends a system + user prompt pair and returns the first choice's text.
#[derive(Clone)]
pub struct ChatClient {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CapabilityFailure> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CapabilityFailure::Unavailable(format!("http client: {}", e)))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            timeout,
            client,
        })
    }

    /// Client for the configured API, or `None` when no API key is available.
    pub fn from_config(config: &CoreConfig) -> Option<Result<Self, CapabilityFailure>> {
        let key = config.api_key()?;
        Some(Self::new(
            config.llm_api_base.as_str(),
            key,
            config.llm_model.as_str(),
            Duration::from_secs(config.llm_timeout_secs.max(1)),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn complete(&self, system: &str, user: &str) -> Result<String, CapabilityFailure> {
        let url = format!("{}{}", self.base_url, CHAT_PATH);
        let body = json!({
            "model": self.model,
            "temperature": 0.2,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CapabilityFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = resp
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| CapabilityFailure::InvalidResponse("no content in first choice".into()))?;

        tracing::debug!(
            target: "faqbot::skills",
            model = %self.model,
            chars = content.len(),
            "Chat completion received"
        );
        Ok(content)
    }

    fn transport_error(&self, e: reqwest::Error) -> CapabilityFailure {
        if e.is_timeout() {
            CapabilityFailure::Timeout(self.timeout)
        } else if e.is_decode() {
            CapabilityFailure::InvalidResponse(e.to_string())
        } else {
            CapabilityFailure::Request(e.to_string())
        }
    }
}
