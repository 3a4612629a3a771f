//! Chat-completions client for the downstream generation model.

use crate::config::SecretToken;
use crate::error::{Result, WardenError};
use crate::prompt::PromptValue;
use crate::services::CompletionModel;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const SERVICE: &str = "model";

/// Talks to any OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatModelClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: SecretToken,
}

impl ChatModelClient {
    pub fn new(
        endpoint: &str,
        model: impl Into<String>,
        api_key: SecretToken,
        timeout_seconds: u64,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| WardenError::transport(SERVICE, e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }
}

#[async_trait]
impl CompletionModel for ChatModelClient {
    async fn generate(&self, prompt: &PromptValue) -> Result<String> {
        let messages: Vec<Value> = prompt
            .messages()
            .iter()
            .map(|message| {
                json!({
                    "role": message.role.wire_name(),
                    "content": message.content,
                })
            })
            .collect();

        let payload = json!({
            "model": self.model,
            "stream": false,
            "messages": messages,
        });

        let url = format!("{}/chat/completions", self.endpoint);
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.reveal())
            .json(&payload)
            .send()
            .await
            .map_err(|e| WardenError::transport(SERVICE, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WardenError::transport(
                SERVICE,
                format!("unexpected status {}", status),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| WardenError::transport(SERVICE, e.to_string()))?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WardenError::transport(SERVICE, "response is missing completion text"))
    }
}
