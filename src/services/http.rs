//! HTTP clients for the intel, redact, and audit services.
//!
//! All three speak the same envelope convention: POST to
//! `https://<service>.<service-domain>/v1/<operation>` with a bearer token,
//! answered by `{"result": ...}`. An absent `result` payload is treated as a
//! malformed response and surfaces as a transport error, never as a verdict.

use crate::config::SecretToken;
use crate::error::{Result, WardenError};
use crate::services::{AuditEvent, AuditSink, RedactOracle, RedactionOutcome, ReputationOracle};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Deserialize)]
struct Envelope<T> {
    result: Option<T>,
}

/// Shared plumbing for one remote service endpoint.
struct ServiceClient {
    http: Client,
    base_url: String,
    token: SecretToken,
    service: &'static str,
}

impl ServiceClient {
    fn new(
        service: &'static str,
        service_domain: &str,
        token: SecretToken,
        timeout_seconds: u64,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| WardenError::transport(service, e.to_string()))?;

        Ok(Self {
            http,
            base_url: format!("https://{}.{}", service, service_domain),
            token,
            service,
        })
    }

    async fn post_json<T: DeserializeOwned>(&self, operation: &str, body: &Value) -> Result<T> {
        let url = format!("{}/v1/{}", self.base_url, operation);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.token.reveal())
            .json(body)
            .send()
            .await
            .map_err(|e| WardenError::transport(self.service, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WardenError::transport(
                self.service,
                format!("unexpected status {}", status),
            ));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| WardenError::transport(self.service, e.to_string()))?;

        envelope.result.ok_or_else(|| {
            WardenError::transport(self.service, "response is missing its result payload")
        })
    }
}

#[derive(Deserialize)]
struct ReputationData {
    data: HashMap<String, IndicatorReputation>,
}

#[derive(Deserialize)]
struct IndicatorReputation {
    score: u8,
}

/// Bulk reputation lookups against one intel service
/// (`domain-intel`, `ip-intel`, or `url-intel`).
pub struct IntelClient {
    inner: ServiceClient,
}

impl IntelClient {
    pub fn new(
        service: &'static str,
        service_domain: &str,
        token: SecretToken,
        timeout_seconds: u64,
    ) -> Result<Self> {
        Ok(Self {
            inner: ServiceClient::new(service, service_domain, token, timeout_seconds)?,
        })
    }
}

#[async_trait]
impl ReputationOracle for IntelClient {
    async fn bulk_score(&self, indicators: &[String]) -> Result<HashMap<String, u8>> {
        let result: ReputationData = self
            .inner
            .post_json("reputation", &json!({ "indicators": indicators }))
            .await?;

        Ok(result
            .data
            .into_iter()
            .map(|(indicator, reputation)| (indicator, reputation.score))
            .collect())
    }
}

pub struct RedactClient {
    inner: ServiceClient,
}

impl RedactClient {
    pub fn new(service_domain: &str, token: SecretToken, timeout_seconds: u64) -> Result<Self> {
        Ok(Self {
            inner: ServiceClient::new("redact", service_domain, token, timeout_seconds)?,
        })
    }
}

#[async_trait]
impl RedactOracle for RedactClient {
    async fn redact(&self, text: &str) -> Result<RedactionOutcome> {
        self.inner.post_json("redact", &json!({ "text": text })).await
    }
}

pub struct AuditClient {
    inner: ServiceClient,
}

impl AuditClient {
    pub fn new(service_domain: &str, token: SecretToken, timeout_seconds: u64) -> Result<Self> {
        Ok(Self {
            inner: ServiceClient::new("audit", service_domain, token, timeout_seconds)?,
        })
    }
}

#[async_trait]
impl AuditSink for AuditClient {
    async fn log_events(&self, events: &[AuditEvent]) -> Result<()> {
        let stamped: Vec<Value> = events
            .iter()
            .map(|event| {
                json!({
                    "timestamp": Utc::now().to_rfc3339(),
                    "message": event.message,
                    "old": event.before,
                    "new": event.after,
                })
            })
            .collect();

        // The acknowledgement body is service-defined; only its presence matters.
        let _ack: Value = self
            .inner
            .post_json("log", &json!({ "events": stamped }))
            .await?;

        Ok(())
    }
}
