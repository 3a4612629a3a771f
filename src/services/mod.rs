//! External collaborator seams.
//!
//! Every remote service the pipeline talks to — the audit sink, the redaction
//! oracle, the three reputation oracles, and the completion model — is
//! consumed through a trait here, so pipeline assembly can inject HTTP
//! clients in production and scripted doubles in tests. The traits carry no
//! transport detail; `http` and `model` hold the wire implementations.

use crate::error::Result;
use crate::prompt::PromptValue;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod http;
pub mod model;

#[cfg(test)]
pub mod doubles;

/// One append-only compliance record. `before`/`after` serialize as
/// `old`/`new`, the field names the audit service expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub message: String,
    #[serde(rename = "old")]
    pub before: String,
    #[serde(rename = "new")]
    pub after: String,
}

impl AuditEvent {
    pub fn new(
        message: impl Into<String>,
        before: impl Into<String>,
        after: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            before: before.into(),
            after: after.into(),
        }
    }
}

/// What the redaction oracle says about one text. An oracle reporting zero
/// redactions may omit the rewritten text entirely; callers fall back to the
/// original in that case.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedactionOutcome {
    #[serde(default)]
    pub redacted_text: Option<String>,
    #[serde(default)]
    pub count: u32,
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Appends a non-empty batch of events to the audit log.
    async fn log_events(&self, events: &[AuditEvent]) -> Result<()>;
}

#[async_trait]
pub trait ReputationOracle: Send + Sync {
    /// Scores a non-empty batch of indicator strings in one round-trip.
    /// 0 is benign, 100 is confirmed malicious.
    async fn bulk_score(&self, indicators: &[String]) -> Result<HashMap<String, u8>>;
}

#[async_trait]
pub trait RedactOracle: Send + Sync {
    async fn redact(&self, text: &str) -> Result<RedactionOutcome>;
}

#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Sends the final, screened prompt to the model and returns the
    /// completion text.
    async fn generate(&self, prompt: &PromptValue) -> Result<String>;
}
