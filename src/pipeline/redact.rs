//! Sensitive-text redaction.
//!
//! Runs after the mandatory audit stage (so the unredacted original is
//! durably logged) and before the reputation guards (so scrubbed text, not
//! raw secrets, is what gets shipped to third-party intel services). The
//! whole text goes to the oracle; classification is its job, not a local
//! pattern match.

use crate::error::Result;
use crate::pipeline::Stage;
use crate::prompt::PromptValue;
use crate::services::{AuditEvent, AuditSink, RedactOracle};
use async_trait::async_trait;
use std::sync::Arc;

const REDACTION_MESSAGE: &str = "Redacted human prompt.";

pub struct RedactStage {
    oracle: Arc<dyn RedactOracle>,
    audit: Option<Arc<dyn AuditSink>>,
}

impl RedactStage {
    pub fn new(oracle: Arc<dyn RedactOracle>, audit: Option<Arc<dyn AuditSink>>) -> Self {
        Self { oracle, audit }
    }
}

#[async_trait]
impl Stage for RedactStage {
    fn name(&self) -> &'static str {
        "redact"
    }

    async fn apply(&self, prompt: PromptValue) -> Result<PromptValue> {
        let text = prompt.latest_human_text()?.to_string();

        let outcome = self.oracle.redact(&text).await?;

        // An oracle reporting zero redactions may omit the rewritten text;
        // fall back to the original rather than blanking the message.
        let rewritten = match outcome.redacted_text.as_deref() {
            Some(redacted) if !redacted.is_empty() => redacted.to_string(),
            _ => text.clone(),
        };

        // Best-effort: only the dedicated audit stage is required to succeed.
        if outcome.count > 0 {
            if let Some(sink) = &self.audit {
                if let Err(err) = sink
                    .log_events(&[AuditEvent::new(REDACTION_MESSAGE, &text, &rewritten)])
                    .await
                {
                    tracing::warn!("Failed to log redaction event: {}", err);
                }
            }
        }

        if rewritten == text {
            return Ok(prompt);
        }

        tracing::info!("Redacted {} span(s) in the latest human message", outcome.count);
        prompt.with_latest_human_text(rewritten)
    }
}
