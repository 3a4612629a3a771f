//! Mandatory receipt logging.
//!
//! First stage in the pipeline: records the original, still-unredacted human
//! prompt before anything else may rewrite or reject it. This emission is the
//! only durable record of prompt receipt, so a failure to reach the sink is
//! fatal — unlike the best-effort redaction event in `redact`.

use crate::error::Result;
use crate::pipeline::Stage;
use crate::prompt::PromptValue;
use crate::services::{AuditEvent, AuditSink};
use async_trait::async_trait;
use std::sync::Arc;

const RECEIPT_MESSAGE: &str = "Received a human prompt for the model.";

pub struct AuditStage {
    sink: Arc<dyn AuditSink>,
}

impl AuditStage {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl Stage for AuditStage {
    fn name(&self) -> &'static str {
        "audit"
    }

    async fn apply(&self, prompt: PromptValue) -> Result<PromptValue> {
        let text = prompt.latest_human_text()?.to_string();

        // Receipt, not a change: before and after carry the same text.
        self.sink
            .log_events(&[AuditEvent::new(RECEIPT_MESSAGE, &text, &text)])
            .await?;

        Ok(prompt)
    }
}
