//! Scripted in-process collaborators for tests. No network.

use crate::error::{Result, WardenError};
use crate::prompt::PromptValue;
use crate::services::{
    AuditEvent, AuditSink, CompletionModel, RedactOracle, RedactionOutcome, ReputationOracle,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Answers bulk lookups from a fixed score table. Indicators absent from the
/// table are silently dropped from the response, which is exactly the
/// malformed partial reply the guards must refuse to treat as "no malice".
pub struct ScriptedOracle {
    scores: HashMap<String, u8>,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new(entries: &[(&str, u8)]) -> Self {
        Self {
            scores: entries
                .iter()
                .map(|(indicator, score)| (indicator.to_string(), *score))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReputationOracle for ScriptedOracle {
    async fn bulk_score(&self, indicators: &[String]) -> Result<HashMap<String, u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(indicators
            .iter()
            .filter_map(|indicator| {
                self.scores
                    .get(indicator)
                    .map(|score| (indicator.clone(), *score))
            })
            .collect())
    }
}

pub struct FailingOracle {
    pub service: &'static str,
}

#[async_trait]
impl ReputationOracle for FailingOracle {
    async fn bulk_score(&self, _indicators: &[String]) -> Result<HashMap<String, u8>> {
        Err(WardenError::transport(self.service, "connection refused"))
    }
}

pub struct ScriptedRedact {
    outcome: RedactionOutcome,
    calls: AtomicUsize,
}

impl ScriptedRedact {
    pub fn new(redacted_text: Option<&str>, count: u32) -> Self {
        Self {
            outcome: RedactionOutcome {
                redacted_text: redacted_text.map(str::to_string),
                count,
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn clean() -> Self {
        Self::new(None, 0)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RedactOracle for ScriptedRedact {
    async fn redact(&self, _text: &str) -> Result<RedactionOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcome.clone())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<AuditEvent>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn recorded(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for RecordingSink {
    async fn log_events(&self, events: &[AuditEvent]) -> Result<()> {
        if self.fail {
            return Err(WardenError::transport("audit", "sink offline"));
        }
        self.events.lock().unwrap().extend_from_slice(events);
        Ok(())
    }
}

pub struct RecordingModel {
    reply: String,
    pub seen: Mutex<Vec<PromptValue>>,
}

impl RecordingModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionModel for RecordingModel {
    async fn generate(&self, prompt: &PromptValue) -> Result<String> {
        self.seen.lock().unwrap().push(prompt.clone());
        Ok(self.reply.clone())
    }
}
