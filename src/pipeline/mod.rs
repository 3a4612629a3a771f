//! The guarded pipeline.
//!
//! Stages are an explicit ordered list run by one executor loop, not nested
//! call-forwarding: ordering and error propagation stay auditable, and each
//! stage is testable in isolation. The first stage to fail aborts the run.
//!
//! Fixed order: audit → redact → domain guard → IP guard → URL guard.
//! Redaction runs after the mandatory audit so the original is durably
//! logged, and before the guards so scrubbed text is what reaches the
//! third-party intel services.

use crate::error::{Result, WardenError};
use crate::prompt::PromptValue;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

pub mod audit;
pub mod extract;
pub mod intel;
pub mod redact;

pub use audit::AuditStage;
pub use extract::IndicatorKind;
pub use intel::{IntelGuard, DEFAULT_THRESHOLD};
pub use redact::RedactStage;

/// One transform over a [`PromptValue`]. A stage passes its input through
/// (possibly rewritten) or fails, rejecting the whole request.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn apply(&self, prompt: PromptValue) -> Result<PromptValue>;
}

/// Runs stages in order with fail-fast short-circuiting. Stateless between
/// invocations; one assembled pipeline is safe to run concurrently.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Feeds `prompt` through every stage. A triggered cancellation token
    /// aborts in-flight work and surfaces as [`WardenError::Cancelled`],
    /// never as a malice verdict.
    pub async fn run(
        &self,
        prompt: PromptValue,
        cancel: &CancellationToken,
    ) -> Result<PromptValue> {
        let mut current = prompt;

        for stage in &self.stages {
            tracing::debug!("Running stage {}", stage.name());
            current = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(WardenError::Cancelled),
                result = stage.apply(current) => result?,
            };
        }

        Ok(current)
    }
}
