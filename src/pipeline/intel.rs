//! Reputation guard.
//!
//! One algorithm, three instances: the domain, IP, and URL guards differ only
//! in {extraction pattern, oracle handle, threshold, error kind}. A guard
//! never rewrites text; it either passes its input through untouched or
//! rejects the whole request.

use crate::error::{Result, WardenError};
use crate::pipeline::extract::{extract, IndicatorKind};
use crate::pipeline::Stage;
use crate::prompt::PromptValue;
use crate::services::ReputationOracle;
use async_trait::async_trait;
use std::sync::Arc;

pub const DEFAULT_THRESHOLD: u8 = 70;

pub struct IntelGuard {
    kind: IndicatorKind,
    oracle: Arc<dyn ReputationOracle>,
    threshold: u8,
}

impl IntelGuard {
    pub fn new(kind: IndicatorKind, oracle: Arc<dyn ReputationOracle>, threshold: u8) -> Self {
        Self {
            kind,
            oracle,
            threshold,
        }
    }

    fn malice_error(&self) -> WardenError {
        match self.kind {
            IndicatorKind::Domain => WardenError::MaliciousDomains,
            IndicatorKind::Ip => WardenError::MaliciousIpAddresses,
            IndicatorKind::Url => WardenError::MaliciousUrls,
        }
    }
}

#[async_trait]
impl Stage for IntelGuard {
    fn name(&self) -> &'static str {
        match self.kind {
            IndicatorKind::Domain => "domain-guard",
            IndicatorKind::Ip => "ip-guard",
            IndicatorKind::Url => "url-guard",
        }
    }

    async fn apply(&self, prompt: PromptValue) -> Result<PromptValue> {
        let text = prompt.latest_human_text()?;

        let indicators = extract(text, self.kind);
        if indicators.is_empty() {
            // Nothing to screen; skip the oracle round-trip entirely.
            return Ok(prompt);
        }

        // One bulk lookup for the whole set, never one call per indicator.
        let scores = self.oracle.bulk_score(&indicators).await?;

        // A partial response cannot be trusted for any verdict: refuse it
        // before comparing scores.
        for indicator in &indicators {
            if !scores.contains_key(indicator) {
                return Err(WardenError::transport(
                    self.name(),
                    format!("response is missing a score for \"{}\"", indicator),
                ));
            }
        }

        for indicator in &indicators {
            let score = scores[indicator];
            if score >= self.threshold {
                tracing::warn!(
                    "{} scored {} (threshold {}), rejecting prompt",
                    self.kind.label(),
                    score,
                    self.threshold
                );
                return Err(self.malice_error());
            }
        }

        Ok(prompt)
    }
}
