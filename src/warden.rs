//! Pipeline assembly and the host-facing `protect` operation.

use crate::config::WardenSettings;
use crate::error::{Result, WardenError};
use crate::pipeline::{
    AuditStage, IndicatorKind, IntelGuard, Pipeline, RedactStage, Stage,
};
use crate::prompt::PromptValue;
use crate::services::http::{AuditClient, IntelClient, RedactClient};
use crate::services::model::ChatModelClient;
use crate::services::{AuditSink, CompletionModel, ReputationOracle};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// An assembled pipeline plus the downstream model. Built once, then safe to
/// share across concurrent `protect` calls.
pub struct Warden {
    pipeline: Pipeline,
    model: Arc<dyn CompletionModel>,
}

impl Warden {
    pub fn new(pipeline: Pipeline, model: Arc<dyn CompletionModel>) -> Self {
        Self { pipeline, model }
    }

    /// Wires the fixed stage order to live HTTP clients:
    /// audit → redact → domain guard → IP guard → URL guard.
    pub fn assemble(settings: &WardenSettings) -> Result<Self> {
        let timeout = settings.timeout_seconds;

        let audit: Arc<dyn AuditSink> = Arc::new(AuditClient::new(
            &settings.service_domain,
            settings.audit_token.clone(),
            timeout,
        )?);

        let redact_oracle = Arc::new(RedactClient::new(
            &settings.service_domain,
            settings.redact_token.clone(),
            timeout,
        )?);

        let domain_oracle: Arc<dyn ReputationOracle> = Arc::new(IntelClient::new(
            "domain-intel",
            &settings.service_domain,
            settings.domain_intel_token.clone(),
            timeout,
        )?);
        let ip_oracle: Arc<dyn ReputationOracle> = Arc::new(IntelClient::new(
            "ip-intel",
            &settings.service_domain,
            settings.ip_intel_token.clone(),
            timeout,
        )?);
        let url_oracle: Arc<dyn ReputationOracle> = Arc::new(IntelClient::new(
            "url-intel",
            &settings.service_domain,
            settings.url_intel_token.clone(),
            timeout,
        )?);

        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(AuditStage::new(audit.clone())),
            Box::new(RedactStage::new(redact_oracle, Some(audit))),
            Box::new(IntelGuard::new(
                IndicatorKind::Domain,
                domain_oracle,
                settings.domain_threshold,
            )),
            Box::new(IntelGuard::new(
                IndicatorKind::Ip,
                ip_oracle,
                settings.ip_threshold,
            )),
            Box::new(IntelGuard::new(
                IndicatorKind::Url,
                url_oracle,
                settings.url_threshold,
            )),
        ];

        let model = Arc::new(ChatModelClient::new(
            &settings.model_endpoint,
            settings.model.clone(),
            settings.model_api_key.clone(),
            timeout,
        )?);

        Ok(Self::new(Pipeline::new(stages), model))
    }

    /// Audits, redacts, and threat-screens `raw_prompt`, then hands the
    /// surviving prompt to the model. The first failing stage rejects the
    /// whole request; the model is never invoked for a rejected prompt.
    pub async fn protect(&self, raw_prompt: &str, cancel: &CancellationToken) -> Result<String> {
        let prompt = PromptValue::from_human(raw_prompt);
        let screened = self.pipeline.run(prompt, cancel).await?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(WardenError::Cancelled),
            completion = self.model.generate(&screened) => completion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::DEFAULT_THRESHOLD;
    use crate::services::doubles::{
        RecordingModel, RecordingSink, ScriptedOracle, ScriptedRedact,
    };
    use crate::services::RedactOracle;

    struct Fixture {
        sink: Arc<RecordingSink>,
        domain_oracle: Arc<ScriptedOracle>,
        ip_oracle: Arc<ScriptedOracle>,
        url_oracle: Arc<ScriptedOracle>,
        model: Arc<RecordingModel>,
        warden: Warden,
    }

    /// A full five-stage pipeline over scripted collaborators.
    fn fixture(redact: Arc<dyn RedactOracle>, scores: &[(&str, u8)]) -> Fixture {
        let sink = Arc::new(RecordingSink::default());
        let domain_oracle = Arc::new(ScriptedOracle::new(scores));
        let ip_oracle = Arc::new(ScriptedOracle::new(scores));
        let url_oracle = Arc::new(ScriptedOracle::new(scores));
        let model = Arc::new(RecordingModel::new("completion text"));

        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(AuditStage::new(sink.clone())),
            Box::new(RedactStage::new(redact, Some(sink.clone()))),
            Box::new(IntelGuard::new(
                IndicatorKind::Domain,
                domain_oracle.clone(),
                DEFAULT_THRESHOLD,
            )),
            Box::new(IntelGuard::new(
                IndicatorKind::Ip,
                ip_oracle.clone(),
                DEFAULT_THRESHOLD,
            )),
            Box::new(IntelGuard::new(
                IndicatorKind::Url,
                url_oracle.clone(),
                DEFAULT_THRESHOLD,
            )),
        ];

        let warden = Warden::new(Pipeline::new(stages), model.clone());
        Fixture {
            sink,
            domain_oracle,
            ip_oracle,
            url_oracle,
            model,
            warden,
        }
    }

    #[tokio::test]
    async fn test_malicious_domain_rejects_before_the_model() {
        let f = fixture(
            Arc::new(ScriptedRedact::clean()),
            &[("evil-domain.test", 95)],
        );

        let result = f
            .warden
            .protect("Contact admin at evil-domain.test", &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(WardenError::MaliciousDomains)));
        assert_eq!(f.model.calls(), 0);
        // The receipt was still logged before the rejection.
        assert_eq!(f.sink.recorded().len(), 1);
    }

    #[tokio::test]
    async fn test_redacted_text_is_what_the_model_receives() {
        let f = fixture(
            Arc::new(ScriptedRedact::new(Some("My SSN is [REDACTED]"), 1)),
            &[],
        );

        let reply = f
            .warden
            .protect("My SSN is 123-45-6789", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(reply, "completion text");

        let seen = f.model.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].latest_human_text().unwrap(), "My SSN is [REDACTED]");
        drop(seen);

        // Receipt event plus one redaction event, in that order.
        let events = f.sink.recorded();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].before, "My SSN is 123-45-6789");
        assert_eq!(events[0].after, "My SSN is 123-45-6789");
        assert_eq!(events[1].before, "My SSN is 123-45-6789");
        assert_eq!(events[1].after, "My SSN is [REDACTED]");
    }

    #[tokio::test]
    async fn test_clean_prompt_flows_through_untouched() {
        let f = fixture(Arc::new(ScriptedRedact::clean()), &[]);

        let reply = f
            .warden
            .protect("Hello, how are you?", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(reply, "completion text");
        assert_eq!(f.sink.recorded().len(), 1);
        // No indicators anywhere, so no guard made an oracle call.
        assert_eq!(f.domain_oracle.calls(), 0);
        assert_eq!(f.ip_oracle.calls(), 0);
        assert_eq!(f.url_oracle.calls(), 0);

        let seen = f.model.seen.lock().unwrap();
        assert_eq!(seen[0].latest_human_text().unwrap(), "Hello, how are you?");
    }

    #[tokio::test]
    async fn test_cancellation_surfaces_as_cancelled() {
        let f = fixture(Arc::new(ScriptedRedact::clean()), &[]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = f.warden.protect("Hello", &cancel).await;
        assert!(matches!(result, Err(WardenError::Cancelled)));
        assert_eq!(f.model.calls(), 0);
    }
}
