use thiserror::Error;

pub type Result<T> = std::result::Result<T, WardenError>;

/// Everything that can abort a pipeline run.
///
/// The three malice variants are terminal verdicts about the prompt itself
/// and are reported to the caller as rejections. `Transport` covers failed,
/// timed-out, or structurally invalid oracle calls and must never be
/// conflated with a malice verdict.
#[derive(Debug, Error)]
pub enum WardenError {
    #[error("one or more domains scored at or above the malice threshold")]
    MaliciousDomains,

    #[error("one or more IP addresses scored at or above the malice threshold")]
    MaliciousIpAddresses,

    #[error("one or more URLs scored at or above the malice threshold")]
    MaliciousUrls,

    /// Caller contract violation: every prompt entering the pipeline must
    /// carry at least one human message.
    #[error("the prompt has no human message to inspect")]
    MalformedPrompt,

    #[error("{service} request failed: {reason}")]
    Transport {
        service: &'static str,
        reason: String,
    },

    #[error("the pipeline was cancelled before completion")]
    Cancelled,
}

impl WardenError {
    pub fn transport(service: &'static str, reason: impl Into<String>) -> Self {
        WardenError::Transport {
            service,
            reason: reason.into(),
        }
    }

    /// True for the guard verdicts that reject the prompt itself, as opposed
    /// to infrastructure failures the host may retry.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            WardenError::MaliciousDomains
                | WardenError::MaliciousIpAddresses
                | WardenError::MaliciousUrls
        )
    }
}
