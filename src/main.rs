mod banner;
mod config;
mod error;
mod logger;
mod pipeline;
mod prompt;
mod services;
mod warden;

use crate::config::{SecretToken, WardenSettings};
use crate::error::WardenError;
use crate::pipeline::DEFAULT_THRESHOLD;
use crate::warden::Warden;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prompt-warden")]
#[command(about = "The checkpoint between your prompt and the model", long_about = None)]
struct Cli {
    /// Prompt text to screen and complete
    prompt: String,

    /// Domain hosting the intel, redact, and audit services
    #[arg(long, env = "WARDEN_SERVICE_DOMAIN")]
    service_domain: Option<String>,

    /// Audit log API token
    #[arg(long, env = "WARDEN_AUDIT_TOKEN", hide_env_values = true)]
    audit_token: SecretToken,

    /// Redact API token
    #[arg(long, env = "WARDEN_REDACT_TOKEN", hide_env_values = true)]
    redact_token: SecretToken,

    /// Domain intel API token
    #[arg(long, env = "WARDEN_DOMAIN_INTEL_TOKEN", hide_env_values = true)]
    domain_intel_token: SecretToken,

    /// IP intel API token
    #[arg(long, env = "WARDEN_IP_INTEL_TOKEN", hide_env_values = true)]
    ip_intel_token: SecretToken,

    /// URL intel API token
    #[arg(long, env = "WARDEN_URL_INTEL_TOKEN", hide_env_values = true)]
    url_intel_token: SecretToken,

    /// Completion model API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    model_api_key: SecretToken,

    /// Completion model
    #[arg(long)]
    model: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long)]
    model_endpoint: Option<String>,

    /// Malice threshold for the domain guard (0-100)
    #[arg(long)]
    domain_threshold: Option<u8>,

    /// Malice threshold for the IP guard (0-100)
    #[arg(long)]
    ip_threshold: Option<u8>,

    /// Malice threshold for the URL guard (0-100)
    #[arg(long)]
    url_threshold: Option<u8>,

    /// Per-request timeout for remote services, in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

fn get_env_path() -> PathBuf {
    // Determine the base directory: the directory containing the executable.
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(".env");
        }
    }
    std::env::current_dir().unwrap_or_default().join(".env")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init_logger();

    let env_path = get_env_path();
    if env_path.exists() {
        match dotenvy::from_path(&env_path) {
            Ok(_) => tracing::info!("Loaded .env from: {}", env_path.display()),
            Err(e) => tracing::error!("Failed to load .env from {}: {}", env_path.display(), e),
        }
    }

    let cli = Cli::parse();
    banner::print_banner();

    let file_config = config::load_config();
    let guards = file_config.guards.clone().unwrap_or_default();
    let model_section = file_config.model.clone().unwrap_or_default();

    let service_domain = cli
        .service_domain
        .or(file_config
            .service
            .as_ref()
            .and_then(|s| s.domain.clone()))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No service domain configured. Pass --service-domain, set WARDEN_SERVICE_DOMAIN, or add [service].domain to warden.toml."
            )
        })?;

    let settings = WardenSettings {
        service_domain,
        audit_token: cli.audit_token,
        redact_token: cli.redact_token,
        domain_intel_token: cli.domain_intel_token,
        ip_intel_token: cli.ip_intel_token,
        url_intel_token: cli.url_intel_token,
        domain_threshold: cli
            .domain_threshold
            .or(guards.domain_threshold)
            .unwrap_or(DEFAULT_THRESHOLD),
        ip_threshold: cli
            .ip_threshold
            .or(guards.ip_threshold)
            .unwrap_or(DEFAULT_THRESHOLD),
        url_threshold: cli
            .url_threshold
            .or(guards.url_threshold)
            .unwrap_or(DEFAULT_THRESHOLD),
        model: cli
            .model
            .or(model_section.name)
            .unwrap_or_else(|| config::DEFAULT_MODEL.to_string()),
        model_endpoint: cli
            .model_endpoint
            .or(model_section.endpoint)
            .unwrap_or_else(|| config::DEFAULT_MODEL_ENDPOINT.to_string()),
        model_api_key: cli.model_api_key,
        timeout_seconds: cli
            .timeout
            .or(file_config
                .service
                .as_ref()
                .and_then(|s| s.timeout_seconds))
            .unwrap_or(config::DEFAULT_TIMEOUT_SECONDS),
    };

    banner::print_startup_info(
        &settings.service_domain,
        &settings.model,
        &format!(
            "domain={} ip={} url={}",
            settings.domain_threshold, settings.ip_threshold, settings.url_threshold
        ),
    );

    let warden = Warden::assemble(&settings)?;

    // Ctrl+C cancels the run; in-flight oracle calls are abandoned.
    let cancel = tokio_util::sync::CancellationToken::new();
    let t = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            t.cancel();
        }
    });

    banner::print_step("Screening prompt...");

    match warden.protect(&cli.prompt, &cancel).await {
        Ok(completion) => {
            banner::print_success("Prompt cleared the pipeline.");
            println!("{}", completion);
            Ok(())
        }
        Err(err) => {
            // Each rejection category gets its own message; never conflated.
            let message = match &err {
                WardenError::MaliciousDomains => {
                    "The prompt contained malicious domains.".to_string()
                }
                WardenError::MaliciousIpAddresses => {
                    "The prompt contained malicious IP addresses.".to_string()
                }
                WardenError::MaliciousUrls => "The prompt contained malicious URLs.".to_string(),
                WardenError::MalformedPrompt => {
                    "The prompt has no human message to inspect.".to_string()
                }
                WardenError::Cancelled => "Cancelled before the pipeline finished.".to_string(),
                WardenError::Transport { service, reason } => {
                    format!("Infrastructure failure in {}: {}", service, reason)
                }
            };
            banner::print_error(&message);
            if !err.is_rejection()
                && !matches!(
                    err,
                    WardenError::MalformedPrompt | WardenError::Cancelled
                )
            {
                banner::print_warning(
                    "This is an infrastructure failure, not a verdict on the prompt; retrying may succeed.",
                );
            }
            Err(err.into())
        }
    }
}
