use crate::banner;
use serde::Deserialize;
use std::fmt;
use std::fs;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MODEL_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// An API token that never appears in logs or debug output.
#[derive(Clone)]
pub struct SecretToken(String);

impl SecretToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn reveal(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Length only, mirroring what we allow into the logs.
        write!(f, "SecretToken(len={})", self.0.len())
    }
}

impl std::str::FromStr for SecretToken {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct FileConfig {
    pub service: Option<ServiceSection>,
    pub guards: Option<GuardsSection>,
    pub model: Option<ModelSection>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ServiceSection {
    pub domain: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct GuardsSection {
    pub domain_threshold: Option<u8>,
    pub ip_threshold: Option<u8>,
    pub url_threshold: Option<u8>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct ModelSection {
    pub name: Option<String>,
    pub endpoint: Option<String>,
}

/// Everything pipeline assembly needs, resolved from flags, environment, and
/// `warden.toml`. Immutable once built; shared read-only across invocations.
pub struct WardenSettings {
    pub service_domain: String,
    pub audit_token: SecretToken,
    pub redact_token: SecretToken,
    pub domain_intel_token: SecretToken,
    pub ip_intel_token: SecretToken,
    pub url_intel_token: SecretToken,
    pub domain_threshold: u8,
    pub ip_threshold: u8,
    pub url_threshold: u8,
    pub model: String,
    pub model_endpoint: String,
    pub model_api_key: SecretToken,
    pub timeout_seconds: u64,
}

pub fn load_config() -> FileConfig {
    // The config file lives next to the executable, like the .env file.
    let base_dir = if let Ok(exe_path) = std::env::current_exe() {
        exe_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
    } else {
        std::env::current_dir().unwrap_or_default()
    };

    let path = base_dir.join("warden.toml");

    if path.exists() {
        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<FileConfig>(&content) {
                Ok(config) => {
                    banner::print_success(&format!("Loaded config from {}", path.display()));
                    return config;
                }
                Err(e) => {
                    banner::print_error(&format!("Failed to parse {}: {}", path.display(), e))
                }
            },
            Err(e) => banner::print_error(&format!("Failed to read {}: {}", path.display(), e)),
        }
    } else {
        tracing::info!("No warden.toml found at {}. Using defaults.", path.display());
    }
    FileConfig::default()
}
