use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use signflow_utils::types::ConfigSource;

/// Environment variable holding the bearer credential unless overridden
pub const DEFAULT_API_KEY_ENV: &str = "SIGNFLOW_API_KEY";

/// Per-request HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// TCP/TLS connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Agreement name sent with every agreement
pub const DEFAULT_AGREEMENT_NAME: &str = "TestAgreement";

pub const DEFAULT_LOCALE: &str = "en_US";

/// Seconds the provider waits before redirecting a signer who finished
pub const DEFAULT_REDIRECT_DELAY_SECS: u32 = 0;

/// Signing-URL resolution attempts before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Constant backoff between signing-URL resolution attempts
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// `[provider]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// REST API base URL; agreement paths are appended to it
    pub base_url: Option<String>,
    /// Name of the env var holding the bearer credential
    pub api_key_env: Option<String>,
    pub http_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

/// `[agreement]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgreementConfig {
    pub signer_email: Option<String>,
    pub redirect_url: Option<String>,
    pub name: Option<String>,
    pub locale: Option<String>,
    pub redirect_delay_secs: Option<u32>,
}

/// `[retry]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    pub max_attempts: Option<u32>,
    pub delay_ms: Option<u64>,
}

/// Configuration for signflow operations.
///
/// `Config` provides hierarchical configuration with discovery and precedence:
/// CLI arguments > config file > built-in defaults.
///
/// # Discovery
///
/// [`Config::discover()`]:
/// - Uses `--config <path>` when given
/// - Otherwise uses `$SIGNFLOW_HOME/config.toml` when that file exists
/// - Otherwise searches for `.signflow/config.toml` upward from the current
///   directory, stopping at a repository root
///
/// # Configuration File Format
///
/// ```toml
/// [provider]
/// base_url = "https://api.na1.adobesign.com/api/rest/v6"
/// api_key_env = "SIGNFLOW_API_KEY"
/// http_timeout_secs = 30
///
/// [agreement]
/// signer_email = "signer@example.com"
/// redirect_url = "https://app.example.com/process-signed-document"
///
/// [retry]
/// max_attempts = 5
/// delay_ms = 1000
/// ```
///
/// # Source Attribution
///
/// Each configuration value tracks its source (`cli`, `config`, `programmatic`
/// or `default`) for `signflow config`.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    pub agreement: AgreementConfig,
    pub retry: RetryConfig,
    pub source_attribution: HashMap<String, ConfigSource>,
    /// File the values were loaded from, if any
    pub config_path: Option<PathBuf>,
}
