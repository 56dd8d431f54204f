use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use signflow_utils::error::ConfigError;
use tracing::debug;

use super::{AgreementConfig, CliArgs, Config, ConfigSource, ProviderConfig, RetryConfig};

/// Environment variable pointing at a directory that contains `config.toml`
pub const HOME_ENV_VAR: &str = "SIGNFLOW_HOME";

/// Keys tracked in the source attribution map
pub(crate) const ATTRIBUTED_KEYS: &[&str] = &[
    "provider.base_url",
    "provider.api_key_env",
    "provider.http_timeout_secs",
    "provider.connect_timeout_secs",
    "agreement.signer_email",
    "agreement.redirect_url",
    "agreement.name",
    "agreement.locale",
    "agreement.redirect_delay_secs",
    "retry.max_attempts",
    "retry.delay_ms",
];

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    provider: Option<ProviderConfig>,
    agreement: Option<AgreementConfig>,
    retry: Option<RetryConfig>,
}

/// Overwrite `target` with `value` when it is set, recording `source` for `key`.
fn apply<T>(
    target: &mut Option<T>,
    value: Option<T>,
    key: &str,
    source: ConfigSource,
    attribution: &mut HashMap<String, ConfigSource>,
) {
    if value.is_some() {
        *target = value;
        attribution.insert(key.to_string(), source);
    }
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the current directory cannot be read, a config
    /// file cannot be parsed, or validation fails.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = std::env::current_dir().map_err(|e| ConfigError::DiscoveryFailed {
            reason: format!("Failed to get current directory: {e}"),
        })?;

        if cli_args.config_path.is_none() {
            if let Some(home) = std::env::var_os(HOME_ENV_VAR) {
                let candidate = PathBuf::from(home).join("config.toml");
                if candidate.is_file() {
                    let args = CliArgs {
                        config_path: Some(candidate),
                        ..cli_args.clone()
                    };
                    return Self::discover_from(&start_dir, &args);
                }
            }
        }

        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// This is the path-driven variant used by tests to avoid process-global state.
    ///
    /// # Errors
    ///
    /// See [`Config::discover`].
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut source_attribution: HashMap<String, ConfigSource> = ATTRIBUTED_KEYS
            .iter()
            .map(|key| ((*key).to_string(), ConfigSource::Default))
            .collect();

        let mut provider = ProviderConfig::default();
        let mut agreement = AgreementConfig::default();
        let mut retry = RetryConfig::default();

        let config_path = match &cli_args.config_path {
            Some(explicit) => {
                if !explicit.is_file() {
                    return Err(ConfigError::NotFound {
                        path: explicit.display().to_string(),
                    });
                }
                Some(explicit.clone())
            }
            None => Self::discover_config_file_from(start_dir),
        };

        if let Some(path) = &config_path {
            debug!(path = %path.display(), "Loading config file");
            let file = Self::load_config_file(path)?;
            let src = ConfigSource::Config;
            let attr = &mut source_attribution;

            if let Some(p) = file.provider {
                apply(&mut provider.base_url, p.base_url, "provider.base_url", src, attr);
                apply(&mut provider.api_key_env, p.api_key_env, "provider.api_key_env", src, attr);
                apply(
                    &mut provider.http_timeout_secs,
                    p.http_timeout_secs,
                    "provider.http_timeout_secs",
                    src,
                    attr,
                );
                apply(
                    &mut provider.connect_timeout_secs,
                    p.connect_timeout_secs,
                    "provider.connect_timeout_secs",
                    src,
                    attr,
                );
            }

            if let Some(a) = file.agreement {
                apply(&mut agreement.signer_email, a.signer_email, "agreement.signer_email", src, attr);
                apply(&mut agreement.redirect_url, a.redirect_url, "agreement.redirect_url", src, attr);
                apply(&mut agreement.name, a.name, "agreement.name", src, attr);
                apply(&mut agreement.locale, a.locale, "agreement.locale", src, attr);
                apply(
                    &mut agreement.redirect_delay_secs,
                    a.redirect_delay_secs,
                    "agreement.redirect_delay_secs",
                    src,
                    attr,
                );
            }

            if let Some(r) = file.retry {
                apply(&mut retry.max_attempts, r.max_attempts, "retry.max_attempts", src, attr);
                apply(&mut retry.delay_ms, r.delay_ms, "retry.delay_ms", src, attr);
            }
        }

        // CLI overrides
        let src = ConfigSource::Cli;
        let attr = &mut source_attribution;
        apply(&mut provider.base_url, cli_args.base_url.clone(), "provider.base_url", src, attr);
        apply(
            &mut agreement.signer_email,
            cli_args.signer_email.clone(),
            "agreement.signer_email",
            src,
            attr,
        );
        apply(
            &mut agreement.redirect_url,
            cli_args.redirect_url.clone(),
            "agreement.redirect_url",
            src,
            attr,
        );
        apply(&mut retry.max_attempts, cli_args.max_attempts, "retry.max_attempts", src, attr);
        apply(&mut retry.delay_ms, cli_args.retry_delay_ms, "retry.delay_ms", src, attr);

        let config = Self {
            provider,
            agreement,
            retry,
            source_attribution,
            config_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Search upward from `start_dir` for `.signflow/config.toml`.
    ///
    /// Stops at the filesystem root or at the first repository root
    /// (`.git`, `.hg`, `.svn`).
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = start_dir;

        loop {
            let config_path = current_dir.join(".signflow").join("config.toml");
            if config_path.is_file() {
                return Some(config_path);
            }

            if current_dir.join(".git").exists()
                || current_dir.join(".hg").exists()
                || current_dir.join(".svn").exists()
            {
                return None;
            }

            current_dir = current_dir.parent()?;
        }
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DiscoveryFailed {
            reason: format!("Failed to read {}: {e}", path.display()),
        })?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {e}", path.display())))
    }
}
