//! Configuration for the provider client, agreement settings and retry policy.

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use model::*;
pub use signflow_utils::types::ConfigSource;

use std::time::Duration;

use signflow_utils::error::ConfigError;

impl Config {
    /// Provider REST base URL, e.g. `https://api.na1.adobesign.com/api/rest/v6`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when no base URL was configured.
    pub fn base_url(&self) -> Result<&str, ConfigError> {
        self.provider
            .base_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingRequired("provider.base_url".to_string()))
    }

    /// Name of the environment variable holding the bearer credential
    #[must_use]
    pub fn api_key_env(&self) -> &str {
        self.provider
            .api_key_env
            .as_deref()
            .unwrap_or(DEFAULT_API_KEY_ENV)
    }

    /// Read the bearer credential from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired("env:<VAR>")` if the variable is
    /// unset or blank.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        let var = self.api_key_env();
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(ConfigError::MissingRequired(format!("env:{var}"))),
        }
    }

    /// Email of the single signer on every agreement, surrounding whitespace removed
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when not configured.
    pub fn signer_email(&self) -> Result<&str, ConfigError> {
        self.agreement
            .signer_email
            .as_deref()
            .map(str::trim)
            .ok_or_else(|| ConfigError::MissingRequired("agreement.signer_email".to_string()))
    }

    /// URL the provider redirects the signer to after signing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when not configured.
    pub fn redirect_url(&self) -> Result<&str, ConfigError> {
        self.agreement
            .redirect_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingRequired("agreement.redirect_url".to_string()))
    }

    #[must_use]
    pub fn agreement_name(&self) -> &str {
        self.agreement
            .name
            .as_deref()
            .unwrap_or(DEFAULT_AGREEMENT_NAME)
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        self.agreement.locale.as_deref().unwrap_or(DEFAULT_LOCALE)
    }

    #[must_use]
    pub fn redirect_delay_secs(&self) -> u32 {
        self.agreement
            .redirect_delay_secs
            .unwrap_or(DEFAULT_REDIRECT_DELAY_SECS)
    }

    /// Maximum number of signing-URL resolution attempts
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.retry.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    /// Constant delay between signing-URL resolution attempts
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry.delay_ms.unwrap_or(DEFAULT_RETRY_DELAY_MS))
    }

    /// Per-request timeout for provider calls
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(
            self.provider
                .http_timeout_secs
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
        )
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.provider
                .connect_timeout_secs
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    /// Configuration with no file and no CLI overrides, for tests.
    #[cfg(any(test, feature = "test-utils"))]
    #[must_use]
    pub fn minimal_for_testing() -> Self {
        Self {
            provider: ProviderConfig {
                base_url: Some("http://127.0.0.1:9".to_string()),
                ..ProviderConfig::default()
            },
            agreement: AgreementConfig {
                signer_email: Some("signer@example.com".to_string()),
                redirect_url: Some("https://app.example.com/process-signed-document".to_string()),
                ..AgreementConfig::default()
            },
            retry: RetryConfig::default(),
            source_attribution: std::collections::HashMap::new(),
            config_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = Config::minimal_for_testing();
        assert_eq!(config.api_key_env(), "SIGNFLOW_API_KEY");
        assert_eq!(config.agreement_name(), "TestAgreement");
        assert_eq!(config.locale(), "en_US");
        assert_eq!(config.redirect_delay_secs(), 0);
        assert_eq!(config.max_attempts(), 5);
        assert_eq!(config.retry_delay(), Duration::from_millis(1000));
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_signer_email_is_trimmed() {
        let config = Config::builder()
            .signer_email("  a@b.com ")
            .build()
            .unwrap();
        assert_eq!(config.signer_email().unwrap(), "a@b.com");
    }

    #[test]
    fn test_required_values_report_their_key() {
        let mut config = Config::minimal_for_testing();
        config.provider.base_url = None;
        config.agreement.signer_email = None;

        match config.base_url() {
            Err(ConfigError::MissingRequired(key)) => assert_eq!(key, "provider.base_url"),
            other => panic!("Expected MissingRequired, got {other:?}"),
        }
        match config.signer_email() {
            Err(ConfigError::MissingRequired(key)) => assert_eq!(key, "agreement.signer_email"),
            other => panic!("Expected MissingRequired, got {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_api_key_read_from_configured_env_var() {
        let var = "SIGNFLOW_TEST_API_KEY_PRESENT";
        // SAFETY: serialised with other env-mutating tests
        unsafe {
            std::env::set_var(var, "  integration-key  ");
        }

        let mut config = Config::minimal_for_testing();
        config.provider.api_key_env = Some(var.to_string());
        assert_eq!(config.api_key().unwrap(), "integration-key");

        unsafe {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_api_key_missing_names_the_variable() {
        let var = "SIGNFLOW_TEST_API_KEY_MISSING";
        unsafe {
            std::env::remove_var(var);
        }

        let mut config = Config::minimal_for_testing();
        config.provider.api_key_env = Some(var.to_string());
        match config.api_key() {
            Err(ConfigError::MissingRequired(key)) => {
                assert_eq!(key, format!("env:{var}"));
            }
            other => panic!("Expected MissingRequired, got {other:?}"),
        }
    }
}
