use std::collections::HashMap;
use std::time::Duration;

use signflow_utils::error::ConfigError;

use super::discovery::ATTRIBUTED_KEYS;
use super::{AgreementConfig, Config, ConfigSource, ProviderConfig, RetryConfig};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding signflow in a host that already owns its
    /// configuration and should not depend on files or the working directory.
    ///
    /// # Example
    ///
    /// ```rust
    /// use signflow_config::Config;
    /// use std::time::Duration;
    ///
    /// let config = Config::builder()
    ///     .base_url("https://api.na1.adobesign.com/api/rest/v6")
    ///     .signer_email("signer@example.com")
    ///     .redirect_url("https://app.example.com/process-signed-document")
    ///     .max_attempts(5)
    ///     .retry_delay(Duration::from_millis(500))
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.max_attempts(), 5);
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for programmatic configuration of signflow.
///
/// All values set via the builder are attributed to `ConfigSource::Programmatic`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    provider: ProviderConfig,
    agreement: AgreementConfig,
    retry: RetryConfig,
    touched: Vec<&'static str>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn mark(mut self, key: &'static str) -> Self {
        self.touched.push(key);
        self
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.provider.base_url = Some(base_url.into());
        self.mark("provider.base_url")
    }

    #[must_use]
    pub fn api_key_env(mut self, var: impl Into<String>) -> Self {
        self.provider.api_key_env = Some(var.into());
        self.mark("provider.api_key_env")
    }

    #[must_use]
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.provider.http_timeout_secs = Some(timeout.as_secs());
        self.mark("provider.http_timeout_secs")
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.provider.connect_timeout_secs = Some(timeout.as_secs());
        self.mark("provider.connect_timeout_secs")
    }

    #[must_use]
    pub fn signer_email(mut self, email: impl Into<String>) -> Self {
        self.agreement.signer_email = Some(email.into());
        self.mark("agreement.signer_email")
    }

    #[must_use]
    pub fn redirect_url(mut self, url: impl Into<String>) -> Self {
        self.agreement.redirect_url = Some(url.into());
        self.mark("agreement.redirect_url")
    }

    #[must_use]
    pub fn agreement_name(mut self, name: impl Into<String>) -> Self {
        self.agreement.name = Some(name.into());
        self.mark("agreement.name")
    }

    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.agreement.locale = Some(locale.into());
        self.mark("agreement.locale")
    }

    #[must_use]
    pub fn redirect_delay_secs(mut self, secs: u32) -> Self {
        self.agreement.redirect_delay_secs = Some(secs);
        self.mark("agreement.redirect_delay_secs")
    }

    #[must_use]
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.retry.max_attempts = Some(max_attempts);
        self.mark("retry.max_attempts")
    }

    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry.delay_ms = Some(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX));
        self.mark("retry.delay_ms")
    }

    /// Build the configuration, applying the same validation as discovery.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for out-of-range or malformed values.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut source_attribution: HashMap<String, ConfigSource> = ATTRIBUTED_KEYS
            .iter()
            .map(|key| ((*key).to_string(), ConfigSource::Default))
            .collect();
        for key in self.touched {
            source_attribution.insert(key.to_string(), ConfigSource::Programmatic);
        }

        let config = Config {
            provider: self.provider,
            agreement: self.agreement,
            retry: self.retry,
            source_attribution,
            config_path: None,
        };
        config.validate()?;
        Ok(config)
    }
}
