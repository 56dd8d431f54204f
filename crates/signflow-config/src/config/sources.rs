use std::collections::BTreeMap;

use super::{Config, ConfigSource};

impl Config {
    fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .copied()
            .unwrap_or(ConfigSource::Default)
    }

    /// Get effective configuration as key-value pairs with source attribution.
    ///
    /// Unset required values are listed as `<unset>`. The credential itself is
    /// never included; only the name of the variable it is read from.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, ConfigSource)> {
        let mut config = BTreeMap::new();

        let mut add = |key: &str, value: String| {
            let source = self.source_of(key);
            config.insert(key.to_string(), (value, source));
        };

        let or_unset = |value: Option<&str>| value.unwrap_or("<unset>").to_string();

        add("provider.base_url", or_unset(self.provider.base_url.as_deref()));
        add("provider.api_key_env", self.api_key_env().to_string());
        add(
            "provider.http_timeout_secs",
            self.http_timeout().as_secs().to_string(),
        );
        add(
            "provider.connect_timeout_secs",
            self.connect_timeout().as_secs().to_string(),
        );
        add(
            "agreement.signer_email",
            or_unset(self.agreement.signer_email.as_deref()),
        );
        add(
            "agreement.redirect_url",
            or_unset(self.agreement.redirect_url.as_deref()),
        );
        add("agreement.name", self.agreement_name().to_string());
        add("agreement.locale", self.locale().to_string());
        add(
            "agreement.redirect_delay_secs",
            self.redirect_delay_secs().to_string(),
        );
        add("retry.max_attempts", self.max_attempts().to_string());
        add(
            "retry.delay_ms",
            self.retry_delay().as_millis().to_string(),
        );

        config
    }
}
