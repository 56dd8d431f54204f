use signflow_utils::error::ConfigError;

use super::Config;

/// Upper bound on signing-URL resolution attempts
pub(crate) const MAX_ATTEMPTS_LIMIT: u32 = 100;

/// Upper bound on the retry delay (10 minutes)
pub(crate) const MAX_DELAY_MS: u64 = 600_000;

/// Upper bound on the per-request HTTP timeout (1 hour)
pub(crate) const MAX_HTTP_TIMEOUT_SECS: u64 = 3600;

fn invalid(key: &str, value: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    }
}

/// Require an absolute http(s) URL.
fn validate_http_url(key: &str, raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|e| invalid(key, format!("'{raw}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(key, format!("unsupported scheme '{other}'"))),
    }
    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return Err(invalid(key, format!("'{raw}' is not an absolute URL")));
    }
    Ok(())
}

impl Config {
    /// Validate configuration values
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_url) = self.provider.base_url.as_deref() {
            validate_http_url("provider.base_url", base_url)?;
        }

        if let Some(env) = self.provider.api_key_env.as_deref() {
            if env.trim().is_empty() {
                return Err(invalid("provider.api_key_env", "must not be empty"));
            }
        }

        if let Some(timeout) = self.provider.http_timeout_secs {
            if timeout == 0 {
                return Err(invalid("provider.http_timeout_secs", "must be greater than 0"));
            }
            if timeout > MAX_HTTP_TIMEOUT_SECS {
                return Err(invalid(
                    "provider.http_timeout_secs",
                    format!("exceeds maximum limit of {MAX_HTTP_TIMEOUT_SECS} seconds"),
                ));
            }
        }

        if let Some(timeout) = self.provider.connect_timeout_secs {
            if timeout == 0 {
                return Err(invalid(
                    "provider.connect_timeout_secs",
                    "must be greater than 0",
                ));
            }
        }

        if let Some(email) = self.agreement.signer_email.as_deref() {
            let trimmed = email.trim();
            if trimmed.is_empty() || !trimmed.contains('@') {
                return Err(invalid(
                    "agreement.signer_email",
                    format!("'{email}' is not an email address"),
                ));
            }
        }

        if let Some(redirect_url) = self.agreement.redirect_url.as_deref() {
            validate_http_url("agreement.redirect_url", redirect_url)?;
        }

        if let Some(name) = self.agreement.name.as_deref() {
            if name.trim().is_empty() {
                return Err(invalid("agreement.name", "must not be empty"));
            }
        }

        if let Some(max_attempts) = self.retry.max_attempts {
            if max_attempts == 0 {
                return Err(invalid("retry.max_attempts", "must be greater than 0"));
            }
            if max_attempts > MAX_ATTEMPTS_LIMIT {
                return Err(invalid(
                    "retry.max_attempts",
                    format!("exceeds maximum limit of {MAX_ATTEMPTS_LIMIT}"),
                ));
            }
        }

        if let Some(delay_ms) = self.retry.delay_ms {
            if delay_ms > MAX_DELAY_MS {
                return Err(invalid(
                    "retry.delay_ms",
                    format!("exceeds maximum limit of {MAX_DELAY_MS} ms"),
                ));
            }
        }

        Ok(())
    }
}
