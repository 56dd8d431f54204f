//! Error types for signflow
//!
//! Two layers:
//!
//! - [`SignError`] is what the provider client and the agreement workflow
//!   return. Every variant is a distinct tag; retryable and fatal conditions
//!   are told apart by [`SignError::kind`], never by downcasting.
//! - [`SignflowError`] is the library/CLI error that wraps configuration,
//!   workflow and I/O failures and maps them to exit codes.
//!
//! | Exit Code | Error |
//! |-----------|-------|
//! | 2 | Configuration or CLI argument errors |
//! | 3 | Completion invoked without a stored agreement id |
//! | 4 | Invalid input document or signer settings |
//! | 70 | Provider rejected a call, transport failure, malformed response |
//! | 75 | Signing URL never became available |
//! | 1 | Other errors |

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::exit_codes::ExitCode;
use crate::redaction::{redact_credentials, redact_error_message};

/// Library-level error type with user-friendly reporting.
#[derive(Error, Debug)]
pub enum SignflowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Sign(#[from] SignError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised by the provider client and the agreement workflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    /// Caller input rejected before any provider call (empty document, bad signer)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Provider resource does not exist yet (propagation delay)
    #[error("Provider resource not ready: {resource}")]
    NotReady { resource: String },

    /// Any other non-success provider response
    #[error("Provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    /// `NotReady` persisted for every allowed attempt
    #[error("Signing URL still not available after {attempts} attempt(s)")]
    RetryExhausted { attempts: u32 },

    /// Completion invoked without an agreement id from a prior initiation
    #[error("No agreement id is associated with this session")]
    MissingCorrelation,

    /// Request never produced an HTTP status (connect, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    /// 2xx response that lacks the fields the workflow needs
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Client could not be constructed from the supplied settings
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),

    /// Host asked the workflow to stop while it was waiting to retry
    #[error("Cancelled while waiting to retry")]
    Cancelled,
}

/// Tag of a [`SignError`], used by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotReady,
    Provider,
    RetryExhausted,
    MissingCorrelation,
    Transport,
    MalformedResponse,
    Misconfiguration,
    Cancelled,
}

impl ErrorKind {
    /// Stable snake_case name used in logs and JSON output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotReady => "not_ready",
            Self::Provider => "provider",
            Self::RetryExhausted => "retry_exhausted",
            Self::MissingCorrelation => "missing_correlation",
            Self::Transport => "transport",
            Self::MalformedResponse => "malformed_response",
            Self::Misconfiguration => "misconfiguration",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SignError {
    /// Build a `Provider` error from a status and raw body, redacting the body.
    #[must_use]
    pub fn provider(status: u16, body: &str) -> Self {
        Self::Provider {
            status,
            body: crate::redaction::sanitize_body(body),
        }
    }

    /// Build a `Transport` error, redacting credentials from the message.
    #[must_use]
    pub fn transport(message: impl AsRef<str>) -> Self {
        Self::Transport(redact_error_message(message.as_ref()))
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotReady { .. } => ErrorKind::NotReady,
            Self::Provider { .. } => ErrorKind::Provider,
            Self::RetryExhausted { .. } => ErrorKind::RetryExhausted,
            Self::MissingCorrelation => ErrorKind::MissingCorrelation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Misconfiguration(_) => ErrorKind::Misconfiguration,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether the retry policy may retry this error
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotReady)
    }

    /// HTTP status class a host front door should answer with.
    ///
    /// A missing correlation is the caller's fault; everything else is a
    /// generic server-side failure.
    #[must_use]
    pub const fn boundary_status(&self) -> u16 {
        match self {
            Self::MissingCorrelation => 400,
            _ => 500,
        }
    }
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Provider,
    Session,
    FileSystem,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Input => write!(f, "Input"),
            Self::Provider => write!(f, "Provider"),
            Self::Session => write!(f, "Session"),
            Self::FileSystem => write!(f, "File System"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Configuration discovery failed: {reason}")]
    DiscoveryFailed { reason: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::MissingRequired(key) => {
                format!("Required configuration '{key}' is missing")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => {
                format!("Configuration file not found: {path}")
            }
            Self::DiscoveryFailed { reason } => {
                format!("Failed to discover configuration: {reason}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "Configuration files must be valid TOML with [provider], [agreement] and [retry] sections."
                    .to_string(),
            ),
            Self::MissingRequired(_) => Some(
                "Some values have no default and are needed by the operation you ran.".to_string(),
            ),
            Self::InvalidValue { key, .. } => Some(format!(
                "The '{key}' configuration option has specific format requirements."
            )),
            Self::NotFound { .. } | Self::DiscoveryFailed { .. } => Some(
                "signflow searches for .signflow/config.toml starting from the current directory upward."
                    .to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax using a TOML validator".to_string(),
                "Run 'signflow config' to see which values were picked up".to_string(),
            ],
            Self::MissingRequired(key) => match key.as_str() {
                "provider.base_url" => vec![
                    "Set [provider] base_url in .signflow/config.toml".to_string(),
                    "Or pass --base-url on the command line".to_string(),
                ],
                "agreement.signer_email" => vec![
                    "Set [agreement] signer_email in .signflow/config.toml".to_string(),
                    "Or pass --signer-email on the command line".to_string(),
                ],
                "agreement.redirect_url" => vec![
                    "Set [agreement] redirect_url in .signflow/config.toml".to_string(),
                    "Or pass --redirect-url on the command line".to_string(),
                ],
                other if other.starts_with("env:") => vec![
                    format!(
                        "Export {} with the provider integration key",
                        other.trim_start_matches("env:")
                    ),
                    "Or point [provider] api_key_env at a variable that is set".to_string(),
                ],
                _ => vec!["Check the documentation for required configuration options".to_string()],
            },
            Self::InvalidValue { key, .. } => match key.as_str() {
                "retry.max_attempts" => vec!["Use an integer between 1 and 100".to_string()],
                "retry.delay_ms" => {
                    vec!["Use a delay of at most 600000 milliseconds (10 minutes)".to_string()]
                }
                "provider.base_url" | "agreement.redirect_url" => {
                    vec!["Use an absolute http:// or https:// URL".to_string()]
                }
                _ => vec![
                    "Check the documentation for valid values for this option".to_string(),
                    "Remove the option to use the default value".to_string(),
                ],
            },
            Self::NotFound { .. } => vec![
                "Create .signflow/config.toml in your project root".to_string(),
                "Use CLI flags instead of a configuration file".to_string(),
            ],
            Self::DiscoveryFailed { .. } => vec![
                "Check file permissions in the current directory and parent directories"
                    .to_string(),
                "Set SIGNFLOW_HOME to the directory containing config.toml".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

impl UserFriendlyError for SignError {
    fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => format!("Input rejected: {msg}"),
            Self::NotReady { resource } => format!("{resource} is not available yet"),
            Self::Provider { status, body } => {
                if body.is_empty() {
                    format!("E-signature provider returned HTTP {status}")
                } else {
                    format!("E-signature provider returned HTTP {status}: {body}")
                }
            }
            Self::RetryExhausted { attempts } => format!(
                "The signing URL did not become available after {attempts} attempt(s)"
            ),
            Self::MissingCorrelation => {
                "No agreement has been started for this session".to_string()
            }
            Self::Transport(msg) => format!("Could not reach the e-signature provider: {msg}"),
            Self::MalformedResponse(msg) => {
                format!("E-signature provider sent an unexpected response: {msg}")
            }
            Self::Misconfiguration(msg) => format!("Provider client configuration error: {msg}"),
            Self::Cancelled => "The operation was cancelled while waiting to retry".to_string(),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::RetryExhausted { .. } | Self::NotReady { .. } => Some(
                "Signing URLs take a moment to appear after an agreement is created.".to_string(),
            ),
            Self::MissingCorrelation => Some(
                "The signed document is looked up by the agreement id stored during initiation."
                    .to_string(),
            ),
            Self::Provider { status: 401 | 403, .. } => {
                Some("The provider rejected the bearer credential.".to_string())
            }
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::RetryExhausted { .. } => vec![
                "Increase [retry] max_attempts or delay_ms".to_string(),
                "Check the agreement state in the provider console".to_string(),
            ],
            Self::MissingCorrelation => vec![
                "Run 'signflow initiate' first and keep the agreement id".to_string(),
                "Pass --agreement-id to 'signflow complete'".to_string(),
            ],
            Self::Provider { status: 401 | 403, .. } => vec![
                "Check that the integration key in the configured env var is valid".to_string(),
            ],
            Self::Provider { status: 404, .. } => vec![
                "The agreement may not be signed yet, or the id is wrong".to_string(),
            ],
            Self::Transport(_) => vec![
                "Check network connectivity and [provider] base_url".to_string(),
                "Increase [provider] http_timeout_secs for slow links".to_string(),
            ],
            Self::Validation(_) => vec!["Provide a non-empty document with a filename".to_string()],
            _ => Vec::new(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Input,
            Self::MissingCorrelation => ErrorCategory::Session,
            Self::Misconfiguration(_) => ErrorCategory::Configuration,
            _ => ErrorCategory::Provider,
        }
    }
}

impl UserFriendlyError for SignflowError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.user_message(),
            Self::Sign(err) => err.user_message(),
            Self::Io { path, source } => {
                format!("Could not access {}: {source}", path.display())
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(err) => err.context(),
            Self::Sign(err) => err.context(),
            Self::Io { .. } => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(err) => err.suggestions(),
            Self::Sign(err) => err.suggestions(),
            Self::Io { .. } => vec!["Check that the path exists and is readable".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(err) => err.category(),
            Self::Sign(err) => err.category(),
            Self::Io { .. } => ErrorCategory::FileSystem,
        }
    }
}

impl SignflowError {
    /// Get a user-friendly error message with context and actionable suggestions
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error: {}\n", self.user_message()));

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {}\n", ctx));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {}\n", suggestion));
            }
        }

        redact_credentials(&output)
    }

    /// Map this error to the appropriate CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Io { .. } => ExitCode::INTERNAL,
            Self::Sign(err) => match err {
                SignError::MissingCorrelation => ExitCode::MISSING_CORRELATION,
                SignError::Validation(_) => ExitCode::INVALID_INPUT,
                SignError::RetryExhausted { .. } => ExitCode::RETRY_EXHAUSTED,
                SignError::Provider { .. }
                | SignError::Transport(_)
                | SignError::MalformedResponse(_)
                | SignError::NotReady { .. } => ExitCode::PROVIDER_FAILURE,
                SignError::Misconfiguration(_) => ExitCode::CLI_ARGS,
                SignError::Cancelled => ExitCode::INTERNAL,
            },
        }
    }
}
