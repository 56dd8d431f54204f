//! Redaction of credentials from error text
//!
//! Provider error bodies and transport messages end up in `SignError` values,
//! log lines and CLI output. Everything that crosses those surfaces goes
//! through [`redact_error_message`] first.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern to match URLs with embedded credentials
static URL_WITH_CREDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(https?://)[^:@\s]+:[^@\s]+@").expect("valid regex"));

/// Pattern to match `Bearer <token>` fragments echoed back by servers or proxies
static BEARER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(bearer\s+)[A-Za-z0-9._~+/=-]+").expect("valid regex"));

/// Pattern to match potential API keys (long alphanumeric strings)
///
/// Matches runs of 32+ characters that are alphanumeric, underscore, or dash.
/// Leftmost-first matching starts every match at the beginning of a run, so
/// no boundary characters are consumed.
static POTENTIAL_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9_-]{32,}").expect("valid regex"));

/// Maximum number of characters of a provider body kept in an error
pub const MAX_BODY_CHARS: usize = 2048;

/// Redact credentials that travel in a recognisable shape
///
/// URLs with embedded credentials keep scheme and host only; `Bearer` tokens
/// are replaced. Everything else, including provider resource ids, is kept.
pub fn redact_credentials(message: &str) -> String {
    let redacted = URL_WITH_CREDS.replace_all(message, "$1[REDACTED]@");
    BEARER_TOKEN.replace_all(&redacted, "$1[REDACTED]").into_owned()
}

/// Redact sensitive information from free-form error messages
///
/// Applies [`redact_credentials`] and also replaces long key-like strings.
/// Used for transport and unexpected errors whose text is not a provider body.
pub fn redact_error_message(message: &str) -> String {
    let redacted = redact_credentials(message);
    POTENTIAL_KEY
        .replace_all(&redacted, "[REDACTED_KEY]")
        .into_owned()
}

/// Redact and truncate a provider response body for inclusion in an error.
///
/// Provider bodies name agreement and document ids that look like keys, so
/// only [`redact_credentials`] applies.
pub fn sanitize_body(body: &str) -> String {
    let redacted = redact_credentials(body.trim());
    if redacted.chars().count() <= MAX_BODY_CHARS {
        return redacted;
    }
    let mut truncated: String = redacted.chars().take(MAX_BODY_CHARS).collect();
    truncated.push_str("...[truncated]");
    truncated
}
