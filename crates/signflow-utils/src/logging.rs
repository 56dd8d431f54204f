//! Logging infrastructure for signflow
//!
//! Structured logging through `tracing`. The CLI calls [`init_tracing`] once;
//! library code only emits events and spans.

use tracing::{Level, span};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the built-in filter. Verbose mode adds
/// targets and span-close events (with their durations) to the output.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("signflow=debug,info")
            } else {
                EnvFilter::try_new("signflow=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Span wrapping one initiate or complete invocation.
///
/// `session` is the opaque caller-session key; it is safe to log because it
/// carries no credential.
pub fn workflow_span(phase: &str, session: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "agreement_workflow",
        phase = %phase,
        session = %session,
    )
}
