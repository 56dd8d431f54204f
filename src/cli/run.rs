//! CLI entry point and dispatch
//!
//! `run()` parses arguments, discovers configuration, creates the tokio
//! runtime, dispatches to a command handler and prints every error.

use clap::Parser;

use super::args::{Cli, Commands};
use super::commands;

use crate::{Config, ExitCode, SignflowError};
use signflow_utils::logging::init_tracing;
use signflow_utils::redaction::redact_error_message;

/// Main CLI execution function.
///
/// Handles ALL output including errors and returns the exit code to use on
/// failure. main.rs only calls `std::process::exit`.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let config = match Config::discover(&cli.config_overrides()) {
        Ok(config) => config,
        Err(err) => {
            let err = SignflowError::from(err);
            eprintln!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let result = rt.block_on(async {
        match cli.command {
            Commands::Initiate { file, json } => {
                commands::execute_initiate_command(&config, &file, json).await
            }
            Commands::Complete {
                agreement_id,
                output,
            } => commands::execute_complete_command(&config, agreement_id.as_deref(), &output).await,
            Commands::Config => commands::execute_config_command(&config),
        }
    });

    result.map_err(|error| report_error(&error))
}

/// Print an error for the user and pick the exit code.
fn report_error(error: &anyhow::Error) -> ExitCode {
    if let Some(err) = error.downcast_ref::<SignflowError>() {
        eprintln!("{}", err.display_for_user());
        return err.to_exit_code();
    }

    eprintln!(
        "✗ Unexpected error: {}",
        redact_error_message(&format!("{error:#}"))
    );
    eprintln!("\n  Run with --verbose for more detailed output");
    ExitCode::INTERNAL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SignError;

    #[test]
    fn test_report_error_uses_signflow_exit_codes() {
        let missing = anyhow::Error::from(SignflowError::from(SignError::MissingCorrelation));
        assert_eq!(report_error(&missing), ExitCode::MISSING_CORRELATION);

        let exhausted =
            anyhow::Error::from(SignflowError::from(SignError::RetryExhausted { attempts: 5 }));
        assert_eq!(report_error(&exhausted), ExitCode::RETRY_EXHAUSTED);
    }

    #[test]
    fn test_report_error_sees_through_context() {
        use anyhow::Context;

        let err: anyhow::Result<()> =
            Err(SignflowError::from(SignError::Validation("empty".to_string())))
                .context("while initiating");
        assert_eq!(report_error(&err.unwrap_err()), ExitCode::INVALID_INPUT);
    }

    #[test]
    fn test_report_error_unknown_is_internal() {
        assert_eq!(
            report_error(&anyhow::anyhow!("something else")),
            ExitCode::INTERNAL
        );
    }
}
