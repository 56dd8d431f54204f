//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::CliArgs;

/// signflow - e-signature agreement orchestrator
#[derive(Debug, Parser)]
#[command(name = "signflow")]
#[command(about = "Send a document for e-signature and retrieve the signed result")]
#[command(long_about = r#"
signflow uploads a document to the e-signature provider, creates a
single-signer agreement and prints the signing URL. Once the signer has
finished, `signflow complete` downloads the combined signed document.

EXAMPLES:
  # Start an agreement and print the signing URL
  signflow initiate contract.pdf

  # Same, as JSON
  signflow initiate contract.pdf --json

  # Download the signed document for an agreement
  signflow complete --agreement-id CBJCHBCAABAA... --output signed.pdf

  # Show the effective configuration and where each value came from
  signflow config

CONFIGURATION:
  Precedence: CLI flags > config file > defaults.
  The config file is $SIGNFLOW_HOME/config.toml, or .signflow/config.toml
  found by searching upward from the current directory.
  The bearer credential is read from $SIGNFLOW_API_KEY unless
  [provider] api_key_env names another variable.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Provider REST API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Email address of the signer
    #[arg(long, global = true)]
    pub signer_email: Option<String>,

    /// Where the provider sends the signer after signing
    #[arg(long, global = true)]
    pub redirect_url: Option<String>,

    /// Signing-URL resolution attempts before giving up
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Delay between signing-URL resolution attempts, in milliseconds
    #[arg(long, global = true)]
    pub retry_delay_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload a document, create an agreement and print the signing URL
    Initiate {
        /// Document to send for signature
        file: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download the combined signed document of an agreement
    Complete {
        /// Agreement id printed by `signflow initiate`
        #[arg(long)]
        agreement_id: Option<String>,

        /// Where to write the signed document
        #[arg(long, short, default_value = "signedDocument.pdf")]
        output: PathBuf,
    },

    /// Print the effective configuration with value sources
    Config,
}

impl Cli {
    /// Configuration overrides carried by the global flags
    #[must_use]
    pub fn config_overrides(&self) -> CliArgs {
        CliArgs {
            config_path: self.config.clone(),
            base_url: self.base_url.clone(),
            signer_email: self.signer_email.clone(),
            redirect_url: self.redirect_url.clone(),
            max_attempts: self.max_attempts,
            retry_delay_ms: self.retry_delay_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_initiate_parses_file_and_json() {
        let cli = Cli::try_parse_from(["signflow", "initiate", "contract.pdf", "--json"]).unwrap();
        match cli.command {
            Commands::Initiate { file, json } => {
                assert_eq!(file, PathBuf::from("contract.pdf"));
                assert!(json);
            }
            other => panic!("Expected Initiate, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_defaults_output_file() {
        let cli = Cli::try_parse_from(["signflow", "complete"]).unwrap();
        match cli.command {
            Commands::Complete {
                agreement_id,
                output,
            } => {
                assert_eq!(agreement_id, None);
                assert_eq!(output, PathBuf::from("signedDocument.pdf"));
            }
            other => panic!("Expected Complete, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "signflow",
            "config",
            "--base-url",
            "https://api.example.com/v6",
            "--max-attempts",
            "3",
            "--retry-delay-ms",
            "50",
        ])
        .unwrap();

        let overrides = cli.config_overrides();
        assert_eq!(
            overrides.base_url.as_deref(),
            Some("https://api.example.com/v6")
        );
        assert_eq!(overrides.max_attempts, Some(3));
        assert_eq!(overrides.retry_delay_ms, Some(50));
        assert_eq!(overrides.signer_email, None);
    }
}
