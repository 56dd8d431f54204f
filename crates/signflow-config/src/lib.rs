//! Configuration management for signflow
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > file > defaults. See [`Config`] for the file format.

pub mod config;

pub use config::{
    AgreementConfig, CliArgs, Config, ConfigBuilder, ConfigSource, ProviderConfig, RetryConfig,
};
pub use signflow_utils::error::ConfigError;
