//! Command-line interface for signflow
//!
//! - `args`: clap argument definitions
//! - `run`: entry point, configuration discovery and error reporting
//! - `commands`: one handler per subcommand

pub mod args;
mod commands;
mod run;

pub use args::{Cli, Commands};
pub use run::run;
