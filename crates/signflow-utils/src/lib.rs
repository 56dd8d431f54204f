//! Foundation utilities shared by the signflow crates.

pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod redaction;
pub mod types;

pub use error::{ConfigError, ErrorKind, SignError, SignflowError, UserFriendlyError};
pub use exit_codes::ExitCode;
