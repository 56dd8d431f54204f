//! Exit code constants for the signflow CLI.
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `MISSING_CORRELATION` | No agreement id for completion |
//! | 4 | `INVALID_INPUT` | Document or signer settings rejected |
//! | 70 | `PROVIDER_FAILURE` | Provider call failed |
//! | 75 | `RETRY_EXHAUSTED` | Signing URL never became available |

/// Exit codes matching the documented exit code table.
///
/// # Example
///
/// ```rust
/// use signflow_utils::ExitCode;
///
/// let code = ExitCode::MISSING_CORRELATION;
/// assert_eq!(code.as_i32(), 3);
/// assert_eq!(ExitCode::SUCCESS, ExitCode::from_i32(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid or missing arguments or configuration
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Completion was requested without an agreement id
    pub const MISSING_CORRELATION: ExitCode = ExitCode(3);

    /// Input document or signer settings were rejected before any provider call
    pub const INVALID_INPUT: ExitCode = ExitCode(4);

    /// Provider returned an error status or could not be reached
    pub const PROVIDER_FAILURE: ExitCode = ExitCode(70);

    /// Signing URL stayed unavailable for every retry attempt
    pub const RETRY_EXHAUSTED: ExitCode = ExitCode(75);

    /// Get the numeric exit code value.
    ///
    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    ///
    /// Prefer using the named constants when possible.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}
