use std::path::PathBuf;

/// Overrides supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub signer_email: Option<String>,
    pub redirect_url: Option<String>,
    pub max_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}
