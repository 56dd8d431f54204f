use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{Instrument, debug};

use signflow_utils::logging::workflow_span;

use crate::{
    AgreementId, AgreementWorkflow, Config, HttpSignProvider, RetryPolicy, SignError,
    SignProvider, SignflowError,
};

/// Download the combined signed document of `agreement_id` into `output`.
///
/// Without an agreement id this fails with `MissingCorrelation` before the
/// provider client is even built. Signer settings are not needed here.
pub async fn execute_complete_command(
    config: &Config,
    agreement_id: Option<&str>,
    output: &Path,
) -> Result<()> {
    let Some(agreement_id) = agreement_id.map(str::trim).filter(|id| !id.is_empty()) else {
        return Err(SignflowError::from(SignError::MissingCorrelation).into());
    };

    debug!(agreement_id, output = %output.display(), "Completing agreement");
    let provider: Arc<dyn SignProvider> = Arc::new(HttpSignProvider::from_config(config)?);
    let retry = RetryPolicy::from_config(config).map_err(SignflowError::from)?;
    let document = AgreementWorkflow::new(provider, retry)
        .complete(Some(&AgreementId::new(agreement_id)))
        .instrument(workflow_span("complete", "cli"))
        .await
        .map_err(SignflowError::from)?;

    std::fs::write(output, document.as_bytes()).map_err(|source| SignflowError::Io {
        path: output.to_path_buf(),
        source,
    })?;

    println!(
        "✓ Signed document written to {} ({} bytes)",
        output.display(),
        document.len()
    );
    Ok(())
}
