use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{Instrument, debug};

use signflow_utils::logging::workflow_span;

use crate::{
    AgreementWorkflow, Config, Document, HttpSignProvider, InitiateOutcome, RetryPolicy,
    SignProvider, SignflowError,
};

#[derive(Debug, Serialize)]
struct InitiateJson<'a> {
    agreement_id: &'a str,
    signing_url: &'a str,
}

/// Read `file`, start an agreement and print the signing URL.
///
/// The CLI has no session to correlate, so it drives [`AgreementWorkflow`]
/// directly and prints the agreement id for a later `complete --agreement-id`.
pub async fn execute_initiate_command(config: &Config, file: &Path, json: bool) -> Result<()> {
    let bytes = std::fs::read(file).map_err(|source| SignflowError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!(file = %file.display(), bytes = bytes.len(), "Read document");

    let provider: Arc<dyn SignProvider> = Arc::new(HttpSignProvider::from_config(config)?);
    let retry = RetryPolicy::from_config(config).map_err(SignflowError::from)?;
    let signer_email = config.signer_email().map_err(SignflowError::from)?;
    let redirect_url = config.redirect_url().map_err(SignflowError::from)?;

    let initiated = AgreementWorkflow::new(provider, retry)
        .initiate(Document::new(name, bytes), signer_email, redirect_url)
        .instrument(workflow_span("initiate", "cli"))
        .await
        .map_err(SignflowError::from)?;
    let outcome = InitiateOutcome {
        agreement_id: initiated.agreement.id,
        redirect_to: initiated.signing_url,
    };

    println!("{}", render(&outcome, json)?);
    Ok(())
}

fn render(outcome: &InitiateOutcome, json: bool) -> Result<String> {
    if json {
        let payload = InitiateJson {
            agreement_id: outcome.agreement_id.as_str(),
            signing_url: outcome.redirect_to.as_str(),
        };
        return serde_json::to_string_pretty(&payload).context("Failed to emit initiate JSON");
    }

    Ok(format!(
        "✓ Agreement created: {id}\n  Signing URL: {url}\n\n  After signing, run: signflow complete --agreement-id {id}",
        id = outcome.agreement_id,
        url = outcome.redirect_to,
    ))
}
