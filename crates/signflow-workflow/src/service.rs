//! Boundary facade for a host's initiate and complete operations

use std::sync::Arc;
use tracing::Instrument;

use signflow_config::Config;
use signflow_provider::{AgreementId, Document, HttpSignProvider, SignProvider, SigningUrl};
use signflow_utils::error::{SignError, SignflowError};
use signflow_utils::logging::workflow_span;

use crate::retry::RetryPolicy;
use crate::session::{SessionCorrelationStore, SessionKey};
use crate::workflow::AgreementWorkflow;

/// Filename offered to the browser for the signed document
pub const SIGNED_DOCUMENT_FILENAME: &str = "signedDocument.pdf";

pub const SIGNED_DOCUMENT_CONTENT_TYPE: &str = "application/pdf";

/// Forces clients and proxies to revalidate the signed document
pub const CACHE_CONTROL: &str = "must-revalidate, post-check=0, pre-check=0";

/// What the host does after a successful initiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiateOutcome {
    /// Already stored in the session store; returned for hosts that log it
    pub agreement_id: AgreementId,
    /// Redirect the signer here
    pub redirect_to: SigningUrl,
}

/// Signed document ready to send as a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedDocumentResponse {
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub content_disposition: String,
    pub cache_control: &'static str,
}

impl SignedDocumentResponse {
    fn attachment(body: Vec<u8>) -> Self {
        Self {
            body,
            content_type: SIGNED_DOCUMENT_CONTENT_TYPE,
            content_disposition: format!("attachment; filename=\"{SIGNED_DOCUMENT_FILENAME}\""),
            cache_control: CACHE_CONTROL,
        }
    }

    /// Response headers as name/value pairs
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", self.content_type.to_string()),
            ("Content-Disposition", self.content_disposition.clone()),
            ("Cache-Control", self.cache_control.to_string()),
        ]
    }
}

/// Composition root: provider, retry policy, signer settings and session store.
///
/// Hosts map errors with [`SignError::boundary_status`]: a missing
/// correlation is a bad request, everything else a server error.
#[derive(Clone)]
pub struct SigningService {
    provider: Arc<dyn SignProvider>,
    retry: RetryPolicy,
    signer_email: String,
    redirect_url: String,
    sessions: Arc<dyn SessionCorrelationStore>,
}

impl SigningService {
    #[must_use]
    pub fn new(
        provider: Arc<dyn SignProvider>,
        retry: RetryPolicy,
        signer_email: impl Into<String>,
        redirect_url: impl Into<String>,
        sessions: Arc<dyn SessionCorrelationStore>,
    ) -> Self {
        Self {
            provider,
            retry,
            signer_email: signer_email.into(),
            redirect_url: redirect_url.into(),
            sessions,
        }
    }

    /// Build the service against the REST provider described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `SignflowError::Config` for missing settings or credential and
    /// `SignflowError::Sign` if the provider client cannot be built.
    pub fn from_config(
        config: &Config,
        sessions: Arc<dyn SessionCorrelationStore>,
    ) -> Result<Self, SignflowError> {
        let signer_email = config.signer_email()?.to_string();
        let redirect_url = config.redirect_url()?.to_string();
        let retry = RetryPolicy::from_config(config)?;
        let provider: Arc<dyn SignProvider> = Arc::new(HttpSignProvider::from_config(config)?);
        Ok(Self::new(
            provider,
            retry,
            signer_email,
            redirect_url,
            sessions,
        ))
    }

    #[must_use]
    pub fn sessions(&self) -> &Arc<dyn SessionCorrelationStore> {
        &self.sessions
    }

    /// Start signing `document` and remember the agreement under `session`.
    ///
    /// # Errors
    ///
    /// Any [`SignError`] from the workflow, unchanged.
    pub async fn initiate(
        &self,
        session: &SessionKey,
        document: Document,
    ) -> Result<InitiateOutcome, SignError> {
        let span = workflow_span("initiate", session.as_str());
        async {
            let mut workflow = AgreementWorkflow::new(Arc::clone(&self.provider), self.retry);
            let initiated = workflow
                .initiate_correlated(
                    document,
                    &self.signer_email,
                    &self.redirect_url,
                    self.sessions.as_ref(),
                    session,
                )
                .await?;
            Ok::<_, SignError>(InitiateOutcome {
                agreement_id: initiated.agreement.id,
                redirect_to: initiated.signing_url,
            })
        }
        .instrument(span)
        .await
    }

    /// Fetch the signed document for the agreement stored under `session`.
    ///
    /// # Errors
    ///
    /// `SignError::MissingCorrelation` without a stored agreement id; any
    /// provider error otherwise.
    pub async fn complete(&self, session: &SessionKey) -> Result<SignedDocumentResponse, SignError> {
        let span = workflow_span("complete", session.as_str());
        let agreement_id = self.sessions.get(session);
        self.complete_with(agreement_id).instrument(span).await
    }

    /// Fetch the signed document for an agreement id the host read itself.
    ///
    /// # Errors
    ///
    /// See [`SigningService::complete`].
    pub async fn complete_with(
        &self,
        agreement_id: Option<AgreementId>,
    ) -> Result<SignedDocumentResponse, SignError> {
        let mut workflow = AgreementWorkflow::new(Arc::clone(&self.provider), self.retry);
        let document = workflow.complete(agreement_id.as_ref()).await?;
        Ok(SignedDocumentResponse::attachment(document.into_bytes()))
    }
}
