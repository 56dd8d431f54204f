//! Agreement lifecycle state machine
//!
//! ```text
//! Created → DocumentUploaded → AgreementCreated → SigningUrlReady
//! Created → SignedDocumentRetrieved
//! any step → Failed(kind)
//! ```
//!
//! Initiation runs upload, agreement creation and signing-URL resolution in
//! that order. Only resolution is retried, and only on `NotReady`. Completion
//! is a separate, later run keyed by the agreement id from initiation.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use signflow_provider::{Agreement, AgreementId, Document, SignProvider, SignedDocument, SigningUrl};
use signflow_utils::error::{ErrorKind, SignError};

use crate::retry::RetryPolicy;
use crate::session::{SessionCorrelationStore, SessionKey};

/// Where a workflow run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Created,
    DocumentUploaded,
    AgreementCreated,
    /// Initiation finished
    SigningUrlReady,
    /// Completion finished
    SignedDocumentRetrieved,
    Failed(ErrorKind),
}

impl WorkflowState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::SigningUrlReady | Self::SignedDocumentRetrieved | Self::Failed(_)
        )
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::DocumentUploaded => f.write_str("document_uploaded"),
            Self::AgreementCreated => f.write_str("agreement_created"),
            Self::SigningUrlReady => f.write_str("signing_url_ready"),
            Self::SignedDocumentRetrieved => f.write_str("signed_document_retrieved"),
            Self::Failed(kind) => write!(f, "failed({kind})"),
        }
    }
}

/// Result of a successful initiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initiated {
    pub agreement: Agreement,
    pub signing_url: SigningUrl,
}

impl Initiated {
    #[must_use]
    pub fn agreement_id(&self) -> &AgreementId {
        &self.agreement.id
    }
}

/// One run of the agreement lifecycle.
///
/// Each `initiate` or `complete` call starts from [`WorkflowState::Created`];
/// [`AgreementWorkflow::state`] reports where the last call ended.
pub struct AgreementWorkflow {
    provider: Arc<dyn SignProvider>,
    retry: RetryPolicy,
    state: WorkflowState,
}

impl AgreementWorkflow {
    #[must_use]
    pub fn new(provider: Arc<dyn SignProvider>, retry: RetryPolicy) -> Self {
        Self {
            provider,
            retry,
            state: WorkflowState::Created,
        }
    }

    #[must_use]
    pub const fn state(&self) -> WorkflowState {
        self.state
    }

    fn transition(&mut self, to: WorkflowState) {
        debug!(from = %self.state, to = %to, "Workflow state transition");
        self.state = to;
    }

    fn fail(&mut self, err: SignError) -> SignError {
        self.transition(WorkflowState::Failed(err.kind()));
        err
    }

    /// Upload `document`, create a single-signer agreement and resolve its
    /// signing URL.
    ///
    /// # Errors
    ///
    /// - `SignError::Validation` for an empty document or unusable signer
    ///   settings; no provider call is made
    /// - `SignError::RetryExhausted` if the signing URL never became available
    /// - any other provider error, unchanged
    pub async fn initiate(
        &mut self,
        document: Document,
        signer_email: &str,
        redirect_url: &str,
    ) -> Result<Initiated, SignError> {
        self.run_initiation(document, signer_email, redirect_url, None)
            .await
    }

    /// Like [`AgreementWorkflow::initiate`], storing the agreement id under
    /// `session` as soon as the agreement exists.
    ///
    /// The id is stored before signing-URL resolution, so completion stays
    /// possible even when resolution fails afterwards.
    ///
    /// # Errors
    ///
    /// See [`AgreementWorkflow::initiate`].
    pub async fn initiate_correlated(
        &mut self,
        document: Document,
        signer_email: &str,
        redirect_url: &str,
        store: &dyn SessionCorrelationStore,
        session: &SessionKey,
    ) -> Result<Initiated, SignError> {
        self.run_initiation(document, signer_email, redirect_url, Some((store, session)))
            .await
    }

    async fn run_initiation(
        &mut self,
        document: Document,
        signer_email: &str,
        redirect_url: &str,
        correlation: Option<(&dyn SessionCorrelationStore, &SessionKey)>,
    ) -> Result<Initiated, SignError> {
        self.state = WorkflowState::Created;

        if let Err(err) = document
            .validate()
            .and_then(|()| validate_signer(signer_email, redirect_url))
        {
            return Err(self.fail(err));
        }

        info!(document = %document.name(), size = document.bytes().len(), "Initiating agreement");

        let reference = match self.provider.upload(document).await {
            Ok(reference) => reference,
            Err(err) => return Err(self.fail(err)),
        };
        self.transition(WorkflowState::DocumentUploaded);

        let agreement = match self
            .provider
            .create_agreement(&reference, signer_email, redirect_url)
            .await
        {
            Ok(agreement) => agreement,
            Err(err) => return Err(self.fail(err)),
        };
        self.transition(WorkflowState::AgreementCreated);

        if let Some((store, session)) = correlation {
            store.put(session, &agreement.id);
            debug!(agreement_id = %agreement.id, "Agreement id stored for session");
        }

        let provider = &self.provider;
        let agreement_id = &agreement.id;
        let resolved = self
            .retry
            .run("resolve_signing_url", || {
                provider.resolve_signing_url(agreement_id)
            })
            .await;
        let signing_url = match resolved {
            Ok(url) => url,
            Err(err) => return Err(self.fail(err)),
        };
        self.transition(WorkflowState::SigningUrlReady);

        info!(agreement_id = %agreement.id, "Signing URL ready");

        Ok(Initiated {
            agreement,
            signing_url,
        })
    }

    /// Fetch the combined signed document for an agreement from an earlier
    /// initiation.
    ///
    /// # Errors
    ///
    /// - `SignError::MissingCorrelation` if `agreement_id` is absent or blank;
    ///   no provider call is made
    /// - any provider error, unchanged (never retried)
    pub async fn complete(
        &mut self,
        agreement_id: Option<&AgreementId>,
    ) -> Result<SignedDocument, SignError> {
        self.state = WorkflowState::Created;

        let Some(agreement_id) = agreement_id.filter(|id| !id.as_str().trim().is_empty()) else {
            return Err(self.fail(SignError::MissingCorrelation));
        };

        info!(agreement_id = %agreement_id, "Retrieving signed document");

        match self.provider.fetch_combined_document(agreement_id).await {
            Ok(document) => {
                self.transition(WorkflowState::SignedDocumentRetrieved);
                Ok(document)
            }
            Err(err) => Err(self.fail(err)),
        }
    }
}

fn validate_signer(signer_email: &str, redirect_url: &str) -> Result<(), SignError> {
    if !signer_email.contains('@') || signer_email.trim().len() != signer_email.len() {
        return Err(SignError::Validation(format!(
            "signer email '{signer_email}' is not an email address"
        )));
    }
    if redirect_url.trim().is_empty() {
        return Err(SignError::Validation(
            "redirect URL must not be empty".to_string(),
        ));
    }
    Ok(())
}
