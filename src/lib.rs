//! signflow: e-signature agreement orchestration
//!
//! Uploads a document to an e-signature provider, creates a single-signer
//! agreement, resolves the signing URL (retrying while the provider is still
//! propagating it) and later retrieves the combined signed document.
//!
//! The stable API is re-exported here; the member crates hold the details:
//!
//! | Crate | Contents |
//! |-------|----------|
//! | `signflow-utils` | errors, exit codes, redaction, logging |
//! | `signflow-config` | configuration discovery and validation |
//! | `signflow-provider` | [`SignProvider`] and the REST client |
//! | `signflow-workflow` | [`RetryPolicy`], [`AgreementWorkflow`], [`SigningService`] |
//!
//! # Embedding
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use signflow::{Config, Document, InMemorySessionStore, SessionKey, SigningService};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::builder()
//!     .base_url("https://api.na1.adobesign.com/api/rest/v6")
//!     .signer_email("signer@example.com")
//!     .redirect_url("https://app.example.com/process-signed-document")
//!     .build()?;
//! let service = SigningService::from_config(&config, Arc::new(InMemorySessionStore::new()))?;
//!
//! let session = SessionKey::new("http-session-id");
//! let outcome = service
//!     .initiate(&session, Document::new("contract.pdf", std::fs::read("contract.pdf")?))
//!     .await?;
//! println!("redirect to {}", outcome.redirect_to);
//!
//! // later, after the signer was redirected back
//! let signed = service.complete(&session).await?;
//! std::fs::write("signedDocument.pdf", &signed.body)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;

pub use signflow_config::{CliArgs, Config, ConfigBuilder, ConfigSource};
pub use signflow_provider::{
    Agreement, AgreementId, Document, HttpSignProvider, ProviderSettings, SignProvider,
    SignedDocument, SigningUrl, TransientDocumentRef,
};
pub use signflow_utils::error::{
    ConfigError, ErrorCategory, ErrorKind, SignError, SignflowError, UserFriendlyError,
};
pub use signflow_utils::exit_codes::ExitCode;
pub use signflow_workflow::{
    AgreementWorkflow, InMemorySessionStore, InitiateOutcome, Initiated, RetryDecision,
    RetryPolicy, SessionCorrelationStore, SessionKey, SignedDocumentResponse, SigningService,
    WorkflowState,
};
