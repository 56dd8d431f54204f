//! Agreement lifecycle orchestration
//!
//! [`AgreementWorkflow`] runs upload, agreement creation and signing-URL
//! resolution in order, retrying only the last step and only while the
//! provider reports the URL as not ready ([`RetryPolicy`]). Completion fetches
//! the combined document for an agreement id handed over through a
//! [`SessionCorrelationStore`]. [`SigningService`] wires these together for a
//! host's two boundary operations.

mod retry;
mod service;
mod session;
mod workflow;

#[cfg(test)]
mod scripted_provider;

pub use retry::{RetryDecision, RetryPolicy};
pub use service::{
    CACHE_CONTROL, InitiateOutcome, SIGNED_DOCUMENT_CONTENT_TYPE, SIGNED_DOCUMENT_FILENAME,
    SignedDocumentResponse, SigningService,
};
pub use session::{InMemorySessionStore, SessionCorrelationStore, SessionKey};
pub use workflow::{AgreementWorkflow, Initiated, WorkflowState};
