//! E-signature provider client
//!
//! The four provider operations (upload, create agreement, resolve signing
//! URL, fetch combined document) sit behind the [`SignProvider`] trait so the
//! workflow can run against the REST implementation or a scripted fake.
//! Each call issues exactly one request; retrying is the caller's business.

pub(crate) mod http_client;
mod rest_provider;
mod types;
mod wire;

pub use rest_provider::{HttpSignProvider, ProviderSettings};
pub use types::{
    Agreement, AgreementId, Document, SignProvider, SignedDocument, SigningUrl,
    TransientDocumentRef,
};
pub use signflow_utils::error::{ErrorKind, SignError};
