//! Domain values exchanged with the e-signature provider

use async_trait::async_trait;
use std::fmt;

use signflow_utils::error::SignError;

/// A document to be signed.
///
/// Immutable once built; handed to [`SignProvider::upload`] by value and
/// consumed there.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    bytes: Vec<u8>,
}

impl Document {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type sent with the uploaded file part
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        let is_pdf = std::path::Path::new(&self.name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            "application/pdf"
        } else {
            "application/octet-stream"
        }
    }

    /// Reject documents the provider would refuse anyway.
    ///
    /// # Errors
    ///
    /// Returns `SignError::Validation` for an empty body or a blank name.
    pub fn validate(&self) -> Result<(), SignError> {
        if self.bytes.is_empty() {
            return Err(SignError::Validation(format!(
                "document '{}' is empty",
                self.name
            )));
        }
        if self.name.trim().is_empty() {
            return Err(SignError::Validation(
                "document name must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (String, Vec<u8>) {
        (self.name, self.bytes)
    }
}

// Bytes are elided so a document never floods the logs.
impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Short-lived provider reference to an uploaded document; used once
    TransientDocumentRef
);

string_id!(
    /// Provider-assigned agreement identifier
    AgreementId
);

string_id!(
    /// Link the signer visits to sign
    SigningUrl
);

/// Agreement created for a single signer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agreement {
    pub id: AgreementId,
    pub signer_email: String,
    pub redirect_url: String,
}

/// Combined signed document exactly as the provider returned it
#[derive(Clone, PartialEq, Eq)]
pub struct SignedDocument(Vec<u8>);

impl SignedDocument {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SignedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SignedDocument").field(&self.0.len()).finish()
    }
}

/// The four provider operations.
///
/// Implementations make exactly one provider call per method invocation and
/// classify every failure as a [`SignError`]. A missing signing URL is
/// `SignError::NotReady`; everything else non-2xx is `SignError::Provider`.
#[async_trait]
pub trait SignProvider: Send + Sync {
    /// Upload document bytes and obtain a transient reference
    async fn upload(&self, document: Document) -> Result<TransientDocumentRef, SignError>;

    /// Create a single-signer agreement for an uploaded document
    async fn create_agreement(
        &self,
        document: &TransientDocumentRef,
        signer_email: &str,
        redirect_url: &str,
    ) -> Result<Agreement, SignError>;

    /// Resolve the first signer's signing URL
    async fn resolve_signing_url(&self, agreement_id: &AgreementId)
    -> Result<SigningUrl, SignError>;

    /// Fetch the combined signed document
    async fn fetch_combined_document(
        &self,
        agreement_id: &AgreementId,
    ) -> Result<SignedDocument, SignError>;
}
