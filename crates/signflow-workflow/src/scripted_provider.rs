//! Scripted in-memory provider that counts calls

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use signflow_provider::{
    Agreement, AgreementId, Document, SignError, SignProvider, SignedDocument, SigningUrl,
    TransientDocumentRef,
};

pub(crate) const SIGNED_BYTES: &[u8] = b"%PDF-1.7 signed";

pub(crate) fn not_ready() -> SignError {
    SignError::NotReady {
        resource: "signing URL".to_string(),
    }
}

pub(crate) struct ScriptedProvider {
    upload: Result<TransientDocumentRef, SignError>,
    create: Result<AgreementId, SignError>,
    /// Consumed front to back; `NotReady` once empty
    resolve: Mutex<VecDeque<Result<SigningUrl, SignError>>>,
    fetch: Result<SignedDocument, SignError>,
    pub upload_calls: AtomicU32,
    pub create_calls: AtomicU32,
    pub resolve_calls: AtomicU32,
    pub fetch_calls: AtomicU32,
    pub last_signer: Mutex<Option<(String, String)>>,
}

impl ScriptedProvider {
    /// TD1 → AG1 → `https://sign/x` on the first resolve
    pub fn happy() -> Self {
        Self::not_ready_then(0, "https://sign/x")
    }

    /// `not_ready_count` not-ready answers, then `url`
    pub fn not_ready_then(not_ready_count: usize, url: &str) -> Self {
        let mut resolve: VecDeque<_> = (0..not_ready_count).map(|_| Err(not_ready())).collect();
        resolve.push_back(Ok(SigningUrl::new(url)));
        Self::with_resolve(resolve)
    }

    /// Never produces a signing URL
    pub fn never_ready() -> Self {
        Self::with_resolve(VecDeque::new())
    }

    fn with_resolve(resolve: VecDeque<Result<SigningUrl, SignError>>) -> Self {
        Self {
            upload: Ok(TransientDocumentRef::new("TD1")),
            create: Ok(AgreementId::new("AG1")),
            resolve: Mutex::new(resolve),
            fetch: Ok(SignedDocument::new(SIGNED_BYTES)),
            upload_calls: AtomicU32::new(0),
            create_calls: AtomicU32::new(0),
            resolve_calls: AtomicU32::new(0),
            fetch_calls: AtomicU32::new(0),
            last_signer: Mutex::new(None),
        }
    }

    pub fn failing_upload(mut self, err: SignError) -> Self {
        self.upload = Err(err);
        self
    }

    pub fn failing_create(mut self, err: SignError) -> Self {
        self.create = Err(err);
        self
    }

    pub fn failing_resolve_with(self, err: SignError) -> Self {
        *self.resolve.lock().unwrap() = VecDeque::from([Err(err)]);
        self
    }

    pub fn failing_fetch(mut self, err: SignError) -> Self {
        self.fetch = Err(err);
        self
    }

    pub fn calls(&self) -> (u32, u32, u32, u32) {
        (
            self.upload_calls.load(Ordering::SeqCst),
            self.create_calls.load(Ordering::SeqCst),
            self.resolve_calls.load(Ordering::SeqCst),
            self.fetch_calls.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl SignProvider for ScriptedProvider {
    async fn upload(&self, _document: Document) -> Result<TransientDocumentRef, SignError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.upload.clone()
    }

    async fn create_agreement(
        &self,
        document: &TransientDocumentRef,
        signer_email: &str,
        redirect_url: &str,
    ) -> Result<Agreement, SignError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(document.as_str(), "TD1", "agreement must use the fresh upload");
        *self.last_signer.lock().unwrap() = Some((signer_email.to_string(), redirect_url.to_string()));
        self.create.clone().map(|id| Agreement {
            id,
            signer_email: signer_email.to_string(),
            redirect_url: redirect_url.to_string(),
        })
    }

    async fn resolve_signing_url(
        &self,
        _agreement_id: &AgreementId,
    ) -> Result<SigningUrl, SignError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.resolve
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(not_ready()))
    }

    async fn fetch_combined_document(
        &self,
        _agreement_id: &AgreementId,
    ) -> Result<SignedDocument, SignError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetch.clone()
    }
}
