//! REST implementation of [`SignProvider`]
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | upload | `POST transientDocuments` (multipart) |
//! | create agreement | `POST agreements` (JSON) |
//! | resolve signing URL | `GET agreements/{id}/signingUrls` |
//! | fetch combined document | `GET agreements/{id}/combinedDocument` |
//!
//! All requests carry the bearer credential.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

use signflow_config::Config;
use signflow_config::config::{
    DEFAULT_AGREEMENT_NAME, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_LOCALE, DEFAULT_REDIRECT_DELAY_SECS,
};
use signflow_utils::error::{ConfigError, SignError, SignflowError};

use crate::http_client::{HttpClient, error_for_status, read_body};
use crate::types::{
    Agreement, AgreementId, Document, SignProvider, SignedDocument, SigningUrl,
    TransientDocumentRef,
};
use crate::wire::{
    AgreementCreationRequest, AgreementCreationResponse, FILE_FIELD, FILE_NAME_FIELD,
    SigningUrlResponse, TransientDocumentResponse,
};

const OP_UPLOAD: &str = "upload";
const OP_CREATE_AGREEMENT: &str = "create_agreement";
const OP_SIGNING_URL: &str = "resolve_signing_url";
const OP_COMBINED_DOCUMENT: &str = "fetch_combined_document";

/// Everything needed to construct an [`HttpSignProvider`]
#[derive(Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: String,
    pub http_timeout: Duration,
    pub connect_timeout: Duration,
    pub agreement_name: String,
    pub locale: String,
    pub redirect_delay_secs: u32,
}

impl ProviderSettings {
    /// Settings with default timeouts and agreement options
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            agreement_name: DEFAULT_AGREEMENT_NAME.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            redirect_delay_secs: DEFAULT_REDIRECT_DELAY_SECS,
        }
    }

    /// Read settings from configuration, resolving the credential from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` if the base URL or the
    /// credential variable is missing.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: config.base_url()?.to_string(),
            api_key: config.api_key()?,
            http_timeout: config.http_timeout(),
            connect_timeout: config.connect_timeout(),
            agreement_name: config.agreement_name().to_string(),
            locale: config.locale().to_string(),
            redirect_delay_secs: config.redirect_delay_secs(),
        })
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("http_timeout", &self.http_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("agreement_name", &self.agreement_name)
            .field("locale", &self.locale)
            .field("redirect_delay_secs", &self.redirect_delay_secs)
            .finish()
    }
}

/// E-signature provider reached over its REST API
#[derive(Clone)]
pub struct HttpSignProvider {
    client: HttpClient,
    base_url: Url,
    api_key: String,
    agreement_name: String,
    locale: String,
    redirect_delay_secs: u32,
}

impl HttpSignProvider {
    /// Create a provider from explicit settings
    ///
    /// # Errors
    ///
    /// Returns `SignError::Misconfiguration` if the base URL cannot carry
    /// path segments, the credential is blank, or the HTTP client cannot be
    /// built.
    pub fn new(settings: ProviderSettings) -> Result<Self, SignError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            SignError::Misconfiguration(format!("invalid base URL '{}': {e}", settings.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SignError::Misconfiguration(format!(
                "base URL '{}' cannot carry a path",
                settings.base_url
            )));
        }
        if settings.api_key.trim().is_empty() {
            return Err(SignError::Misconfiguration(
                "bearer credential is empty".to_string(),
            ));
        }

        let client = HttpClient::new(settings.http_timeout, settings.connect_timeout)?;

        Ok(Self {
            client,
            base_url,
            api_key: settings.api_key,
            agreement_name: settings.agreement_name,
            locale: settings.locale,
            redirect_delay_secs: settings.redirect_delay_secs,
        })
    }

    /// Create a provider from configuration
    ///
    /// # Errors
    ///
    /// Returns `SignflowError::Config` for missing settings or credential and
    /// `SignflowError::Sign` if the client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, SignflowError> {
        let settings = ProviderSettings::from_config(config)?;
        Ok(Self::new(settings)?)
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SignError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                SignError::Misconfiguration(format!(
                    "base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn not_ready(agreement_id: &AgreementId) -> SignError {
        SignError::NotReady {
            resource: format!("signing URL for agreement {agreement_id}"),
        }
    }
}

impl fmt::Debug for HttpSignProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSignProvider")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SignProvider for HttpSignProvider {
    async fn upload(&self, document: Document) -> Result<TransientDocumentRef, SignError> {
        document.validate()?;

        let content_type = document.content_type();
        let (name, bytes) = document.into_parts();
        let size = bytes.len();

        let file_part = Part::bytes(bytes)
            .file_name(name.clone())
            .mime_str(content_type)
            .map_err(|e| SignError::Validation(format!("invalid content type: {e}")))?;
        let form = Form::new()
            .text(FILE_NAME_FIELD, name.clone())
            .part(FILE_FIELD, file_part);

        debug!(provider_op = OP_UPLOAD, file_name = %name, size, "Uploading document");

        let request = self
            .client
            .post(self.endpoint(&["transientDocuments"])?)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .multipart(form);

        let response = error_for_status(self.client.execute(request, OP_UPLOAD).await?).await?;
        let body = read_body(response, OP_UPLOAD).await?;
        let parsed: TransientDocumentResponse = serde_json::from_slice(&body).map_err(|e| {
            SignError::MalformedResponse(format!("upload response is not valid JSON: {e}"))
        })?;

        parsed
            .transient_document_id
            .filter(|id| !id.trim().is_empty())
            .map(TransientDocumentRef::new)
            .ok_or_else(|| {
                SignError::MalformedResponse(
                    "upload response has no transientDocumentId".to_string(),
                )
            })
    }

    async fn create_agreement(
        &self,
        document: &TransientDocumentRef,
        signer_email: &str,
        redirect_url: &str,
    ) -> Result<Agreement, SignError> {
        let payload = AgreementCreationRequest::single_signer(
            document.as_str(),
            &self.agreement_name,
            &self.locale,
            signer_email,
            redirect_url,
            self.redirect_delay_secs,
        );

        debug!(provider_op = OP_CREATE_AGREEMENT, "Creating agreement");

        let request = self
            .client
            .post(self.endpoint(&["agreements"])?)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .json(&payload);

        let response =
            error_for_status(self.client.execute(request, OP_CREATE_AGREEMENT).await?).await?;
        let body = read_body(response, OP_CREATE_AGREEMENT).await?;
        let parsed: AgreementCreationResponse = serde_json::from_slice(&body).map_err(|e| {
            SignError::MalformedResponse(format!("agreement response is not valid JSON: {e}"))
        })?;

        let id = parsed
            .id
            .filter(|id| !id.trim().is_empty())
            .map(AgreementId::new)
            .ok_or_else(|| {
                SignError::MalformedResponse("agreement response has no id".to_string())
            })?;

        debug!(provider_op = OP_CREATE_AGREEMENT, agreement_id = %id, "Agreement created");

        Ok(Agreement {
            id,
            signer_email: signer_email.to_string(),
            redirect_url: redirect_url.to_string(),
        })
    }

    async fn resolve_signing_url(
        &self,
        agreement_id: &AgreementId,
    ) -> Result<SigningUrl, SignError> {
        let request = self
            .client
            .get(self.endpoint(&["agreements", agreement_id.as_str(), "signingUrls"])?)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json");

        let response = self.client.execute(request, OP_SIGNING_URL).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(provider_op = OP_SIGNING_URL, agreement_id = %agreement_id, "Signing URL not found yet");
            return Err(Self::not_ready(agreement_id));
        }

        let response = error_for_status(response).await?;
        let body = read_body(response, OP_SIGNING_URL).await?;

        // An unexpected shape is treated like an absent URL.
        let parsed: SigningUrlResponse = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(
                    provider_op = OP_SIGNING_URL,
                    agreement_id = %agreement_id,
                    error = %e,
                    "Unparseable signing URL response"
                );
                return Err(Self::not_ready(agreement_id));
            }
        };

        parsed
            .first_esign_url()
            .map(SigningUrl::new)
            .ok_or_else(|| Self::not_ready(agreement_id))
    }

    async fn fetch_combined_document(
        &self,
        agreement_id: &AgreementId,
    ) -> Result<SignedDocument, SignError> {
        let request = self
            .client
            .get(self.endpoint(&["agreements", agreement_id.as_str(), "combinedDocument"])?)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/pdf");

        let response =
            error_for_status(self.client.execute(request, OP_COMBINED_DOCUMENT).await?).await?;
        let bytes = read_body(response, OP_COMBINED_DOCUMENT).await?;

        debug!(
            provider_op = OP_COMBINED_DOCUMENT,
            agreement_id = %agreement_id,
            size = bytes.len(),
            "Combined document retrieved"
        );

        Ok(SignedDocument::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base_url: &str) -> HttpSignProvider {
        HttpSignProvider::new(ProviderSettings::new(base_url, "test-key")).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let provider = provider("https://api.example.com/api/rest/v6");
        let url = provider.endpoint(&["agreements", "AG1", "signingUrls"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/rest/v6/agreements/AG1/signingUrls"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let provider = provider("https://api.example.com/api/rest/v6/");
        let url = provider.endpoint(&["transientDocuments"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/rest/v6/transientDocuments"
        );
    }

    #[test]
    fn test_endpoint_encodes_agreement_id_as_one_segment() {
        let provider = provider("https://api.example.com/v6");
        let url = provider
            .endpoint(&["agreements", "a/b c", "combinedDocument"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v6/agreements/a%2Fb%20c/combinedDocument"
        );
    }

    #[test]
    fn test_new_rejects_unusable_settings() {
        assert!(matches!(
            HttpSignProvider::new(ProviderSettings::new("not a url", "k")),
            Err(SignError::Misconfiguration(_))
        ));
        assert!(matches!(
            HttpSignProvider::new(ProviderSettings::new("mailto:x@y.z", "k")),
            Err(SignError::Misconfiguration(_))
        ));
        assert!(matches!(
            HttpSignProvider::new(ProviderSettings::new("https://api.example.com", "  ")),
            Err(SignError::Misconfiguration(_))
        ));
    }

    #[test]
    fn test_debug_never_prints_credential() {
        let settings = ProviderSettings::new("https://api.example.com", "super-secret-key");
        assert!(!format!("{settings:?}").contains("super-secret-key"));
        let provider = HttpSignProvider::new(settings).unwrap();
        assert!(!format!("{provider:?}").contains("super-secret-key"));
    }

    #[test]
    fn test_settings_from_config_requires_credential() {
        let mut config = Config::minimal_for_testing();
        config.provider.api_key_env = Some("SIGNFLOW_TEST_UNSET_KEY_VAR".to_string());

        match ProviderSettings::from_config(&config) {
            Err(ConfigError::MissingRequired(key)) => {
                assert_eq!(key, "env:SIGNFLOW_TEST_UNSET_KEY_VAR");
            }
            other => panic!("Expected MissingRequired, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_document_is_rejected_without_request() {
        // Port 9 (discard) is never contacted: validation fails first.
        let provider = provider("http://127.0.0.1:9");
        let err = provider
            .upload(Document::new("contract.pdf", Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, SignError::Validation(_)));
    }
}
