//! `HttpSignProvider` against a mock provider API

use serde_json::json;
use signflow_provider::{
    AgreementId, Document, HttpSignProvider, ProviderSettings, SignError, SignProvider,
    TransientDocumentRef,
};
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_PREFIX: &str = "/api/rest/v6";
const API_KEY: &str = "test-key";

fn provider_for(server: &MockServer) -> HttpSignProvider {
    let base_url = format!("{}{API_PREFIX}", server.uri());
    HttpSignProvider::new(ProviderSettings::new(base_url, API_KEY)).unwrap()
}

fn api(path_suffix: &str) -> String {
    format!("{API_PREFIX}{path_suffix}")
}

#[tokio::test]
async fn test_upload_sends_multipart_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("/transientDocuments")))
        .and(header("authorization", "Bearer test-key"))
        .and(header("accept", "application/json"))
        .and(body_string_contains("name=\"File-Name\""))
        .and(body_string_contains("name=\"File\"; filename=\"contract.pdf\""))
        .and(body_string_contains("application/pdf"))
        .and(body_string_contains("%PDF-1.4 test"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"transientDocumentId": "TD1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reference = provider_for(&server)
        .upload(Document::new("contract.pdf", b"%PDF-1.4 test".to_vec()))
        .await
        .unwrap();

    assert_eq!(reference, TransientDocumentRef::new("TD1"));
}

#[tokio::test]
async fn test_upload_empty_document_issues_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .upload(Document::new("contract.pdf", Vec::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, SignError::Validation(_)));
}

#[tokio::test]
async fn test_upload_rejection_is_provider_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("/transientDocuments")))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"code":"INVALID_FILE"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .upload(Document::new("contract.pdf", b"data".to_vec()))
        .await
        .unwrap_err();

    match err {
        SignError::Provider { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("INVALID_FILE"));
        }
        other => panic!("Expected Provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_success_without_id_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("/transientDocuments")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"other": "x"})))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .upload(Document::new("contract.pdf", b"data".to_vec()))
        .await
        .unwrap_err();

    assert!(matches!(err, SignError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_create_agreement_posts_single_signer_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("/agreements")))
        .and(header("authorization", "Bearer test-key"))
        .and(body_json(json!({
            "fileInfos": [{"transientDocumentId": "TD1"}],
            "name": "TestAgreement",
            "participantSetsInfo": [{
                "memberInfos": [{"email": "a@b.com"}],
                "order": 1,
                "role": "SIGNER"
            }],
            "signatureType": "ESIGN",
            "state": "IN_PROCESS",
            "locale": "en_US",
            "sendType": "REGULAR_SEND",
            "postSignOption": {
                "redirectDelay": 0,
                "redirectUrl": "https://app.example.com/done"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "AG1"})))
        .expect(1)
        .mount(&server)
        .await;

    let agreement = provider_for(&server)
        .create_agreement(
            &TransientDocumentRef::new("TD1"),
            "a@b.com",
            "https://app.example.com/done",
        )
        .await
        .unwrap();

    assert_eq!(agreement.id, AgreementId::new("AG1"));
    assert_eq!(agreement.signer_email, "a@b.com");
    assert_eq!(agreement.redirect_url, "https://app.example.com/done");
}

#[tokio::test]
async fn test_signing_url_not_found_is_not_ready() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("/agreements/AG1/signingUrls")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"code": "AGREEMENT_NOT_EXPOSED"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .resolve_signing_url(&AgreementId::new("AG1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SignError::NotReady { .. }));
}

#[tokio::test]
async fn test_signing_url_empty_shapes_are_not_ready() {
    for body in [
        json!({"signingUrlSetInfos": []}),
        json!({"signingUrlSetInfos": [{"signingUrls": []}]}),
        json!({"unexpected": true}),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(api("/agreements/AG1/signingUrls")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .resolve_signing_url(&AgreementId::new("AG1"))
            .await
            .unwrap_err();

        assert!(
            matches!(err, SignError::NotReady { .. }),
            "body {body} gave {err:?}"
        );
    }
}

#[tokio::test]
async fn test_signing_url_non_json_body_is_not_ready() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("/agreements/AG1/signingUrls")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>pending</html>"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .resolve_signing_url(&AgreementId::new("AG1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SignError::NotReady { .. }));
}

#[tokio::test]
async fn test_signing_url_returns_first_url_of_first_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("/agreements/AG1/signingUrls")))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "signingUrlSetInfos": [{
                "signingUrls": [
                    {"email": "a@b.com", "esignUrl": "https://sign/x"},
                    {"email": "c@d.com", "esignUrl": "https://sign/y"}
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = provider_for(&server)
        .resolve_signing_url(&AgreementId::new("AG1"))
        .await
        .unwrap();

    assert_eq!(url.as_str(), "https://sign/x");
}

#[tokio::test]
async fn test_signing_url_server_error_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("/agreements/AG1/signingUrls")))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .resolve_signing_url(&AgreementId::new("AG1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SignError::Provider { status: 503, .. }));
}

#[tokio::test]
async fn test_combined_document_passes_bytes_through() {
    let pdf: Vec<u8> = (0u8..=255).cycle().take(4096).collect();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("/agreements/AG1/combinedDocument")))
        .and(header("accept", "application/pdf"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(pdf.clone()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let document = provider_for(&server)
        .fetch_combined_document(&AgreementId::new("AG1"))
        .await
        .unwrap();

    assert_eq!(document.as_bytes(), pdf.as_slice());
}

#[tokio::test]
async fn test_combined_document_not_signed_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("/agreements/AG1/combinedDocument")))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .fetch_combined_document(&AgreementId::new("AG1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SignError::Provider { status: 404, .. }));
}

#[tokio::test]
async fn test_agreement_id_is_percent_encoded_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("/agreements/A%2FB/combinedDocument")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let document = provider_for(&server)
        .fetch_combined_document(&AgreementId::new("A/B"))
        .await
        .unwrap();

    assert_eq!(document.as_bytes(), b"ok");
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    // Nothing listens on port 1; the connection is refused.
    let provider =
        HttpSignProvider::new(ProviderSettings::new("http://127.0.0.1:1/api", API_KEY)).unwrap();

    let err = provider
        .resolve_signing_url(&AgreementId::new("AG1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SignError::Transport(_)), "got {err:?}");
}
