//! JSON payloads of the provider REST API

use serde::{Deserialize, Serialize};

/// Multipart field carrying the filename as text
pub(crate) const FILE_NAME_FIELD: &str = "File-Name";

/// Multipart field carrying the document bytes
pub(crate) const FILE_FIELD: &str = "File";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransientDocumentResponse {
    pub transient_document_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AgreementCreationRequest<'a> {
    pub file_infos: Vec<FileInfo<'a>>,
    pub name: &'a str,
    pub participant_sets_info: Vec<ParticipantSetInfo<'a>>,
    pub signature_type: &'static str,
    pub state: &'static str,
    pub locale: &'a str,
    pub send_type: &'static str,
    pub post_sign_option: PostSignOption<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileInfo<'a> {
    pub transient_document_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ParticipantSetInfo<'a> {
    pub member_infos: Vec<MemberInfo<'a>>,
    pub order: u32,
    pub role: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct MemberInfo<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostSignOption<'a> {
    pub redirect_delay: u32,
    pub redirect_url: &'a str,
}

impl<'a> AgreementCreationRequest<'a> {
    /// Single signer, e-signature, sent immediately.
    pub fn single_signer(
        transient_document_id: &'a str,
        name: &'a str,
        locale: &'a str,
        signer_email: &'a str,
        redirect_url: &'a str,
        redirect_delay: u32,
    ) -> Self {
        Self {
            file_infos: vec![FileInfo {
                transient_document_id,
            }],
            name,
            participant_sets_info: vec![ParticipantSetInfo {
                member_infos: vec![MemberInfo {
                    email: signer_email,
                }],
                order: 1,
                role: "SIGNER",
            }],
            signature_type: "ESIGN",
            state: "IN_PROCESS",
            locale,
            send_type: "REGULAR_SEND",
            post_sign_option: PostSignOption {
                redirect_delay,
                redirect_url,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AgreementCreationResponse {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SigningUrlResponse {
    #[serde(default)]
    pub signing_url_set_infos: Vec<SigningUrlSetInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SigningUrlSetInfo {
    #[serde(default)]
    pub signing_urls: Vec<SigningUrlEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SigningUrlEntry {
    pub esign_url: Option<String>,
}

impl SigningUrlResponse {
    /// `signingUrlSetInfos[0].signingUrls[0].esignUrl`, if present and non-blank
    pub fn first_esign_url(&self) -> Option<&str> {
        self.signing_url_set_infos
            .first()?
            .signing_urls
            .first()?
            .esign_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agreement_request_shape() {
        let request = AgreementCreationRequest::single_signer(
            "TD1",
            "TestAgreement",
            "en_US",
            "a@b.com",
            "https://app.example.com/done",
            0,
        );

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
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
            })
        );
    }

    #[test]
    fn test_first_esign_url_takes_first_of_first() {
        let response: SigningUrlResponse = serde_json::from_value(json!({
            "signingUrlSetInfos": [
                {"signingUrls": [
                    {"email": "a@b.com", "esignUrl": "https://sign/x"},
                    {"email": "c@d.com", "esignUrl": "https://sign/y"}
                ]},
                {"signingUrls": [{"email": "e@f.com", "esignUrl": "https://sign/z"}]}
            ]
        }))
        .unwrap();

        assert_eq!(response.first_esign_url(), Some("https://sign/x"));
    }

    #[test]
    fn test_first_esign_url_absent_shapes() {
        for body in [
            json!({}),
            json!({"signingUrlSetInfos": []}),
            json!({"signingUrlSetInfos": [{}]}),
            json!({"signingUrlSetInfos": [{"signingUrls": []}]}),
            json!({"signingUrlSetInfos": [{"signingUrls": [{"email": "a@b.com"}]}]}),
            json!({"signingUrlSetInfos": [{"signingUrls": [{"esignUrl": "  "}]}]}),
        ] {
            let response: SigningUrlResponse = serde_json::from_value(body.clone()).unwrap();
            assert_eq!(response.first_esign_url(), None, "body: {body}");
        }
    }
}
