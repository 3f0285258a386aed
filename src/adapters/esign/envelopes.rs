use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    domain::entities::access_grant::AccessGrant,
    infra::http_client,
    use_cases::signing::{
        EnvelopeApi, EnvelopeDetails, EnvelopeRequest, EsignApiError, RecipientViewParams,
    },
};

// Single-document, single-signer envelopes: these ids tie the document, the
// signer and the signing tab together and must match across requests.
const DOCUMENT_ID: &str = "1";
const RECIPIENT_ID: &str = "1";
const ROUTING_ORDER: &str = "1";
const SIGN_HERE_PAGE: &str = "1";
const SIGN_HERE_X: &str = "100";
const SIGN_HERE_Y: &str = "600";
const SIGN_HERE_LABEL: &str = "SignHereTab";

pub struct HttpEnvelopeApi {
    client: Client,
}

impl HttpEnvelopeApi {
    pub fn new() -> Self {
        Self {
            client: http_client::build_client(),
        }
    }
}

impl Default for HttpEnvelopeApi {
    fn default() -> Self {
        Self::new()
    }
}

fn accounts_url(grant: &AccessGrant, rest: &str) -> String {
    format!("{}/v2.1/accounts/{}{}", grant.base_path, grant.account_id, rest)
}

fn envelope_definition(request: &EnvelopeRequest) -> serde_json::Value {
    serde_json::json!({
        "emailSubject": request.email_subject,
        "emailBlurb": request.email_blurb,
        "documents": [{
            "documentBase64": request.document_base64,
            "name": request.document_name,
            "fileExtension": request.file_extension,
            "documentId": DOCUMENT_ID,
        }],
        "recipients": {
            "signers": [{
                "email": request.signer_email,
                "name": request.signer_name,
                "recipientId": RECIPIENT_ID,
                "routingOrder": ROUTING_ORDER,
                "clientUserId": request.client_user_id,
                "tabs": {
                    "signHereTabs": [{
                        "documentId": DOCUMENT_ID,
                        "pageNumber": SIGN_HERE_PAGE,
                        "recipientId": RECIPIENT_ID,
                        "tabLabel": SIGN_HERE_LABEL,
                        "xPosition": SIGN_HERE_X,
                        "yPosition": SIGN_HERE_Y,
                    }],
                },
            }],
        },
        "status": "sent",
    })
}

#[derive(Deserialize)]
struct CreateEnvelopeResponse {
    #[serde(rename = "envelopeId")]
    envelope_id: String,
}

#[derive(Deserialize)]
struct RecipientViewResponse {
    url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeResponse {
    envelope_id: String,
    status: Option<String>,
    email_subject: Option<String>,
    created_date_time: Option<String>,
    sent_date_time: Option<String>,
    completed_date_time: Option<String>,
}

async fn failure(response: reqwest::Response) -> EsignApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    EsignApiError::Api { status, body }
}

#[async_trait]
impl EnvelopeApi for HttpEnvelopeApi {
    async fn create_envelope(
        &self,
        grant: &AccessGrant,
        request: &EnvelopeRequest,
    ) -> Result<String, EsignApiError> {
        let response = self
            .client
            .post(accounts_url(grant, "/envelopes"))
            .bearer_auth(&grant.access_token)
            .json(&envelope_definition(request))
            .send()
            .await
            .map_err(|e| EsignApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }

        let parsed: CreateEnvelopeResponse = response
            .json()
            .await
            .map_err(|e| EsignApiError::Malformed(format!("create envelope response: {e}")))?;

        Ok(parsed.envelope_id)
    }

    async fn create_recipient_view(
        &self,
        grant: &AccessGrant,
        envelope_id: &str,
        view: &RecipientViewParams,
    ) -> Result<String, EsignApiError> {
        let body = serde_json::json!({
            "returnUrl": view.return_url,
            "authenticationMethod": "email",
            "email": view.signer_email,
            "userName": view.signer_name,
            "recipientId": RECIPIENT_ID,
            "clientUserId": view.client_user_id,
        });

        let response = self
            .client
            .post(accounts_url(
                grant,
                &format!("/envelopes/{envelope_id}/views/recipient"),
            ))
            .bearer_auth(&grant.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| EsignApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }

        let parsed: RecipientViewResponse = response
            .json()
            .await
            .map_err(|e| EsignApiError::Malformed(format!("recipient view response: {e}")))?;

        Ok(parsed.url)
    }

    async fn envelope(
        &self,
        grant: &AccessGrant,
        envelope_id: &str,
    ) -> Result<EnvelopeDetails, EsignApiError> {
        let response = self
            .client
            .get(accounts_url(grant, &format!("/envelopes/{envelope_id}")))
            .bearer_auth(&grant.access_token)
            .send()
            .await
            .map_err(|e| EsignApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failure(response).await);
        }

        let parsed: EnvelopeResponse = response
            .json()
            .await
            .map_err(|e| EsignApiError::Malformed(format!("envelope response: {e}")))?;

        Ok(EnvelopeDetails {
            envelope_id: parsed.envelope_id,
            status: parsed.status,
            email_subject: parsed.email_subject,
            created_date_time: parsed.created_date_time,
            sent_date_time: parsed.sent_date_time,
            completed_date_time: parsed.completed_date_time,
        })
    }
}
