use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::access_grant::AccessGrant,
    use_cases::auth::Authenticator,
};

// ============================================================================
// Port
// ============================================================================

/// Semantic envelope request; the vendor adapter owns the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeRequest {
    pub email_subject: String,
    pub email_blurb: String,
    pub document_base64: String,
    pub document_name: String,
    pub file_extension: String,
    pub signer_email: String,
    pub signer_name: String,
    pub client_user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientViewParams {
    pub return_url: String,
    pub signer_email: String,
    pub signer_name: String,
    pub client_user_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeDetails {
    pub envelope_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date_time: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    pub envelope_id: String,
    pub recipient_view_url: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EsignApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("e-signature API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed e-signature API response: {0}")]
    Malformed(String),
}

impl EsignApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, EsignApiError::Api { status: 401, .. })
    }
}

#[async_trait]
pub trait EnvelopeApi: Send + Sync {
    async fn create_envelope(
        &self,
        grant: &AccessGrant,
        request: &EnvelopeRequest,
    ) -> Result<String, EsignApiError>;

    async fn create_recipient_view(
        &self,
        grant: &AccessGrant,
        envelope_id: &str,
        view: &RecipientViewParams,
    ) -> Result<String, EsignApiError>;

    async fn envelope(
        &self,
        grant: &AccessGrant,
        envelope_id: &str,
    ) -> Result<EnvelopeDetails, EsignApiError>;
}

// ============================================================================
// Use cases
// ============================================================================

/// Fixed send parameters: which document goes out and how the envelope is
/// addressed.
#[derive(Debug, Clone)]
pub struct SendPolicy {
    pub document_path: PathBuf,
    pub document_name: String,
    pub signer_name: String,
    pub client_user_id: String,
    pub return_url: String,
    pub email_subject: String,
    pub email_blurb: String,
}

pub struct SigningUseCases {
    authenticator: Arc<Authenticator>,
    envelopes: Arc<dyn EnvelopeApi>,
    policy: SendPolicy,
}

impl SigningUseCases {
    pub fn new(
        authenticator: Arc<Authenticator>,
        envelopes: Arc<dyn EnvelopeApi>,
        policy: SendPolicy,
    ) -> Self {
        Self {
            authenticator,
            envelopes,
            policy,
        }
    }

    /// Send the configured document for signature by `user_email` and return
    /// the envelope id plus an embedded signing URL for that recipient.
    pub async fn send_for_signature(&self, user_email: &str) -> AppResult<SendReceipt> {
        let request = self.build_envelope_request(user_email).await?;
        let grant = self.authenticator.authenticate().await?;

        let (grant, envelope_id) = match self.envelopes.create_envelope(&grant, &request).await {
            Ok(id) => (grant, id),
            Err(err) if err.is_unauthorized() => {
                self.authenticator.invalidate();
                let grant = self.authenticator.authenticate().await?;
                let id = self
                    .envelopes
                    .create_envelope(&grant, &request)
                    .await
                    .map_err(esign_failure)?;
                (grant, id)
            }
            Err(err) => return Err(esign_failure(err)),
        };

        let view = RecipientViewParams {
            return_url: self.policy.return_url.clone(),
            signer_email: user_email.to_string(),
            signer_name: self.policy.signer_name.clone(),
            client_user_id: self.policy.client_user_id.clone(),
        };
        let recipient_view_url = self
            .envelopes
            .create_recipient_view(&grant, &envelope_id, &view)
            .await
            .map_err(esign_failure)?;

        Ok(SendReceipt {
            envelope_id,
            recipient_view_url,
        })
    }

    pub async fn envelope_status(&self, envelope_id: &str) -> AppResult<EnvelopeDetails> {
        let grant = self.authenticator.authenticate().await?;
        match self.envelopes.envelope(&grant, envelope_id).await {
            Ok(details) => Ok(details),
            Err(err) if err.is_unauthorized() => {
                self.authenticator.invalidate();
                let grant = self.authenticator.authenticate().await?;
                self.envelopes
                    .envelope(&grant, envelope_id)
                    .await
                    .map_err(esign_failure)
            }
            Err(err) => Err(esign_failure(err)),
        }
    }

    async fn build_envelope_request(&self, user_email: &str) -> AppResult<EnvelopeRequest> {
        let bytes = tokio::fs::read(&self.policy.document_path).await.map_err(|e| {
            AppError::Internal(format!(
                "failed to read document {}: {e}",
                self.policy.document_path.display()
            ))
        })?;

        let file_extension = self
            .policy
            .document_path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("pdf")
            .to_string();

        Ok(EnvelopeRequest {
            email_subject: self.policy.email_subject.clone(),
            email_blurb: self.policy.email_blurb.clone(),
            document_base64: base64::engine::general_purpose::STANDARD.encode(&bytes),
            document_name: self.policy.document_name.clone(),
            file_extension,
            signer_email: user_email.to_string(),
            signer_name: self.policy.signer_name.clone(),
            client_user_id: self.policy.client_user_id.clone(),
        })
    }
}

fn esign_failure(err: EsignApiError) -> AppError {
    match err {
        EsignApiError::Api { status: 404, .. } => AppError::NotFound,
        EsignApiError::Api { status, body } => AppError::Esign {
            status,
            detail: body,
        },
        EsignApiError::Network(msg) => {
            AppError::Internal(format!("e-signature API unreachable: {msg}"))
        }
        EsignApiError::Malformed(msg) => AppError::Internal(msg),
    }
}

// ============================================================================
// Tests
// ============================================================================
