use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use time::Duration;
use url::Url;

use crate::{
    application::jwt,
    domain::entities::client_identity::ClientIdentity,
    infra::http_client,
    use_cases::auth::{AccountInfo, OAuthApiError, OAuthClient, TokenGrant, UserInfo},
};

const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

pub struct HttpOAuthClient {
    client: Client,
    base: Url,
}

impl HttpOAuthClient {
    pub fn new(base: Url) -> Self {
        Self {
            client: http_client::build_client(),
            base,
        }
    }

    fn endpoint(&self, path: &str) -> Url {
        self.base
            .join(path)
            .expect("authorization server URL accepts a path")
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Deserialize)]
struct UserInfoResponse {
    #[serde(default)]
    accounts: Vec<UserInfoAccount>,
}

#[derive(Deserialize)]
struct UserInfoAccount {
    #[serde(alias = "accountId")]
    account_id: String,
    #[serde(default, alias = "isDefault", deserialize_with = "bool_or_string")]
    is_default: bool,
    #[serde(alias = "baseUri")]
    base_uri: String,
}

/// The vendor reports `is_default` as a boolean in some responses and the
/// string `"true"` in others; accept both.
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Text(s) => s.eq_ignore_ascii_case("true"),
    })
}

/// Classify a non-2xx response. The body is read defensively: it may be
/// empty or not JSON at all, in which case no error code is extracted.
async fn classify_failure(response: reqwest::Response) -> OAuthApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let error_code = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|error| error.as_str())
                .map(str::to_string)
        });
    OAuthApiError::Api {
        status,
        error_code,
        body,
    }
}

#[async_trait]
impl OAuthClient for HttpOAuthClient {
    async fn request_user_token(
        &self,
        identity: &ClientIdentity,
        lifetime: Duration,
    ) -> Result<TokenGrant, OAuthApiError> {
        let assertion = jwt::sign_assertion(identity, lifetime)
            .map_err(|e| OAuthApiError::Signing(e.to_string()))?;

        let response = self
            .client
            .post(self.endpoint("oauth/token"))
            .form(&[
                ("grant_type", JWT_BEARER_GRANT_TYPE),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| OAuthApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(classify_failure(response).await);
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| OAuthApiError::Malformed(format!("token response: {e}")))?;

        Ok(TokenGrant {
            access_token: parsed.access_token,
            expires_in: parsed.expires_in.unwrap_or(lifetime.whole_seconds()),
        })
    }

    async fn user_info(&self, access_token: &str) -> Result<UserInfo, OAuthApiError> {
        let response = self
            .client
            .get(self.endpoint("oauth/userinfo"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| OAuthApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(classify_failure(response).await);
        }

        let parsed: UserInfoResponse = response
            .json()
            .await
            .map_err(|e| OAuthApiError::Malformed(format!("userinfo response: {e}")))?;

        Ok(UserInfo {
            accounts: parsed
                .accounts
                .into_iter()
                .map(|a| AccountInfo {
                    account_id: a.account_id,
                    is_default: a.is_default,
                    base_uri: a.base_uri,
                })
                .collect(),
        })
    }
}
