use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{access_grant::AccessGrant, client_identity::ClientIdentity},
};

/// Appended to the default account's base URI to form the REST base path.
pub const REST_API_SUFFIX: &str = "/restapi";

/// Token-exchange attempts per `authenticate` call. The second attempt only
/// happens after the operator confirms consent.
const MAX_TOKEN_ATTEMPTS: u32 = 2;

/// Cached grants count as stale this long before the token's actual expiry.
const CACHE_EXPIRY_MARGIN: Duration = Duration::seconds(30);

// ============================================================================
// Ports
// ============================================================================

#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct AccountInfo {
    pub account_id: String,
    pub is_default: bool,
    pub base_uri: String,
}

#[derive(Debug, Clone)]
pub struct UserInfo {
    pub accounts: Vec<AccountInfo>,
}

/// Typed authorization-server failure, classified by the Authenticator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OAuthApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authorization server returned {status}: {body}")]
    Api {
        status: u16,
        /// Best-effort `error` code from the response body; `None` when the
        /// body is absent or not JSON.
        error_code: Option<String>,
        body: String,
    },

    #[error("failed to sign assertion: {0}")]
    Signing(String),

    #[error("malformed authorization server response: {0}")]
    Malformed(String),
}

impl OAuthApiError {
    pub fn is_consent_required(&self) -> bool {
        matches!(
            self,
            OAuthApiError::Api { error_code: Some(code), .. } if code == "consent_required"
        )
    }
}

#[async_trait]
pub trait OAuthClient: Send + Sync {
    /// Sign a JWT assertion for `identity` and exchange it for an access
    /// token.
    async fn request_user_token(
        &self,
        identity: &ClientIdentity,
        lifetime: Duration,
    ) -> Result<TokenGrant, OAuthApiError>;

    async fn user_info(&self, access_token: &str) -> Result<UserInfo, OAuthApiError>;
}

#[derive(Debug, Clone)]
pub struct ConsentRequest {
    pub integration_key: String,
    pub consent_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentDecision {
    Granted,
    Denied,
}

#[async_trait]
pub trait ConsentBroker: Send + Sync {
    /// Suspend until the operator decides whether consent was granted.
    async fn await_decision(&self, request: ConsentRequest) -> AppResult<ConsentDecision>;
}

// ============================================================================
// Authenticator
// ============================================================================

struct CachedGrant {
    grant: AccessGrant,
    expires_at: OffsetDateTime,
}

pub struct Authenticator {
    identity: ClientIdentity,
    oauth: Arc<dyn OAuthClient>,
    consent: Arc<dyn ConsentBroker>,
    token_lifetime: Duration,
    cache: Mutex<Option<CachedGrant>>,
}

impl Authenticator {
    pub fn new(
        identity: ClientIdentity,
        oauth: Arc<dyn OAuthClient>,
        consent: Arc<dyn ConsentBroker>,
        token_lifetime: Duration,
    ) -> Self {
        Self {
            identity,
            oauth,
            consent,
            token_lifetime,
            cache: Mutex::new(None),
        }
    }

    /// Produce an access grant for the configured identity.
    ///
    /// Returns the cached grant while it is fresh. Otherwise exchanges a
    /// signed assertion for a token and resolves the default account, with a
    /// single consent-gated retry: when the authorization server reports
    /// `consent_required`, the operator is asked once, and a granted consent
    /// buys exactly one more exchange attempt.
    pub async fn authenticate(&self) -> AppResult<AccessGrant> {
        if let Some(grant) = self.cached() {
            return Ok(grant);
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .oauth
                .request_user_token(&self.identity, self.token_lifetime)
                .await
            {
                Ok(token) => return self.resolve_account(token).await,
                Err(err) if err.is_consent_required() && attempt < MAX_TOKEN_ATTEMPTS => {
                    let request = ConsentRequest {
                        integration_key: self.identity.integration_key.clone(),
                        consent_url: consent_url(&self.identity).to_string(),
                    };
                    tracing::warn!(
                        consent_url = %request.consent_url,
                        "consent required for delegated user"
                    );
                    match self.consent.await_decision(request).await? {
                        ConsentDecision::Granted => continue,
                        ConsentDecision::Denied => return Err(AppError::ConsentDenied),
                    }
                }
                Err(err) => return Err(auth_failure(err)),
            }
        }
    }

    /// Drop the cached grant, e.g. after the vendor API rejected it.
    pub fn invalidate(&self) {
        self.cache.lock().unwrap().take();
    }

    fn cached(&self) -> Option<AccessGrant> {
        let cache = self.cache.lock().unwrap();
        cache
            .as_ref()
            .filter(|c| OffsetDateTime::now_utc() < c.expires_at)
            .map(|c| c.grant.clone())
    }

    async fn resolve_account(&self, token: TokenGrant) -> AppResult<AccessGrant> {
        let info = self
            .oauth
            .user_info(&token.access_token)
            .await
            .map_err(auth_failure)?;

        let account = info
            .accounts
            .into_iter()
            .find(|a| a.is_default)
            .ok_or(AppError::NoDefaultAccount)?;

        let grant = AccessGrant {
            access_token: token.access_token,
            account_id: account.account_id,
            base_path: format!("{}{}", account.base_uri, REST_API_SUFFIX),
        };

        let expires_at =
            OffsetDateTime::now_utc() + Duration::seconds(token.expires_in) - CACHE_EXPIRY_MARGIN;
        *self.cache.lock().unwrap() = Some(CachedGrant {
            grant: grant.clone(),
            expires_at,
        });

        Ok(grant)
    }
}

fn auth_failure(err: OAuthApiError) -> AppError {
    match err {
        OAuthApiError::Api { status, body, .. } => AppError::AuthFailed {
            status,
            detail: body,
        },
        OAuthApiError::Network(msg) => {
            AppError::Internal(format!("authorization server unreachable: {msg}"))
        }
        OAuthApiError::Signing(msg) => {
            AppError::Internal(format!("failed to sign assertion: {msg}"))
        }
        OAuthApiError::Malformed(msg) => AppError::Internal(msg),
    }
}

/// Consent-grant URL for `identity`. Parameter and scope order are fixed, so
/// repeated calls produce byte-identical strings.
pub fn consent_url(identity: &ClientIdentity) -> Url {
    let mut url = identity
        .auth_server
        .join("oauth/auth")
        .expect("authorization server URL accepts a path");
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("scope", &identity.scopes.join(" "))
        .append_pair("client_id", &identity.integration_key)
        .append_pair("redirect_uri", &identity.consent_redirect_uri);
    url
}

// ============================================================================
// Tests
// ============================================================================
