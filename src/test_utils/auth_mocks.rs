//! Scripted mock implementations of the authentication ports.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use time::Duration;

use crate::{
    app_error::AppResult,
    domain::entities::client_identity::ClientIdentity,
    use_cases::auth::{
        ConsentBroker, ConsentDecision, ConsentRequest, OAuthApiError, OAuthClient, TokenGrant,
        UserInfo,
    },
};

// ============================================================================
// ScriptedOAuthClient
// ============================================================================

/// OAuth client that replays a fixed script of token-exchange results and
/// counts how many exchanges were attempted.
pub struct ScriptedOAuthClient {
    tokens: Mutex<VecDeque<Result<TokenGrant, OAuthApiError>>>,
    user_info: Result<UserInfo, OAuthApiError>,
    token_attempts: AtomicUsize,
}

impl ScriptedOAuthClient {
    pub fn new(
        tokens: Vec<Result<TokenGrant, OAuthApiError>>,
        user_info: Result<UserInfo, OAuthApiError>,
    ) -> Self {
        Self {
            tokens: Mutex::new(tokens.into()),
            user_info,
            token_attempts: AtomicUsize::new(0),
        }
    }

    pub fn token_attempts(&self) -> usize {
        self.token_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OAuthClient for ScriptedOAuthClient {
    async fn request_user_token(
        &self,
        _identity: &ClientIdentity,
        _lifetime: Duration,
    ) -> Result<TokenGrant, OAuthApiError> {
        self.token_attempts.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected token exchange")
    }

    async fn user_info(&self, _access_token: &str) -> Result<UserInfo, OAuthApiError> {
        self.user_info.clone()
    }
}

// ============================================================================
// Consent brokers
// ============================================================================

/// Consent broker with a fixed answer; records how often it was asked and
/// the last request it saw.
pub struct StaticConsentBroker {
    decision: ConsentDecision,
    prompts: AtomicUsize,
    last_request: Mutex<Option<ConsentRequest>>,
}

impl StaticConsentBroker {
    pub fn granting() -> Self {
        Self::with_decision(ConsentDecision::Granted)
    }

    pub fn denying() -> Self {
        Self::with_decision(ConsentDecision::Denied)
    }

    fn with_decision(decision: ConsentDecision) -> Self {
        Self {
            decision,
            prompts: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ConsentRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConsentBroker for StaticConsentBroker {
    async fn await_decision(&self, request: ConsentRequest) -> AppResult<ConsentDecision> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        Ok(self.decision)
    }
}

/// Consent broker for paths that must never prompt.
pub struct StubConsentBroker;

#[async_trait]
impl ConsentBroker for StubConsentBroker {
    async fn await_decision(&self, _request: ConsentRequest) -> AppResult<ConsentDecision> {
        unimplemented!("consent prompt not expected in this test")
    }
}
