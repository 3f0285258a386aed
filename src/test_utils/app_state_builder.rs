//! Test app state builder for HTTP-level testing.
//!
//! Creates a minimal `AppState` with scripted port mocks for testing HTTP
//! endpoints against the real router.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::HeaderValue;
use time::Duration;
use url::Url;

use crate::{
    adapters::{consent::pending::PendingConsentBroker, http::app_state::AppState},
    infra::config::{AppConfig, ConsentMode},
    test_utils::{
        ScriptedEnvelopeApi, ScriptedOAuthClient, create_test_identity, test_send_policy,
        test_token, test_user_info,
    },
    use_cases::{
        auth::{Authenticator, ConsentBroker, OAuthClient},
        signing::{EnvelopeApi, SigningUseCases},
    },
};

pub struct TestAppStateBuilder {
    oauth: Option<Arc<dyn OAuthClient>>,
    consent: Option<Arc<dyn ConsentBroker>>,
    envelopes: Option<Arc<dyn EnvelopeApi>>,
    document_path: PathBuf,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            oauth: None,
            consent: None,
            envelopes: None,
            document_path: PathBuf::from("/nonexistent/agreement.pdf"),
        }
    }

    pub fn with_oauth(mut self, oauth: Arc<dyn OAuthClient>) -> Self {
        self.oauth = Some(oauth);
        self
    }

    pub fn with_consent(mut self, consent: Arc<dyn ConsentBroker>) -> Self {
        self.consent = Some(consent);
        self
    }

    pub fn with_envelopes(mut self, envelopes: Arc<dyn EnvelopeApi>) -> Self {
        self.envelopes = Some(envelopes);
        self
    }

    pub fn with_document_path(mut self, path: &Path) -> Self {
        self.document_path = path.to_path_buf();
        self
    }

    pub fn build(self) -> AppState {
        let consent_registry = Arc::new(PendingConsentBroker::new(
            std::time::Duration::from_secs(5),
        ));
        let consent = self
            .consent
            .unwrap_or_else(|| consent_registry.clone() as Arc<dyn ConsentBroker>);
        let oauth = self.oauth.unwrap_or_else(|| {
            Arc::new(ScriptedOAuthClient::new(
                vec![Ok(test_token(600))],
                Ok(test_user_info()),
            )) as Arc<dyn OAuthClient>
        });
        let envelopes = self
            .envelopes
            .unwrap_or_else(|| Arc::new(ScriptedEnvelopeApi::new()) as Arc<dyn EnvelopeApi>);

        let authenticator = Arc::new(Authenticator::new(
            create_test_identity(|_| {}),
            oauth,
            consent,
            Duration::seconds(600),
        ));
        let signing_use_cases = Arc::new(SigningUseCases::new(
            authenticator,
            envelopes,
            test_send_policy(&self.document_path),
        ));

        AppState {
            config: Arc::new(test_config(&self.document_path)),
            signing_use_cases,
            consent_registry,
        }
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn test_config(document_path: &Path) -> AppConfig {
    AppConfig {
        integration_key: "int-key-123".to_string(),
        user_id: "user-456".to_string(),
        private_key_path: PathBuf::from("/nonexistent/private.key"),
        oauth_base_url: Url::parse("https://account-d.esign.test").unwrap(),
        consent_redirect_uri: "http://localhost:4000/callback".to_string(),
        token_lifetime: Duration::seconds(600),
        document_path: document_path.to_path_buf(),
        document_name: "Uploaded Document".to_string(),
        signer_name: "User".to_string(),
        client_user_id: "embedded-signer".to_string(),
        return_url: "http://localhost:3000".to_string(),
        email_subject: "Please sign this document".to_string(),
        email_blurb: "Hello, please sign this document.".to_string(),
        consent_mode: ConsentMode::Http,
        consent_timeout_secs: 5,
        bind_addr: "127.0.0.1:4000".parse().unwrap(),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
    }
}
