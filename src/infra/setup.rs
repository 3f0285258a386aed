use std::fs::File;
use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{
        consent::{pending::PendingConsentBroker, terminal::TerminalConsentBroker},
        esign::{envelopes::HttpEnvelopeApi, oauth::HttpOAuthClient},
        http::app_state::AppState,
    },
    domain::entities::client_identity::{ClientIdentity, SCOPES},
    infra::config::{AppConfig, ConsentMode},
    use_cases::{
        auth::{Authenticator, ConsentBroker, OAuthClient},
        signing::{EnvelopeApi, SendPolicy, SigningUseCases},
    },
};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let private_key_pem = tokio::fs::read_to_string(&config.private_key_path)
        .await
        .with_context(|| {
            format!(
                "reading private key from {}",
                config.private_key_path.display()
            )
        })?;

    let identity = ClientIdentity {
        integration_key: config.integration_key.clone(),
        user_id: config.user_id.clone(),
        private_key_pem: SecretString::new(private_key_pem.into()),
        auth_server: config.oauth_base_url.clone(),
        consent_redirect_uri: config.consent_redirect_uri.clone(),
        scopes: SCOPES.iter().map(|s| s.to_string()).collect(),
    };

    let oauth =
        Arc::new(HttpOAuthClient::new(config.oauth_base_url.clone())) as Arc<dyn OAuthClient>;

    let consent_registry = Arc::new(PendingConsentBroker::new(std::time::Duration::from_secs(
        config.consent_timeout_secs,
    )));
    let consent: Arc<dyn ConsentBroker> = match config.consent_mode {
        ConsentMode::Http => consent_registry.clone() as Arc<dyn ConsentBroker>,
        ConsentMode::Terminal => Arc::new(TerminalConsentBroker) as Arc<dyn ConsentBroker>,
    };

    let authenticator = Arc::new(Authenticator::new(
        identity,
        oauth,
        consent,
        config.token_lifetime,
    ));

    let policy = SendPolicy {
        document_path: config.document_path.clone(),
        document_name: config.document_name.clone(),
        signer_name: config.signer_name.clone(),
        client_user_id: config.client_user_id.clone(),
        return_url: config.return_url.clone(),
        email_subject: config.email_subject.clone(),
        email_blurb: config.email_blurb.clone(),
    };

    let envelopes = Arc::new(HttpEnvelopeApi::new()) as Arc<dyn EnvelopeApi>;
    let signing_use_cases = SigningUseCases::new(authenticator, envelopes, policy);

    Ok(AppState {
        config: Arc::new(config),
        signing_use_cases: Arc::new(signing_use_cases),
        consent_registry,
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "signrelay=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
