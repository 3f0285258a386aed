use std::{env, net::SocketAddr, path::PathBuf};

use axum::http::HeaderValue;
use time::Duration;
use url::Url;

/// How the consent-required branch waits for the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentMode {
    /// Park the request and wait for a decision via the consent endpoints.
    Http,
    /// Prompt on the terminal. Only suitable for interactive
    /// single-operator deployments.
    Terminal,
}

pub struct AppConfig {
    pub integration_key: String,
    pub user_id: String,
    pub private_key_path: PathBuf,
    pub oauth_base_url: Url,
    pub consent_redirect_uri: String,
    /// Requested lifetime of the grant assertion and the access token.
    pub token_lifetime: Duration,
    pub document_path: PathBuf,
    pub document_name: String,
    pub signer_name: String,
    pub client_user_id: String,
    pub return_url: String,
    pub email_subject: String,
    pub email_blurb: String,
    pub consent_mode: ConsentMode,
    pub consent_timeout_secs: u64,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let integration_key =
            env::var("ESIGN_INTEGRATION_KEY").expect("ESIGN_INTEGRATION_KEY must be set");
        let user_id = env::var("ESIGN_USER_ID").expect("ESIGN_USER_ID must be set");
        let private_key_path: PathBuf = env::var("ESIGN_PRIVATE_KEY_PATH")
            .unwrap_or("./private.key".to_string())
            .into();
        let oauth_base_url: Url = env::var("ESIGN_OAUTH_BASE_URL")
            .unwrap_or("https://account-d.docusign.com".to_string())
            .parse()
            .expect("ESIGN_OAUTH_BASE_URL must be a valid URL");
        let consent_redirect_uri = env::var("ESIGN_CONSENT_REDIRECT_URI")
            .unwrap_or("http://localhost:4000/callback".to_string());

        let token_lifetime_secs: i64 = env::var("TOKEN_LIFETIME_SECS")
            .unwrap_or("600".to_string())
            .parse()
            .expect("TOKEN_LIFETIME_SECS must be a valid number");

        let document_path: PathBuf = env::var("DOCUMENT_PATH")
            .unwrap_or("./agreement.pdf".to_string())
            .into();
        let document_name =
            env::var("DOCUMENT_NAME").unwrap_or("Uploaded Document".to_string());
        let signer_name = env::var("SIGNER_NAME").unwrap_or("User".to_string());
        let client_user_id =
            env::var("SIGNER_CLIENT_USER_ID").unwrap_or("embedded-signer".to_string());
        let return_url = env::var("RETURN_URL").unwrap_or("http://localhost:3000".to_string());
        let email_subject =
            env::var("EMAIL_SUBJECT").unwrap_or("Please sign this document".to_string());
        let email_blurb =
            env::var("EMAIL_BLURB").unwrap_or("Hello, please sign this document.".to_string());

        let consent_mode = match env::var("CONSENT_MODE")
            .unwrap_or("http".to_string())
            .as_str()
        {
            "terminal" => ConsentMode::Terminal,
            _ => ConsentMode::Http,
        };
        let consent_timeout_secs: u64 = env::var("CONSENT_TIMEOUT_SECS")
            .unwrap_or("900".to_string())
            .parse()
            .expect("CONSENT_TIMEOUT_SECS must be a valid number");

        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or("127.0.0.1:4000".to_string())
            .parse()
            .expect("BIND_ADDR must be a valid socket address");
        let cors_origin: HeaderValue = env::var("CORS_ORIGIN")
            .unwrap_or("http://localhost:3000".to_string())
            .parse()
            .expect("CORS_ORIGIN must be a valid header value");

        Self {
            integration_key,
            user_id,
            private_key_path,
            oauth_base_url,
            consent_redirect_uri,
            token_lifetime: Duration::seconds(token_lifetime_secs),
            document_path,
            document_name,
            signer_name,
            client_user_id,
            return_url,
            email_subject,
            email_blurb,
            consent_mode,
            consent_timeout_secs,
            bind_addr,
            cors_origin,
        }
    }
}
