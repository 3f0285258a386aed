use secrecy::SecretString;
use url::Url;

/// Scopes requested for every delegated grant. Declaration order is
/// canonical: the consent URL and the assertion's `scope` claim join them in
/// this order.
pub const SCOPES: [&str; 2] = ["signature", "impersonation"];

/// Credentials and endpoints for one integration acting on behalf of one
/// delegated user. Built once at startup, never mutated.
#[derive(Clone)]
pub struct ClientIdentity {
    pub integration_key: String,
    pub user_id: String,
    /// RSA private key PEM used to sign the grant assertion.
    pub private_key_pem: SecretString,
    pub auth_server: Url,
    pub consent_redirect_uri: String,
    pub scopes: Vec<String>,
}
