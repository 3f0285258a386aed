use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use secrecy::ExposeSecret;
use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::app_error::{AppError, AppResult};
use crate::domain::entities::client_identity::ClientIdentity;

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
    scope: String,
}

/// Sign the JWT-grant assertion for `identity`.
///
/// The audience is the authorization server's host without scheme; `iss` is
/// the integration key and `sub` the delegated user.
pub fn sign_assertion(identity: &ClientIdentity, lifetime: Duration) -> AppResult<String> {
    let aud = identity
        .auth_server
        .host_str()
        .ok_or_else(|| AppError::Internal("authorization server URL has no host".into()))?;

    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = AssertionClaims {
        iss: &identity.integration_key,
        sub: &identity.user_id,
        aud,
        iat: now,
        exp: now + lifetime.whole_seconds(),
        scope: identity.scopes.join(" "),
    };

    let key = EncodingKey::from_rsa_pem(identity.private_key_pem.expose_secret().as_bytes())
        .map_err(|e| AppError::Internal(format!("invalid RSA signing key: {e}")))?;

    encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| AppError::Internal(e.to_string()))
}
