pub mod access_grant;
pub mod client_identity;
