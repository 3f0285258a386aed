/// Short-lived credentials for vendor API calls. Only ever produced by a
/// successful token exchange plus default-account resolution.
#[derive(Debug, Clone)]
pub struct AccessGrant {
    pub access_token: String,
    pub account_id: String,
    /// Account base URI with the REST API suffix appended.
    pub base_path: String,
}
