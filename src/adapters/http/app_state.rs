use std::sync::Arc;

use crate::{
    adapters::consent::pending::PendingConsentBroker, infra::config::AppConfig,
    use_cases::signing::SigningUseCases,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub signing_use_cases: Arc<SigningUseCases>,
    pub consent_registry: Arc<PendingConsentBroker>,
}
