use std::{collections::HashMap, sync::Mutex, time::Duration};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::oneshot;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::auth::{ConsentBroker, ConsentDecision, ConsentRequest},
};

/// A consent request waiting for an operator decision.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingConsent {
    pub integration_key: String,
    pub consent_url: String,
}

struct PendingEntry {
    consent_url: String,
    waiters: Vec<oneshot::Sender<ConsentDecision>>,
}

/// Consent broker backed by an in-process registry.
///
/// Requests that hit the consent branch park here until an operator posts a
/// decision through the consent endpoints; a decision resolves every waiter
/// for that integration key. A request that waits past the timeout fails
/// with `ConsentRequired` and can be retried after the grant.
pub struct PendingConsentBroker {
    timeout: Duration,
    pending: Mutex<HashMap<String, PendingEntry>>,
}

impl PendingConsentBroker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn pending(&self) -> Vec<PendingConsent> {
        self.pending
            .lock()
            .unwrap()
            .iter()
            .map(|(key, entry)| PendingConsent {
                integration_key: key.clone(),
                consent_url: entry.consent_url.clone(),
            })
            .collect()
    }

    /// Resolve the pending consent for `integration_key`. Returns false when
    /// nothing is waiting.
    pub fn decide(&self, integration_key: &str, granted: bool) -> bool {
        let entry = self.pending.lock().unwrap().remove(integration_key);
        let Some(entry) = entry else {
            return false;
        };

        let decision = if granted {
            ConsentDecision::Granted
        } else {
            ConsentDecision::Denied
        };
        for waiter in entry.waiters {
            let _ = waiter.send(decision);
        }
        true
    }

    fn register(&self, request: &ConsentRequest) -> oneshot::Receiver<ConsentDecision> {
        let (tx, rx) = oneshot::channel();
        let mut pending = self.pending.lock().unwrap();
        let entry = pending
            .entry(request.integration_key.clone())
            .or_insert_with(|| PendingEntry {
                consent_url: request.consent_url.clone(),
                waiters: Vec::new(),
            });
        entry.waiters.push(tx);
        rx
    }

    /// Drop waiters whose receiving side is gone; remove the entry once no
    /// live waiter remains so it stops showing up as pending.
    fn discard_closed(&self, integration_key: &str) {
        let mut pending = self.pending.lock().unwrap();
        if let Some(entry) = pending.get_mut(integration_key) {
            entry.waiters.retain(|waiter| !waiter.is_closed());
            if entry.waiters.is_empty() {
                pending.remove(integration_key);
            }
        }
    }
}

#[async_trait]
impl ConsentBroker for PendingConsentBroker {
    async fn await_decision(&self, request: ConsentRequest) -> AppResult<ConsentDecision> {
        let rx = self.register(&request);
        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(decision)) => Ok(decision),
            Ok(Err(_)) => Err(AppError::Internal("consent decision channel closed".into())),
            Err(_) => {
                self.discard_closed(&request.integration_key);
                Err(AppError::ConsentRequired {
                    consent_url: request.consent_url,
                })
            }
        }
    }
}
