//! Scripted mock implementation of the envelope API port.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    domain::entities::access_grant::AccessGrant,
    use_cases::signing::{
        EnvelopeApi, EnvelopeDetails, EnvelopeRequest, EsignApiError, RecipientViewParams,
    },
};

/// Envelope API that replays scripted results and records every call.
#[derive(Default)]
pub struct ScriptedEnvelopeApi {
    create_results: Mutex<VecDeque<Result<String, EsignApiError>>>,
    view_results: Mutex<VecDeque<Result<String, EsignApiError>>>,
    envelope_results: Mutex<VecDeque<Result<EnvelopeDetails, EsignApiError>>>,
    created: Mutex<Vec<(AccessGrant, EnvelopeRequest)>>,
    views: Mutex<Vec<(String, RecipientViewParams)>>,
    fetched: Mutex<Vec<String>>,
}

impl ScriptedEnvelopeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_create(self, result: Result<String, EsignApiError>) -> Self {
        self.create_results.lock().unwrap().push_back(result);
        self
    }

    pub fn with_view(self, result: Result<String, EsignApiError>) -> Self {
        self.view_results.lock().unwrap().push_back(result);
        self
    }

    pub fn with_envelope(self, result: Result<EnvelopeDetails, EsignApiError>) -> Self {
        self.envelope_results.lock().unwrap().push_back(result);
        self
    }

    pub fn created(&self) -> Vec<(AccessGrant, EnvelopeRequest)> {
        self.created.lock().unwrap().clone()
    }

    pub fn views(&self) -> Vec<(String, RecipientViewParams)> {
        self.views.lock().unwrap().clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl EnvelopeApi for ScriptedEnvelopeApi {
    async fn create_envelope(
        &self,
        grant: &AccessGrant,
        request: &EnvelopeRequest,
    ) -> Result<String, EsignApiError> {
        self.created
            .lock()
            .unwrap()
            .push((grant.clone(), request.clone()));
        self.create_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected create_envelope call")
    }

    async fn create_recipient_view(
        &self,
        _grant: &AccessGrant,
        envelope_id: &str,
        view: &RecipientViewParams,
    ) -> Result<String, EsignApiError> {
        self.views
            .lock()
            .unwrap()
            .push((envelope_id.to_string(), view.clone()));
        self.view_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected create_recipient_view call")
    }

    async fn envelope(
        &self,
        _grant: &AccessGrant,
        envelope_id: &str,
    ) -> Result<EnvelopeDetails, EsignApiError> {
        self.fetched.lock().unwrap().push(envelope_id.to_string());
        self.envelope_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected envelope call")
    }
}
