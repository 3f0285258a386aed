use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::{consent::pending::PendingConsent, http::app_state::AppState},
    app_error::{AppError, AppResult},
};

#[derive(Serialize)]
struct PendingResponse {
    items: Vec<PendingConsent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecisionPayload {
    integration_key: String,
    granted: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pending", get(pending))
        .route("/decision", post(decision))
}

async fn pending(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(PendingResponse {
        items: app_state.consent_registry.pending(),
    }))
}

async fn decision(
    State(app_state): State<AppState>,
    Json(payload): Json<DecisionPayload>,
) -> AppResult<impl IntoResponse> {
    if app_state
        .consent_registry
        .decide(&payload.integration_key, payload.granted)
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
