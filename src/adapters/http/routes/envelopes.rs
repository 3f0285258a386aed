use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    use_cases::signing::EnvelopeDetails,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendPayload {
    #[serde(default)]
    user_email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    message: &'static str,
    envelope_id: String,
    recipient_view_url: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send", post(send))
        .route("/envelopes/{envelope_id}", get(envelope_status))
}

async fn send(
    State(app_state): State<AppState>,
    Json(payload): Json<SendPayload>,
) -> AppResult<impl IntoResponse> {
    let email = payload.user_email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::InvalidInput("userEmail is required".into()));
    }

    let receipt = app_state
        .signing_use_cases
        .send_for_signature(email)
        .await?;

    Ok((
        StatusCode::OK,
        Json(SendResponse {
            message: "Document sent successfully for signature",
            envelope_id: receipt.envelope_id,
            recipient_view_url: receipt.recipient_view_url,
        }),
    ))
}

async fn envelope_status(
    State(app_state): State<AppState>,
    Path(envelope_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let details: EnvelopeDetails = app_state
        .signing_use_cases
        .envelope_status(&envelope_id)
        .await?;
    Ok(Json(details))
}
