use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        tracing::error!(error = ?self, "Request failed");

        match self {
            AppError::InvalidInput(msg) => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, Some(msg))
            }
            AppError::ConsentRequired { consent_url } => {
                let body = serde_json::json!({
                    "code": ErrorCode::ConsentRequired.as_str(),
                    "consentUrl": consent_url,
                });
                (StatusCode::CONFLICT, Json(body)).into_response()
            }
            AppError::ConsentDenied => {
                error_resp(StatusCode::FORBIDDEN, ErrorCode::ConsentDenied, None)
            }
            AppError::AuthFailed { status, .. } => error_resp(
                StatusCode::BAD_GATEWAY,
                ErrorCode::AuthFailed,
                Some(format!("authorization server returned status {status}")),
            ),
            AppError::NoDefaultAccount => {
                error_resp(StatusCode::BAD_GATEWAY, ErrorCode::NoDefaultAccount, None)
            }
            AppError::Esign { status, .. } => error_resp(
                StatusCode::BAD_GATEWAY,
                ErrorCode::EsignError,
                Some(format!("e-signature API returned status {status}")),
            ),
            AppError::NotFound => error_resp(StatusCode::NOT_FOUND, ErrorCode::NotFound, None),
            AppError::Internal(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                None,
            ),
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: Option<String>) -> Response {
    let body = match message {
        Some(msg) => serde_json::json!({ "code": code.as_str(), "message": msg }),
        None => serde_json::json!({ "code": code.as_str() }),
    };
    (status, Json(body)).into_response()
}
