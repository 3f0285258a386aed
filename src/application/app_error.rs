use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Consent required; grant it at {consent_url}")]
    ConsentRequired { consent_url: String },

    #[error("Consent not granted")]
    ConsentDenied,

    #[error("Authentication failed with status {status}: {detail}")]
    AuthFailed { status: u16, detail: String },

    #[error("No default account for the delegated user")]
    NoDefaultAccount,

    #[error("E-signature API returned status {status}: {detail}")]
    Esign { status: u16, detail: String },

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    InvalidInput,
    ConsentRequired,
    ConsentDenied,
    AuthFailed,
    NoDefaultAccount,
    EsignError,
    NotFound,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::ConsentRequired => "CONSENT_REQUIRED",
            ErrorCode::ConsentDenied => "CONSENT_DENIED",
            ErrorCode::AuthFailed => "AUTH_FAILED",
            ErrorCode::NoDefaultAccount => "NO_DEFAULT_ACCOUNT",
            ErrorCode::EsignError => "ESIGN_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
