use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{endpoint}: {reason}")]
pub struct FetchError {
    pub endpoint: String,
    pub reason: String,
}

impl FetchError {
    pub fn new(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid range: {0}")]
    InvalidRange(String),
    #[error("fetch failed: {0}")]
    FetchFailed(#[from] FetchError),
    #[error("superseded by a newer report load")]
    Superseded,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        let status = match &err {
            ReportError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            ReportError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
            ReportError::Superseded => StatusCode::CONFLICT,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        ReportError::from(err).into()
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
