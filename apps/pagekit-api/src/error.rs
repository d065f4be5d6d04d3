//! Error types for the pagekit API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pagekit_core::PageError;
use pagekit_pdf::PdfError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Pdf(PdfError),
}

impl From<PdfError> for ApiError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::Page(page) => ApiError::Page(page),
            other => ApiError::Pdf(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) | ApiError::Page(_) => StatusCode::BAD_REQUEST,
            ApiError::Pdf(PdfError::IncorrectPassword) => StatusCode::BAD_REQUEST,
            ApiError::Pdf(PdfError::Parse(_) | PdfError::Encrypted | PdfError::Decryption(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Pdf(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error class for clients
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "bad_request",
            ApiError::Page(e) => e.kind().as_str(),
            ApiError::Pdf(PdfError::Parse(_)) => "parse",
            ApiError::Pdf(PdfError::Encrypted | PdfError::Decryption(_)) => "encrypted",
            ApiError::Pdf(PdfError::IncorrectPassword) => "password",
            ApiError::Pdf(_) => "operation",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Pdf(PdfError::Operation(e)) => {
                tracing::error!("PDF operation failed: {}", e);
                "PDF operation failed".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "kind": self.kind(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
