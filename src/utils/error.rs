use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Sanity error: {0}")]
    Sanity(String),

    /// Erro da API de voos no formato documentado `{meta, errors}`
    #[error("Duffel API error (status {status}, {} errors)", .errors.len())]
    Upstream { status: u16, errors: Vec<Value> },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::Sanity(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::NotFound(msg) | AppError::Validation(msg) => {
                serde_json::json!({ "error": msg })
            }
            AppError::Sanity(_) => serde_json::json!({ "error": "Error fetching data from Sanity" }),
            AppError::Upstream { errors, .. } => serde_json::json!({ "errors": errors }),
            AppError::Internal(_) => serde_json::json!({ "error": "Server error" }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
