use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

use crate::domain::error::{AppError, Result};

/// Every endpoint answers with either its payload or `{"error": message}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApiOutcome<T> {
    Success(T),
    Failure { error: String },
}

impl<T> From<Result<T>> for ApiOutcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(payload) => ApiOutcome::Success(payload),
            Err(err) => ApiOutcome::Failure {
                error: err.to_string(),
            },
        }
    }
}

/// Status for a failed request. Always 200 unless strict codes are enabled.
pub fn status_for(err: &AppError, strict: bool) -> StatusCode {
    if !strict {
        return StatusCode::OK;
    }
    match err {
        AppError::UnsupportedFormat(_) | AppError::DecodeError(_) | AppError::SchemaError(_) => {
            StatusCode::BAD_REQUEST
        }
        AppError::InferenceError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::ConfigError(_) | AppError::IoError(_) | AppError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn respond<T: Serialize>(result: Result<T>, strict: bool) -> HttpResponse {
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(err) => status_for(err, strict),
    };
    HttpResponse::build(status).json(ApiOutcome::from(result))
}
