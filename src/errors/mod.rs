use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::db::StoreError;
use crate::models::envelope::Envelope;
use crate::utils::validation::FileRejection;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FileRejection),
    #[error("Cloudinary upload failed: {0}")]
    Gateway(String),
    #[error("Upload failed - no URL received")]
    NoUrlReturned,
    #[error("Upload failed: {0}")]
    Persistence(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Database Error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl AppError {
    fn message(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Validation failed",
            AppError::Gateway(_) => "Cloudinary upload failed",
            AppError::NoUrlReturned => "Upload failed - no URL received",
            AppError::Persistence(_) => "Upload failed",
            AppError::NotFound(_) => "Not found",
            AppError::DatabaseError(_) => "Internal server error",
        }
    }

    fn errors(&self) -> Map<String, Value> {
        let (key, detail) = match self {
            AppError::Validation(rejection) => ("file", json!([rejection.to_string()])),
            AppError::Gateway(cause) => ("cloudinary", json!(cause)),
            AppError::NoUrlReturned => ("cloudinary", json!("No secure URL returned")),
            AppError::Persistence(cause) | AppError::DatabaseError(cause) => {
                ("server", json!(cause))
            }
            AppError::NotFound(what) => ("detail", json!(what)),
        };
        let mut errors = Map::new();
        errors.insert(key.to_string(), detail);
        errors
    }
}

impl ResponseError for AppError {
    // Gateway failures are reported as client errors, matching the upload contract.
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Gateway(_) | AppError::NoUrlReturned => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Persistence(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(Envelope::failure(self.message(), self.errors()))
    }
}
