use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
pub enum AppError {
    UnsupportedFormat(String),
    DecodeError(String),
    SchemaError(Vec<String>),
    InferenceError(String),
    ConfigError(String),
    IoError(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::UnsupportedFormat(_) => write!(f, "File must be xlsx or csv format"),
            AppError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            AppError::SchemaError(missing) => write!(
                f,
                "File must contain description, equipment_description and systeme columns (missing: {})",
                missing.join(", ")
            ),
            AppError::InferenceError(msg) => write!(f, "Inference error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::DecodeError(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
