use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// The caller supplied a missing or malformed argument.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A referenced item or list does not exist, or a relationship between
    /// them (ownership, membership) does not hold.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Machine-readable description of a domain error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub error_type: String,
    pub message: String,
}

impl AppError {
    pub fn invalid_data(message: impl Into<String>) -> Self {
        AppError::InvalidData(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::ItemNotFound(message.into())
    }

    /// True for errors caused by the request itself rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::InvalidData(_) | AppError::ItemNotFound(_))
    }

    /// Payload for structured callers. Storage failures carry none.
    pub fn payload(&self) -> Option<ErrorPayload> {
        let (error_type, message) = match self {
            AppError::InvalidData(message) => ("InvalidDataException", message),
            AppError::ItemNotFound(message) => ("ItemNotFoundException", message),
            AppError::Storage(_) => return None,
        };

        Some(ErrorPayload {
            error_type: error_type.to_string(),
            message: message.clone(),
        })
    }
}
