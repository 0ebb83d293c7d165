//! Error types for the Abitus and imgBB clients.
//!
//! # Design
//! `ApiError` keeps the four failure families apart (transport, status,
//! envelope shape, decoding) so the store can pick the most useful message
//! for the user. The facade does not interpret status codes: every non-2xx
//! response lands in `HttpError` with the raw body and, when the server sent
//! one, its `message` field.

use thiserror::Error;

/// Shown when an endpoint answers 2xx with an envelope missing its payload.
pub const INVALID_DATA_STRUCTURE: &str = "Estrutura de dados inválida";

/// Shown when an image upload fails without a usable error envelope.
pub const UPLOAD_FAILED: &str = "Falha no upload da imagem";

/// Errors produced while talking to the Abitus API.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError {
        status: u16,
        body: String,
        message: Option<String>,
    },

    /// The response succeeded but its envelope lacks the expected payload.
    #[error("{0}")]
    InvalidShape(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

impl ApiError {
    pub fn invalid_shape() -> Self {
        ApiError::InvalidShape(INVALID_DATA_STRUCTURE.to_string())
    }

    /// The server-supplied `message`, if the error carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::HttpError {
                message: Some(m), ..
            } if !m.is_empty() => Some(m),
            _ => None,
        }
    }

    /// Message suitable for display: the server's message first, then this
    /// error's own description.
    pub fn user_message(&self) -> String {
        match self.server_message() {
            Some(m) => m.to_string(),
            None => self.to_string(),
        }
    }

    /// Like `user_message`, falling back to `default` when both sources are
    /// empty.
    pub fn user_message_or(&self, default: &str) -> String {
        let message = self.user_message();
        if message.trim().is_empty() {
            default.to_string()
        } else {
            message
        }
    }
}

/// An image upload failed. Carries a single human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UploadError {
    pub message: String,
}

impl UploadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn generic() -> Self {
        Self::new(UPLOAD_FAILED)
    }
}
