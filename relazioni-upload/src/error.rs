//! Error types for relazioni-upload
//!
//! The `Display` text of every variant is the reason shown to the user after
//! the `Errore: ` prefix, so it carries no prefix of its own.

use relazioni_common::api::ErrorBody;
use std::path::PathBuf;
use thiserror::Error;

/// Submission and download errors
#[derive(Debug, Error)]
pub enum UploadError {
    /// Request never produced a response (connection refused, DNS, timeout)
    #[error("{0}")]
    Network(String),

    /// Server answered with a non-2xx status
    #[error("{message}")]
    Server { status: u16, message: String },

    /// 2xx response whose body is not the expected JSON
    #[error("Risposta non valida dal server: {0}")]
    Parse(String),

    /// Selected file could not be read before sending
    #[error("Impossibile leggere {}: {reason}", .path.display())]
    FileRead { path: PathBuf, reason: String },

    /// Base URL or endpoint could not be built
    #[error("URL non valido: {0}")]
    InvalidUrl(String),

    /// Report name does not name a file
    #[error("Nome report non valido: {0}")]
    InvalidReportName(String),

    /// Writing a downloaded report failed
    #[error("Errore di scrittura: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Build the error for a non-2xx response
    ///
    /// The message is the body's `error` field when present, otherwise it is
    /// synthesized from the status code.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("Errore server {}", status));
        UploadError::Server { status, message }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::Network(err.to_string())
    }
}
