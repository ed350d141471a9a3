//! Error types shared by delivery and validation.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Status code used for client-caused failures.
pub const BAD_REQUEST: u16 = 400;

/// A failure expressed the way an HTTP response would carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{title}")]
pub struct HttpError {
    pub status: u16,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HttpError {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            detail: None,
        }
    }

    pub fn bad_request(title: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            detail,
            ..Self::new(BAD_REQUEST, title)
        }
    }
}

/// Why a static delivery did not complete.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The request path normalizes to somewhere outside the sandbox root.
    #[error("Illegal path: {requested}")]
    IllegalPath { requested: String },

    #[error("Unable to open file {}: {source}", .path.display())]
    FileUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File not found: {} is a directory", .path.display())]
    IsADirectory { path: PathBuf },

    /// Headers were already written when the body transfer failed.
    #[error("stream failure: {0}")]
    StreamFailure(#[source] io::Error),
}

impl DeliveryError {
    /// The response for failures detected before headers were written.
    ///
    /// Returns `None` for [`DeliveryError::StreamFailure`]: the response is
    /// already under way and can only be aborted.
    pub fn http_error(&self) -> Option<HttpError> {
        match self {
            DeliveryError::IllegalPath { .. } => {
                Some(HttpError::bad_request("Illegal path", None))
            }
            DeliveryError::FileUnavailable { source, .. } => Some(HttpError::bad_request(
                "Unable to open file",
                Some(source.to_string()),
            )),
            DeliveryError::IsADirectory { .. } => {
                Some(HttpError::bad_request("File not found", None))
            }
            DeliveryError::StreamFailure(_) => None,
        }
    }
}

/// A folded predicate rejected a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation error: {value} {description}")]
pub struct ValidationError {
    pub status: u16,
    /// The offending value, serialized as JSON.
    pub value: String,
    /// Description of the predicate that failed.
    pub description: String,
}

impl ValidationError {
    pub fn http_error(&self) -> HttpError {
        HttpError::new(self.status, self.to_string())
    }
}
