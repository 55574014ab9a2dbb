//! Error types for the weather API client.
//!
//! # Design
//! Every failure ends up as a single line of text in the form's status
//! message, so `Display` is the user-facing rendering. A non-2xx response
//! displays the server's `detail` when the operation honours it, otherwise
//! the operation's generic failure text.

use thiserror::Error;

/// The API operation a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Get,
    Update,
    Delete,
}

impl Operation {
    /// Fallback text when the server gives no usable detail.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Create => "Failed to submit weather data",
            Operation::List | Operation::Get => "Failed to fetch weather data",
            Operation::Update => "Failed to update weather data",
            Operation::Delete => "Failed to delete weather data",
        }
    }

    /// Reads return a generic error; mutations pass the server detail on.
    pub fn uses_detail(&self) -> bool {
        matches!(self, Operation::Create | Operation::Update | Operation::Delete)
    }
}

/// Errors returned by `WeatherClient` parse methods and by transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{}", status_text(.operation, .detail))]
    Status {
        operation: Operation,
        status: u16,
        detail: Option<String>,
    },

    /// The request never reached the server or the response never arrived.
    #[error("{0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("unexpected response body: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request: {0}")]
    Serialization(String),
}

fn status_text<'a>(operation: &Operation, detail: &'a Option<String>) -> &'a str {
    detail.as_deref().unwrap_or(operation.failure_message())
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
