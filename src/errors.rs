use aws_sdk_sqs::config::http::HttpResponse;
use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for queue service operations.
pub type SqsResult<T> = Result<T, SqsError>;

/// Error types for SQS queue service operations.
///
/// This enum represents all possible errors that can occur while
/// publishing, inspecting or draining an SQS queue.
#[derive(Debug, Error)]
pub enum SqsError {
    /// The queue configuration was rejected during validation.
    ///
    /// This error typically happens when the queue URL, region or the
    /// static credential pair is missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A call to the SQS service failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A message could not be encoded as JSON.
    #[error("failed to serialize message: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A batch handler rejected the messages it was given.
    #[error("batch handler failed: {0}")]
    Handler(String),
}

impl SqsError {
    /// Builds a [`SqsError::Handler`] from a message.
    pub fn handler(message: impl Into<String>) -> Self {
        SqsError::Handler(message.into())
    }

    /// Returns the transport error kind, if this error came from the SQS service.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            SqsError::Transport(err) => Some(err.kind),
            _ => None,
        }
    }
}

/// Closed classification of SQS service failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The queue URL or name does not resolve to an existing queue.
    QueueNotFound,
    /// The caller lacks permission for the requested action.
    AccessDenied,
    /// Any other service, network or request failure.
    Other,
}

impl ErrorKind {
    /// Maps an SQS error code (and the HTTP status, if one was received) to a kind.
    pub fn classify(code: Option<&str>, status: Option<u16>) -> Self {
        match code {
            Some("AWS.SimpleQueueService.NonExistentQueue" | "QueueDoesNotExist") => {
                ErrorKind::QueueNotFound
            }
            Some("AccessDenied" | "AccessDeniedException") => ErrorKind::AccessDenied,
            _ if status == Some(403) => ErrorKind::AccessDenied,
            _ => ErrorKind::Other,
        }
    }
}

/// A failed call to the SQS service, classified at the transport boundary.
#[derive(Debug, Error)]
#[error("{operation} failed ({kind:?}): {message}")]
pub struct TransportError {
    /// The classified failure.
    pub kind: ErrorKind,
    /// The SQS operation that failed, e.g. `ReceiveMessage`.
    pub operation: &'static str,
    /// The service error code, when the service returned one.
    pub code: Option<String>,
    /// Human-readable description of the failure.
    pub message: String,
}

impl TransportError {
    pub fn new(kind: ErrorKind, operation: &'static str, message: impl Into<String>) -> Self {
        TransportError {
            kind,
            operation,
            code: None,
            message: message.into(),
        }
    }

    /// Converts an SDK error into a classified transport error.
    pub fn from_sdk<E>(operation: &'static str, err: SdkError<E, HttpResponse>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
    {
        let code = err.code().map(str::to_string);
        let status = err.raw_response().map(|raw| raw.status().as_u16());

        TransportError {
            kind: ErrorKind::classify(code.as_deref(), status),
            operation,
            code,
            message: DisplayErrorContext(&err).to_string(),
        }
    }
}
