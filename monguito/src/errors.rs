use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for Monguito operations
///
/// The kinds fall into three families. Usage errors are raised before any
/// storage mutation, state errors signal a stale [crate::collection::Document]
/// handle, and invariant violations signal that a collection index and the
/// documents it lists have drifted apart.
///
/// # Examples
///
/// ```rust,ignore
/// use monguito::errors::{MonguitoError, ErrorKind, MonguitoResult};
///
/// fn example() -> MonguitoResult<()> {
///     Err(MonguitoError::new("_id:7 doesn't exist", ErrorKind::NotFound))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Usage Errors
    /// An argument has the wrong shape (e.g. a non-object document)
    InvalidArgument,
    /// The provided document id is neither a natural number nor a UUID v4
    InvalidId,
    /// The query criterion is malformed
    InvalidCriterion,
    /// The sort expression is malformed
    InvalidSortExpression,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// The collection name is not a valid identifier token
    InvalidCollectionName,
    /// The storage handle does not honour the key/value contract
    InvalidStorage,
    /// The collection was not declared when the store was opened
    CollectionNotFound,

    // State Errors
    /// The document is no longer listed in its collection
    NotFound,

    // Invariant Violations
    /// The collection index is unreadable or lists a missing document
    IndexCorrupted,

    // Plumbing
    /// Error encoding or decoding JSON
    EncodingError,
    /// Error from the storage backend
    BackendError,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "Invalid argument"),
            ErrorKind::InvalidId => write!(f, "Invalid ID"),
            ErrorKind::InvalidCriterion => write!(f, "Invalid criterion"),
            ErrorKind::InvalidSortExpression => write!(f, "Invalid sort expression"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InvalidCollectionName => write!(f, "Invalid collection name"),
            ErrorKind::InvalidStorage => write!(f, "Invalid storage"),
            ErrorKind::CollectionNotFound => write!(f, "Collection not found"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::IndexCorrupted => write!(f, "Index corrupted"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

impl ErrorKind {
    /// Returns `true` for kinds raised by argument validation.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidArgument
                | ErrorKind::InvalidId
                | ErrorKind::InvalidCriterion
                | ErrorKind::InvalidSortExpression
                | ErrorKind::InvalidOperation
                | ErrorKind::InvalidCollectionName
                | ErrorKind::InvalidStorage
                | ErrorKind::CollectionNotFound
        )
    }
}

/// Custom Monguito error type.
///
/// `MonguitoError` carries a message, a kind, an optional cause and the
/// backtrace captured where it was created.
///
/// # Examples
///
/// ```rust,ignore
/// use monguito::errors::{MonguitoError, ErrorKind};
///
/// let err = MonguitoError::new("invalid _id value", ErrorKind::InvalidId);
///
/// let cause = MonguitoError::new("unexpected end of input", ErrorKind::EncodingError);
/// let err = MonguitoError::new_with_cause("index unreadable", ErrorKind::IndexCorrupted, cause);
/// ```
#[derive(Clone)]
pub struct MonguitoError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<MonguitoError>>,
    backtrace: Atomic<Backtrace>,
}

impl MonguitoError {
    /// Creates a new `MonguitoError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        MonguitoError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `MonguitoError` chained to the error that caused it.
    pub fn new_with_cause(message: &str, error_type: ErrorKind, cause: MonguitoError) -> Self {
        MonguitoError {
            message: message.to_string(),
            error_kind: error_type,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&MonguitoError> {
        self.cause.as_deref()
    }
}

impl Display for MonguitoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for MonguitoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for MonguitoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for Monguito operations.
pub type MonguitoResult<T> = Result<T, MonguitoError>;

impl From<serde_json::Error> for MonguitoError {
    fn from(err: serde_json::Error) -> Self {
        MonguitoError::new(&format!("JSON error: {}", err), ErrorKind::EncodingError)
    }
}

impl From<String> for MonguitoError {
    fn from(msg: String) -> Self {
        MonguitoError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for MonguitoError {
    fn from(msg: &str) -> Self {
        MonguitoError::new(msg, ErrorKind::InternalError)
    }
}
