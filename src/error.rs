//! Error model shared by every function and effect
//!
//! A failed computation is always described by an [`Error`]: a numeric code, a
//! message, and an optional underlying fault. The fault is shared behind an
//! `Arc`, so cloning an `Error` keeps its identity. Decorators that observe a
//! failure hand the same value back to the caller.
//!
//! # Examples
//!
//! ```
//! use decorum::error::{Error, ErrorKind, VALIDATION_ERROR_CODE};
//!
//! let err = Error::validation("Input could not be null");
//! assert_eq!(err.code(), VALIDATION_ERROR_CODE);
//! assert_eq!(err.kind(), ErrorKind::Validation);
//!
//! let copy = err.clone();
//! assert_eq!(copy, err);
//! ```

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::validator::FieldError;

/// Reserved code for every validation failure (null input or rule failure).
pub const VALIDATION_ERROR_CODE: i32 = 1_000_001;

/// Message carried by the process-wide validation error constant.
pub const VALIDATION_ERROR_MESSAGE: &str = "Validation error";

/// Code for faults raised by the concrete logic of a function.
pub const EXECUTION_ERROR_CODE: i32 = 1_000_002;

/// Code for async effects stopped by their cancellation token.
pub const CANCELLED_ERROR_CODE: i32 = 1_000_003;

/// Message used when a function receives a null input.
pub const NULL_INPUT_MESSAGE: &str = "Input could not be null";

/// A shared, type-erased underlying fault.
pub type Fault = Arc<dyn StdError + Send + Sync + 'static>;

/// The process-wide validation error.
///
/// Initialised once and never mutated. Per-call failures reuse its code and
/// carry their own message.
pub fn validation_error() -> &'static Error {
    static VALIDATION_ERROR: OnceLock<Error> = OnceLock::new();
    VALIDATION_ERROR.get_or_init(|| Error::new(VALIDATION_ERROR_CODE, VALIDATION_ERROR_MESSAGE))
}

/// Classification of an [`Error`], derived from its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Null input or failed input rules.
    Validation,
    /// A fault raised while the concrete logic executed.
    Execution,
    /// The cancellation token fired before the effect completed.
    Cancelled,
    /// A code chosen by the concrete logic itself.
    Other,
}

/// A structured failure: code, message and optional cause.
#[derive(Clone)]
pub struct Error {
    code: i32,
    message: String,
    cause: Option<Fault>,
}

impl Error {
    /// Create an error without an underlying cause.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Error {
            code,
            message: message.into(),
            cause: None,
        }
    }

    /// Create an error with an underlying cause.
    pub fn with_cause<F>(code: i32, message: impl Into<String>, cause: F) -> Self
    where
        F: StdError + Send + Sync + 'static,
    {
        Error {
            code,
            message: message.into(),
            cause: Some(Arc::new(cause)),
        }
    }

    /// Create an error sharing an existing cause.
    pub fn with_shared_cause(code: i32, message: impl Into<String>, cause: Fault) -> Self {
        Error {
            code,
            message: message.into(),
            cause: Some(cause),
        }
    }

    /// A validation failure with the reserved code and no cause.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::new(validation_error().code, message)
    }

    /// A validation failure carrying the ordered field errors as its cause.
    pub fn invalid_input(type_name: &str, errors: Vec<FieldError>) -> Self {
        Error::with_cause(
            validation_error().code,
            format!("Validation failed for {}", type_name),
            ValidationFailure { errors },
        )
    }

    /// Wrap an arbitrary fault raised by concrete logic.
    ///
    /// A fault that already is an [`Error`] is returned unchanged.
    pub fn from_fault<F>(fault: F) -> Self
    where
        F: StdError + Send + Sync + 'static,
    {
        if let Some(error) = (&fault as &dyn Any).downcast_ref::<Error>() {
            return error.clone();
        }
        Error::with_cause(EXECUTION_ERROR_CODE, fault.to_string(), fault)
    }

    /// The failure reported when a cancellation token fires.
    pub fn cancelled() -> Self {
        Error::with_cause(CANCELLED_ERROR_CODE, "Operation was cancelled", Cancelled)
    }

    /// Convert a caught panic payload into an execution failure.
    pub fn panicked(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Error::with_cause(
            EXECUTION_ERROR_CODE,
            format!("Function panicked: {}", message),
            Panicked { message },
        )
    }

    /// Numeric error code.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Underlying fault, if any.
    pub fn cause(&self) -> Option<&Fault> {
        self.cause.as_ref()
    }

    /// Classify this error by its code.
    pub fn kind(&self) -> ErrorKind {
        match self.code {
            VALIDATION_ERROR_CODE => ErrorKind::Validation,
            EXECUTION_ERROR_CODE => ErrorKind::Execution,
            CANCELLED_ERROR_CODE => ErrorKind::Cancelled,
            _ => ErrorKind::Other,
        }
    }

    /// Returns `true` for cancellation failures.
    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }

    /// Field errors of a failed rule check, in rule registration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use decorum::error::Error;
    /// use decorum::validator::FieldError;
    ///
    /// let err = Error::invalid_input("User", vec![FieldError::new("name", "name must not be empty")]);
    /// let errors = err.field_errors().unwrap();
    /// assert_eq!(errors[0].message(), "name must not be empty");
    /// ```
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        self.cause
            .as_deref()
            .and_then(|cause| cause.downcast_ref::<ValidationFailure>())
            .map(|failure| failure.errors.as_slice())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("code", &self.code)
            .field("message", &self.message)
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

// Causes compare by identity.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        let same_cause = match (&self.cause, &other.cause) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.code == other.code && self.message == other.message && same_cause
    }
}

impl Eq for Error {}

/// Cause of a failed rule check: the ordered list of field errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed: {}", format_field_errors(.errors))]
pub struct ValidationFailure {
    /// Field errors in rule registration order.
    pub errors: Vec<FieldError>,
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field(), e.message()))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Cause of a cancellation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cancellation requested")]
pub struct Cancelled;

/// Cause of a panic caught at an effect boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("panic: {message}")]
pub struct Panicked {
    /// Panic payload rendered as text.
    pub message: String,
}
