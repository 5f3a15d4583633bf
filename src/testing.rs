//! Testing utilities for functions and decorators
//!
//! [`RecordingSink`] is a [`LogSink`] that keeps every entry in memory so
//! tests can assert on what a decorator logged, in order. The assertion
//! macros check effect outcomes by error code.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use decorum::prelude::*;
//! use decorum::function::from_fn;
//! use decorum::testing::RecordingSink;
//! use decorum::{assert_err_code, assert_ok};
//!
//! let sink = Arc::new(RecordingSink::new());
//! let function = ErrorLogging::resolve(
//!     || Validated::new(from_fn("id", |n: Option<u8>| Eff::pure(n))),
//!     sink.clone(),
//! );
//!
//! assert_ok!(function.apply(Some(1)).run());
//! assert_err_code!(function.apply(None).run(), VALIDATION_ERROR_CODE);
//! assert_eq!(sink.messages(), vec!["id failed"]);
//! ```

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use crate::error::Error;
use crate::identity::Identity;
use crate::sink::LogSink;

/// Severity of a recorded entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Written through [`LogSink::info`].
    Info,
    /// Written through [`LogSink::error`].
    Error,
}

/// One entry captured by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Severity.
    pub level: Level,
    /// Identity the entry was logged under.
    pub function: Identity,
    /// Rendered message.
    pub message: String,
    /// Failure carried by error entries.
    pub error: Option<Error>,
}

/// In-memory sink recording entries in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        // a panicking test must not hide what was logged before it
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, entry: LogEntry) {
        self.lock().push(entry);
    }

    /// Snapshot of all entries.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Rendered messages of all entries.
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.message.clone()).collect()
    }

    /// Entries at [`Level::Info`].
    pub fn infos(&self) -> Vec<LogEntry> {
        self.at(Level::Info)
    }

    /// Entries at [`Level::Error`].
    pub fn errors(&self) -> Vec<LogEntry> {
        self.at(Level::Error)
    }

    fn at(&self, level: Level) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget all entries.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl LogSink for RecordingSink {
    fn info(&self, function: &Identity, message: fmt::Arguments<'_>) {
        self.push(LogEntry {
            level: Level::Info,
            function: function.clone(),
            message: message.to_string(),
            error: None,
        });
    }

    fn error(&self, function: &Identity, error: &Error, message: fmt::Arguments<'_>) {
        self.push(LogEntry {
            level: Level::Error,
            function: function.clone(),
            message: message.to_string(),
            error: Some(error.clone()),
        });
    }
}

/// Assert that an effect outcome is `Ok`, evaluating to the value.
///
/// # Example
///
/// ```rust
/// use decorum::{assert_ok, Eff};
///
/// let value = assert_ok!(Eff::pure(3).run());
/// assert_eq!(value, 3);
/// ```
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            ::core::result::Result::Ok(value) => value,
            ::core::result::Result::Err(e) => {
                panic!("Expected Ok, got Err: {:?}", e);
            }
        }
    };
}

/// Assert that an effect outcome failed with the given error code,
/// evaluating to the error.
///
/// # Example
///
/// ```rust
/// use decorum::{assert_err_code, Eff, Error};
///
/// let error = assert_err_code!(Eff::<()>::fail(Error::new(7, "no")).run(), 7);
/// assert_eq!(error.message(), "no");
/// ```
#[macro_export]
macro_rules! assert_err_code {
    ($result:expr, $code:expr) => {
        match $result {
            ::core::result::Result::Err(e) => {
                assert_eq!(e.code(), $code, "unexpected error code in {:?}", e);
                e
            }
            ::core::result::Result::Ok(value) => {
                panic!("Expected Err with code {}, got Ok: {:?}", $code, value);
            }
        }
    };
}

/// Assert that an effect outcome failed input validation with exactly the
/// given rule messages, in order.
///
/// # Example
///
/// ```rust
/// use decorum::assert_field_errors;
/// use decorum::prelude::*;
/// use decorum::function::from_fn;
///
/// struct Shout;
///
/// impl Logic for Shout {
///     type Input = String;
///     type Output = String;
///
///     fn rules(&self, rules: &mut Rules<String>) {
///         rules.rule("text", |s: &String| !s.is_empty(), "text must not be empty");
///     }
///
///     fn call(&self, input: String) -> Eff<String> {
///         Eff::pure(input.to_uppercase())
///     }
/// }
///
/// let shout = Validated::new(Shout);
/// assert_field_errors!(shout.apply(String::new()).run(), ["text must not be empty"]);
/// ```
#[macro_export]
macro_rules! assert_field_errors {
    ($result:expr, [$($message:expr),* $(,)?]) => {
        match $result {
            ::core::result::Result::Err(e) => {
                assert_eq!(e.code(), $crate::VALIDATION_ERROR_CODE, "not a validation failure: {:?}", e);
                let actual: ::std::vec::Vec<&str> = e
                    .field_errors()
                    .unwrap_or_default()
                    .iter()
                    .map(|f| f.message())
                    .collect();
                let expected: ::std::vec::Vec<&str> = ::std::vec![$($message),*];
                assert_eq!(actual, expected);
            }
            ::core::result::Result::Ok(value) => {
                panic!("Expected validation failure, got Ok: {:?}", value);
            }
        }
    };
}
