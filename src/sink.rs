//! Logging sink used by decorators
//!
//! Decorators never talk to a logging backend directly. They emit through a
//! [`LogSink`] handed to them by the composition root. [`TracingSink`] forwards
//! to the `tracing` macros; [`RecordingSink`](crate::testing::RecordingSink)
//! keeps entries in memory for assertions.

use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::identity::Identity;

/// Destination for decorator log entries.
pub trait LogSink: Send + Sync {
    /// Informational entry about `function`.
    fn info(&self, function: &Identity, message: fmt::Arguments<'_>);

    /// Error entry about `function`, carrying the failure.
    fn error(&self, function: &Identity, error: &Error, message: fmt::Arguments<'_>);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn info(&self, function: &Identity, message: fmt::Arguments<'_>) {
        (**self).info(function, message)
    }

    fn error(&self, function: &Identity, error: &Error, message: fmt::Arguments<'_>) {
        (**self).error(function, error, message)
    }
}

/// Sink emitting `tracing` events.
///
/// Info entries become `INFO` events and failures `ERROR` events; both carry
/// the identity in a `function` field. Error events also carry `code`,
/// `error` and `cause` fields.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl LogSink for TracingSink {
    fn info(&self, function: &Identity, message: fmt::Arguments<'_>) {
        tracing::info!(function = %function, "{}", message);
    }

    fn error(&self, function: &Identity, error: &Error, message: fmt::Arguments<'_>) {
        let cause = error.cause().map(|cause| cause.to_string());
        tracing::error!(
            function = %function,
            code = error.code(),
            error = %error,
            cause = ?cause,
            "{}",
            message
        );
    }
}
