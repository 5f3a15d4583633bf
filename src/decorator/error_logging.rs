//! Failure logging decorator.

use std::fmt;
use std::sync::Arc;

use super::Handles;
use crate::effect::Eff;
use crate::error::Error;
use crate::function::Function;
use crate::identity::{Identified, Identity};
use crate::sink::LogSink;

#[cfg(feature = "async")]
use crate::effect::Aff;
#[cfg(feature = "async")]
use crate::function::{AsyncFunction, AsyncSupplier};

/// Logs every failure of the wrapped function at error severity.
///
/// Exactly one error entry is emitted per failed run, after the inner effect
/// failed and before the failure reaches the caller. The caller receives the
/// very same [`Error`](crate::Error) value. Successful runs log nothing, and a
/// failure is never turned into a success. Cancellations are failures too and
/// are logged.
pub struct ErrorLogging<Fac> {
    handles: Arc<Handles<Fac>>,
    sink: Arc<dyn LogSink>,
}

impl<Fac> ErrorLogging<Fac> {
    /// Wrap the functions produced by `factory`, logging under `identity`.
    pub fn new(identity: impl Into<Identity>, factory: Fac, sink: Arc<dyn LogSink>) -> Self {
        ErrorLogging {
            handles: Arc::new(Handles::named(identity.into(), factory)),
            sink,
        }
    }

    /// Wrap the functions produced by `factory`, taking the identity from the
    /// innermost concrete logic.
    ///
    /// Nothing is built here. The identity is read from the first inner
    /// handle, and kept for every later run.
    pub fn resolve<Inner>(factory: Fac, sink: Arc<dyn LogSink>) -> Self
    where
        Fac: Fn() -> Inner,
        Inner: Identified,
    {
        ErrorLogging {
            handles: Arc::new(Handles::unnamed(factory)),
            sink,
        }
    }
}

fn failed<Fac, Inner>(
    handles: &Arc<Handles<Fac>>,
    sink: Arc<dyn LogSink>,
) -> impl Fn(&Error) + Send + Sync + 'static
where
    Fac: Send + Sync + 'static,
    Inner: 'static,
{
    let handles = Arc::clone(handles);
    move |error: &Error| {
        let identity = handles.known::<Inner>();
        sink.error(&identity, error, format_args!("{} failed", identity))
    }
}

impl<Fac> Clone for ErrorLogging<Fac> {
    fn clone(&self) -> Self {
        ErrorLogging {
            handles: Arc::clone(&self.handles),
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<Fac> fmt::Debug for ErrorLogging<Fac> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorLogging")
            .field("identity", &self.handles.identity.get())
            .finish()
    }
}

impl<Fac, Inner> Identified for ErrorLogging<Fac>
where
    Fac: Fn() -> Inner,
    Inner: Identified + Send + 'static,
{
    fn identity(&self) -> Identity {
        self.handles.identity()
    }
}

impl<I, O, Fac, Inner> Function<I, O> for ErrorLogging<Fac>
where
    Fac: Fn() -> Inner + Send + Sync + 'static,
    Inner: Function<I, O> + Identified + 'static,
    I: Clone + Send + Sync + 'static,
    O: 'static,
{
    fn apply(&self, input: I) -> Eff<O> {
        let handles = Arc::clone(&self.handles);
        let sink = Arc::clone(&self.sink);
        Eff::defer(move || {
            let inner = handles.build();
            handles.observe(&inner);
            inner.apply(input.clone())
        })
        .tap_err(failed::<Fac, Inner>(&self.handles, sink))
    }
}

#[cfg(feature = "async")]
impl<I, O, Fac, Inner> AsyncFunction<I, O> for ErrorLogging<Fac>
where
    Fac: Fn() -> Inner + Send + Sync + 'static,
    Inner: AsyncFunction<I, O> + Identified + 'static,
    I: Clone + Send + Sync + 'static,
    O: Send + 'static,
{
    fn apply(&self, input: I) -> Aff<O> {
        let handles = Arc::clone(&self.handles);
        let sink = Arc::clone(&self.sink);
        Aff::defer(move || {
            let inner = handles.build();
            handles.observe(&inner);
            inner.apply(input.clone())
        })
        .tap_err(failed::<Fac, Inner>(&self.handles, sink))
    }
}

#[cfg(feature = "async")]
impl<O, Fac, Inner> AsyncSupplier<O> for ErrorLogging<Fac>
where
    Fac: Fn() -> Inner + Send + Sync + 'static,
    Inner: AsyncSupplier<O> + Identified + 'static,
    O: Send + 'static,
{
    fn apply(&self) -> Aff<O> {
        let handles = Arc::clone(&self.handles);
        let sink = Arc::clone(&self.sink);
        Aff::defer(move || {
            let inner = handles.build();
            handles.observe(&inner);
            inner.apply()
        })
        .tap_err(failed::<Fac, Inner>(&self.handles, sink))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::{Error, VALIDATION_ERROR_CODE};
    use crate::function::{from_fn, Validated};
    use crate::testing::{Level, RecordingSink};

    #[derive(Debug, thiserror::Error)]
    #[error("ledger locked")]
    struct LedgerLocked;

    #[test]
    fn test_logs_once_and_returns_same_error() {
        let sink = Arc::new(RecordingSink::new());
        let failure = Error::with_cause(77, "post rejected", LedgerLocked);
        let rejected = failure.clone();
        let function = ErrorLogging::resolve(
            move || {
                let rejected = rejected.clone();
                Validated::new(from_fn("ledger::Post", move |_: u8| {
                    Eff::<u8>::fail(rejected.clone())
                }))
            },
            sink.clone(),
        );

        let result = function.apply(1).run();

        assert_eq!(result, Err(failure.clone()));
        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, Level::Error);
        assert_eq!(entries[0].function.as_str(), "ledger::Post");
        assert_eq!(entries[0].message, "ledger::Post failed");
        let logged = entries[0].error.clone().unwrap();
        assert_eq!(logged, failure);
        assert!(Arc::ptr_eq(logged.cause().unwrap(), failure.cause().unwrap()));
    }

    #[test]
    fn test_success_logs_nothing() {
        let sink = Arc::new(RecordingSink::new());
        let function = ErrorLogging::new(
            "math::inc",
            || Validated::new(from_fn("math::inc", |n: i32| Eff::pure(n + 1))),
            sink.clone(),
        );
        assert_eq!(function.apply(1).run(), Ok(2));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_validation_failure_is_logged() {
        let sink = Arc::new(RecordingSink::new());
        let function = ErrorLogging::resolve(
            || Validated::new(from_fn("opt::id", |n: Option<i32>| Eff::pure(n))),
            sink.clone(),
        );
        let err = function.apply(None).run().unwrap_err();
        assert_eq!(err.code(), VALIDATION_ERROR_CODE);
        assert_eq!(sink.errors().len(), 1);
    }

    #[test]
    fn test_factory_called_per_run_not_per_apply() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let sink = Arc::new(RecordingSink::new());
        let function = ErrorLogging::new(
            "math::id",
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Validated::new(from_fn("math::id", |n: i32| Eff::pure(n)))
            },
            sink,
        );

        let effect = function.apply(5);
        assert_eq!(built.load(Ordering::SeqCst), 0);
        assert_eq!(effect.run(), Ok(5));
        assert_eq!(effect.run(), Ok(5));
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_cancellation_is_logged() {
        use crate::effect::CancellationToken;
        use crate::function::{from_async_fn, AsyncValidated};

        let sink = Arc::new(RecordingSink::new());
        let function = ErrorLogging::resolve(
            || {
                AsyncValidated::new(from_async_fn("jobs::Wait", |_: u8| {
                    Aff::<u8>::from_async(|cancel: CancellationToken| async move {
                        cancel.cancelled().await;
                        Ok(0)
                    })
                }))
            },
            sink.clone(),
        );

        let token = CancellationToken::new();
        token.cancel();
        let err = function.apply(1).run(&token).await.unwrap_err();

        assert!(err.is_cancelled());
        let errors = sink.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error.as_ref(), Some(&err));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_supplier_failure_is_logged_once() {
        use crate::function::{from_async_fn, Supplier};

        let sink = Arc::new(RecordingSink::new());
        let failure = Error::with_cause(12, "clock unavailable", LedgerLocked);
        let rejected = failure.clone();
        let function = ErrorLogging::resolve(
            move || {
                let rejected = rejected.clone();
                Supplier::new(from_async_fn("clock::Now", move |_: ()| {
                    Aff::<u64>::fail(rejected.clone())
                }))
            },
            sink.clone(),
        );

        let err = function.apply().run_standalone().await.unwrap_err();

        assert_eq!(err, failure);
        let errors = sink.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].function.as_str(), "clock::Now");
        assert_eq!(errors[0].message, "clock::Now failed");
        let logged = errors[0].error.clone().unwrap();
        assert!(Arc::ptr_eq(logged.cause().unwrap(), failure.cause().unwrap()));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_cancelled_supplier_is_logged_once() {
        use crate::effect::CancellationToken;
        use crate::function::{from_async_fn, Supplier};

        let sink = Arc::new(RecordingSink::new());
        let function = ErrorLogging::resolve(
            || {
                Supplier::new(from_async_fn("clock::Tick", |_: ()| {
                    Aff::<u64>::from_async(|cancel: CancellationToken| async move {
                        cancel.cancelled().await;
                        Ok(0)
                    })
                }))
            },
            sink.clone(),
        );

        let token = CancellationToken::new();
        token.cancel();
        let err = function.apply().run(&token).await.unwrap_err();

        assert!(err.is_cancelled());
        let errors = sink.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].function.as_str(), "clock::Tick");
        assert_eq!(errors[0].error.as_ref(), Some(&err));
    }
}
