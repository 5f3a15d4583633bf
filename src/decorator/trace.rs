//! Call/return logging decorator.

use std::fmt;
use std::sync::Arc;

use super::Handles;
use crate::effect::Eff;
use crate::function::Function;
use crate::identity::{Identified, Identity};
use crate::sink::LogSink;

#[cfg(feature = "async")]
use crate::effect::Aff;
#[cfg(feature = "async")]
use crate::function::{AsyncFunction, AsyncSupplier};

/// Logs each call of the wrapped function and each successful return.
///
/// The call entry (`"{function} called with {input:?}"`, or
/// `"{function} called"` for suppliers) is written when the effect runs,
/// before the inner function starts. The return entry
/// (`"{function} returned {value:?}"`) is written only on success. Failures
/// pass through untouched and without a return entry.
pub struct Tracing<Fac> {
    handles: Arc<Handles<Fac>>,
    sink: Arc<dyn LogSink>,
}

impl<Fac> Tracing<Fac> {
    /// Wrap the functions produced by `factory`, logging under `identity`.
    pub fn new(identity: impl Into<Identity>, factory: Fac, sink: Arc<dyn LogSink>) -> Self {
        Tracing {
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
        Tracing {
            handles: Arc::new(Handles::unnamed(factory)),
            sink,
        }
    }
}

fn returned<Fac, Inner, O>(
    handles: &Arc<Handles<Fac>>,
    sink: Arc<dyn LogSink>,
) -> impl Fn(&O) + Send + Sync + 'static
where
    Fac: Send + Sync + 'static,
    Inner: 'static,
    O: fmt::Debug,
{
    let handles = Arc::clone(handles);
    move |value: &O| {
        let identity = handles.known::<Inner>();
        sink.info(&identity, format_args!("{} returned {:?}", identity, value))
    }
}

impl<Fac> Clone for Tracing<Fac> {
    fn clone(&self) -> Self {
        Tracing {
            handles: Arc::clone(&self.handles),
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<Fac> fmt::Debug for Tracing<Fac> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracing")
            .field("identity", &self.handles.identity.get())
            .finish()
    }
}

impl<Fac, Inner> Identified for Tracing<Fac>
where
    Fac: Fn() -> Inner,
    Inner: Identified + Send + 'static,
{
    fn identity(&self) -> Identity {
        self.handles.identity()
    }
}

impl<I, O, Fac, Inner> Function<I, O> for Tracing<Fac>
where
    Fac: Fn() -> Inner + Send + Sync + 'static,
    Inner: Function<I, O> + Identified + 'static,
    I: fmt::Debug + Clone + Send + Sync + 'static,
    O: fmt::Debug + 'static,
{
    fn apply(&self, input: I) -> Eff<O> {
        let handles = Arc::clone(&self.handles);
        let sink = Arc::clone(&self.sink);
        Eff::defer(move || {
            let inner = handles.build();
            let identity = handles.observe(&inner);
            sink.info(&identity, format_args!("{} called with {:?}", identity, input));
            inner.apply(input.clone())
        })
        .tap(returned::<Fac, Inner, O>(&self.handles, Arc::clone(&self.sink)))
    }
}

#[cfg(feature = "async")]
impl<I, O, Fac, Inner> AsyncFunction<I, O> for Tracing<Fac>
where
    Fac: Fn() -> Inner + Send + Sync + 'static,
    Inner: AsyncFunction<I, O> + Identified + 'static,
    I: fmt::Debug + Clone + Send + Sync + 'static,
    O: fmt::Debug + Send + 'static,
{
    fn apply(&self, input: I) -> Aff<O> {
        let handles = Arc::clone(&self.handles);
        let sink = Arc::clone(&self.sink);
        Aff::defer(move || {
            let inner = handles.build();
            let identity = handles.observe(&inner);
            sink.info(&identity, format_args!("{} called with {:?}", identity, input));
            inner.apply(input.clone())
        })
        .tap(returned::<Fac, Inner, O>(&self.handles, Arc::clone(&self.sink)))
    }
}

#[cfg(feature = "async")]
impl<O, Fac, Inner> AsyncSupplier<O> for Tracing<Fac>
where
    Fac: Fn() -> Inner + Send + Sync + 'static,
    Inner: AsyncSupplier<O> + Identified + 'static,
    O: fmt::Debug + Send + 'static,
{
    fn apply(&self) -> Aff<O> {
        let handles = Arc::clone(&self.handles);
        let sink = Arc::clone(&self.sink);
        Aff::defer(move || {
            let inner = handles.build();
            let identity = handles.observe(&inner);
            sink.info(&identity, format_args!("{} called", identity));
            inner.apply()
        })
        .tap(returned::<Fac, Inner, O>(&self.handles, Arc::clone(&self.sink)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::function::{from_fn, Validated};
    use crate::testing::{Level, RecordingSink};

    #[derive(Debug, Clone, PartialEq)]
    struct Order {
        id: u32,
    }

    impl crate::validator::Nullable for Order {}

    #[test]
    fn test_logs_call_and_return() {
        let sink = Arc::new(RecordingSink::new());
        let function = Tracing::resolve(
            || Validated::new(from_fn("orders::Total", |order: Order| Eff::pure(order.id * 3))),
            sink.clone(),
        );

        assert_eq!(function.apply(Order { id: 4 }).run(), Ok(12));
        assert_eq!(
            sink.messages(),
            vec![
                "orders::Total called with Order { id: 4 }",
                "orders::Total returned 12",
            ]
        );
        assert!(sink.entries().iter().all(|e| e.level == Level::Info));
    }

    #[test]
    fn test_failure_has_no_return_entry() {
        let sink = Arc::new(RecordingSink::new());
        let function = Tracing::new(
            "orders::Reject",
            || Validated::new(from_fn("orders::Reject", |_: u32| Eff::<u32>::fail(Error::new(3, "no")))),
            sink.clone(),
        );

        assert_eq!(function.apply(8).run(), Err(Error::new(3, "no")));
        assert_eq!(sink.messages(), vec!["orders::Reject called with 8"]);
    }

    #[test]
    fn test_nothing_logged_until_run() {
        let sink = Arc::new(RecordingSink::new());
        let function = Tracing::resolve(
            || Validated::new(from_fn("math::neg", |n: i64| Eff::pure(-n))),
            sink.clone(),
        );

        let effect = function.apply(2);
        assert!(sink.is_empty());
        assert_eq!(effect.run(), Ok(-2));
        assert_eq!(effect.run(), Ok(-2));
        assert_eq!(sink.len(), 4);
    }

    #[cfg(feature = "tracing")]
    #[tracing_test::traced_test]
    #[test]
    fn test_tracing_sink_receives_entries() {
        use crate::sink::TracingSink;

        let function = Tracing::resolve(
            || Validated::new(from_fn("geo::Area", |side: u32| Eff::pure(side * side))),
            Arc::new(TracingSink),
        );
        assert_eq!(function.apply(7).run(), Ok(49));
        assert!(logs_contain("geo::Area called with 7"));
        assert!(logs_contain("geo::Area returned 49"));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_supplier_logs_called_without_input() {
        use crate::function::{from_async_fn, Supplier};

        let sink = Arc::new(RecordingSink::new());
        let function = Tracing::resolve(
            || Supplier::new(from_async_fn("clock::Now", |_: ()| Aff::pure(1_700_000_000u64))),
            sink.clone(),
        );

        assert_eq!(function.apply().run_standalone().await, Ok(1_700_000_000));
        assert_eq!(
            sink.messages(),
            vec!["clock::Now called", "clock::Now returned 1700000000"]
        );
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_supplier_failure_has_no_return_entry() {
        use crate::function::{from_async_fn, Supplier};

        let sink = Arc::new(RecordingSink::new());
        let function = Tracing::resolve(
            || {
                Supplier::new(from_async_fn("clock::Now", |_: ()| {
                    Aff::<u64>::fail(Error::new(12, "clock unavailable"))
                }))
            },
            sink.clone(),
        );

        assert_eq!(
            function.apply().run_standalone().await,
            Err(Error::new(12, "clock unavailable"))
        );
        assert_eq!(sink.messages(), vec!["clock::Now called"]);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_cancelled_supplier_has_no_return_entry() {
        use crate::effect::CancellationToken;
        use crate::function::{from_async_fn, Supplier};

        let sink = Arc::new(RecordingSink::new());
        let function = Tracing::resolve(
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
        assert_eq!(sink.messages(), vec!["clock::Tick called"]);
    }
}
