//! Asynchronous, cancellable effect.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::error::Error;

type RunFn<T> = dyn Fn(CancellationToken) -> BoxFuture<'static, Result<T, Error>> + Send + Sync;

/// A deferred computation that may suspend and observes a cancellation token.
///
/// The token is handed over when the effect is run and reaches every layer
/// unchanged. Leaf effects built with [`Aff::from_async`] race their work
/// against it; combinators never do, so a cancellation surfaces as a failure
/// that every outer layer still observes.
///
/// # Example
///
/// ```
/// use decorum::Aff;
///
/// # tokio_test::block_on(async {
/// let effect = Aff::from_async(|_cancel| async { Ok(20) }).map(|x| x + 1);
/// assert_eq!(effect.run_standalone().await, Ok(21));
/// # });
/// ```
pub struct Aff<T> {
    run_fn: Arc<RunFn<T>>,
}

impl<T> Clone for Aff<T> {
    fn clone(&self) -> Self {
        Aff {
            run_fn: Arc::clone(&self.run_fn),
        }
    }
}

impl<T> fmt::Debug for Aff<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aff")
            .field("run_fn", &"<function>")
            .finish()
    }
}

impl<T: Send + 'static> Aff<T> {
    pub(crate) fn from_run_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        Aff {
            run_fn: Arc::new(move |cancel| f(cancel).boxed()),
        }
    }

    /// Create an effect from async work.
    ///
    /// The future is raced against the cancellation token. If the token fires
    /// first, or was already cancelled, the effect fails with a cancellation
    /// error and the work is dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use decorum::{Aff, CancellationToken};
    ///
    /// # tokio_test::block_on(async {
    /// let slow = Aff::<u32>::from_async(|_| async {
    ///     tokio::time::sleep(Duration::from_secs(60)).await;
    ///     Ok(1)
    /// });
    ///
    /// let token = CancellationToken::new();
    /// token.cancel();
    /// assert!(slow.run(&token).await.unwrap_err().is_cancelled());
    /// # });
    /// ```
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        Aff::from_run_fn(move |cancel: CancellationToken| {
            let work = f(cancel.clone());
            async move {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(Error::cancelled()),
                    result = work => result,
                }
            }
        })
    }

    /// Create an effect from async work failing with any error type.
    pub fn try_from_async<F, Fut, E>(f: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: StdError + Send + Sync + 'static,
    {
        Aff::from_async(move |cancel| f(cancel).map(|result| result.map_err(Error::from_fault)))
    }

    /// Create an effect from synchronous work.
    ///
    /// Never suspends. A token cancelled before the run starts short-circuits
    /// to a cancellation failure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Result<T, Error> + Send + Sync + 'static,
    {
        Aff::from_run_fn(move |cancel: CancellationToken| {
            let result = if cancel.is_cancelled() {
                Err(Error::cancelled())
            } else {
                f()
            };
            futures::future::ready(result)
        })
    }

    /// Build the effect to run at run time.
    ///
    /// `f` is invoked on every run, never at construction.
    pub fn defer<F>(f: F) -> Self
    where
        F: Fn() -> Aff<T> + Send + Sync + 'static,
    {
        Aff::from_run_fn(move |cancel: CancellationToken| {
            let next = f();
            async move { next.run(&cancel).await }
        })
    }

    /// An effect that succeeds with `value` unless the token is already
    /// cancelled.
    pub fn pure(value: T) -> Self
    where
        T: Clone + Sync,
    {
        Aff::from_fn(move || Ok(value.clone()))
    }

    /// An effect that fails with `error`, or with a cancellation failure if
    /// the token is already cancelled.
    pub fn fail(error: Error) -> Self {
        Aff::from_fn(move || Err(error.clone()))
    }

    /// Execute now, threading `cancel` down to every leaf.
    ///
    /// Produces exactly one result; panics raised inside are returned as
    /// execution failures.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<T, Error> {
        let run_fn = Arc::clone(&self.run_fn);
        let cancel = cancel.clone();
        AssertUnwindSafe(async move { run_fn(cancel).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(Error::panicked(payload)))
    }

    /// Execute with a token that is never cancelled.
    pub async fn run_standalone(&self) -> Result<T, Error> {
        self.run(&CancellationToken::new()).await
    }

    /// Transform the success value.
    pub fn map<U, F>(self, f: F) -> Aff<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Aff::from_run_fn(move |cancel: CancellationToken| {
            let inner = self.clone();
            let f = Arc::clone(&f);
            async move { inner.run(&cancel).await.map(|value| f(value)) }
        })
    }

    /// Chain a dependent effect.
    pub fn and_then<U, F>(self, f: F) -> Aff<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Aff<U> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Aff::from_run_fn(move |cancel: CancellationToken| {
            let inner = self.clone();
            let f = Arc::clone(&f);
            async move {
                let value = inner.run(&cancel).await?;
                f(value).run(&cancel).await
            }
        })
    }

    /// Transform the error value.
    pub fn map_err<F>(self, f: F) -> Aff<T>
    where
        F: Fn(Error) -> Error + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Aff::from_run_fn(move |cancel: CancellationToken| {
            let inner = self.clone();
            let f = Arc::clone(&f);
            async move { inner.run(&cancel).await.map_err(|error| f(error)) }
        })
    }

    /// Observe the success value after the inner effect completed.
    pub fn tap<F>(self, f: F) -> Aff<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Aff::from_run_fn(move |cancel: CancellationToken| {
            let inner = self.clone();
            let f = Arc::clone(&f);
            async move { inner.run(&cancel).await.inspect(|value| f(value)) }
        })
    }

    /// Observe the failure; the error passes through untouched.
    ///
    /// Cancellation failures are observed like any other failure.
    pub fn tap_err<F>(self, f: F) -> Aff<T>
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Aff::from_run_fn(move |cancel: CancellationToken| {
            let inner = self.clone();
            let f = Arc::clone(&f);
            async move { inner.run(&cancel).await.inspect_err(|error| f(error)) }
        })
    }
}
