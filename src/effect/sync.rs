//! Synchronous effect.

use std::error::Error as StdError;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::Error;

type RunFn<T> = dyn Fn() -> Result<T, Error> + Send + Sync;

/// A deferred computation that runs on the caller's thread.
///
/// `Eff` never suspends. Do not use it for logic that blocks indefinitely.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use decorum::Eff;
///
/// let calls = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&calls);
/// let effect = Eff::from_fn(move || Ok(counter.fetch_add(1, Ordering::SeqCst)));
///
/// assert_eq!(calls.load(Ordering::SeqCst), 0);
/// assert_eq!(effect.run(), Ok(0));
/// assert_eq!(effect.run(), Ok(1));
/// ```
pub struct Eff<T> {
    run_fn: Arc<RunFn<T>>,
}

impl<T> Clone for Eff<T> {
    fn clone(&self) -> Self {
        Eff {
            run_fn: Arc::clone(&self.run_fn),
        }
    }
}

impl<T> fmt::Debug for Eff<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Eff")
            .field("run_fn", &"<function>")
            .finish()
    }
}

impl<T: 'static> Eff<T> {
    /// Create an effect from a fallible closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Result<T, Error> + Send + Sync + 'static,
    {
        Eff {
            run_fn: Arc::new(f),
        }
    }

    /// Create an effect from a closure failing with any error type.
    ///
    /// Failures become execution errors carrying the original fault as cause.
    pub fn try_from_fn<F, E>(f: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        E: StdError + Send + Sync + 'static,
    {
        Eff::from_fn(move || f().map_err(Error::from_fault))
    }

    /// Build the effect to run at run time.
    ///
    /// `f` is invoked on every run, never at construction.
    pub fn defer<F>(f: F) -> Self
    where
        F: Fn() -> Eff<T> + Send + Sync + 'static,
    {
        Eff::from_fn(move || f().run())
    }

    /// An effect that always succeeds with `value`.
    pub fn pure(value: T) -> Self
    where
        T: Clone + Send + Sync,
    {
        Eff::from_fn(move || Ok(value.clone()))
    }

    /// An effect that always fails with `error`.
    pub fn fail(error: Error) -> Self {
        Eff::from_fn(move || Err(error.clone()))
    }

    /// Lift an already computed result.
    pub fn from_result(result: Result<T, Error>) -> Self
    where
        T: Clone + Send + Sync,
    {
        match result {
            Ok(value) => Eff::pure(value),
            Err(error) => Eff::fail(error),
        }
    }

    /// Execute now.
    ///
    /// Produces exactly one result; panics raised inside are returned as
    /// execution failures.
    pub fn run(&self) -> Result<T, Error> {
        catch_unwind(AssertUnwindSafe(|| (self.run_fn)()))
            .unwrap_or_else(|payload| Err(Error::panicked(payload)))
    }

    /// Transform the success value.
    pub fn map<U, F>(self, f: F) -> Eff<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Eff::from_fn(move || self.run().map(&f))
    }

    /// Chain a dependent effect.
    pub fn and_then<U, F>(self, f: F) -> Eff<U>
    where
        U: 'static,
        F: Fn(T) -> Eff<U> + Send + Sync + 'static,
    {
        Eff::from_fn(move || f(self.run()?).run())
    }

    /// Transform the error value.
    pub fn map_err<F>(self, f: F) -> Eff<T>
    where
        F: Fn(Error) -> Error + Send + Sync + 'static,
    {
        Eff::from_fn(move || self.run().map_err(&f))
    }

    /// Observe the success value.
    pub fn tap<F>(self, f: F) -> Eff<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Eff::from_fn(move || self.run().inspect(&f))
    }

    /// Observe the failure; the error passes through untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use decorum::{Eff, Error};
    ///
    /// let failure = Error::new(7, "boom");
    /// let effect = Eff::<i32>::fail(failure.clone()).tap_err(|e| eprintln!("{}", e));
    /// assert_eq!(effect.run(), Err(failure));
    /// ```
    pub fn tap_err<F>(self, f: F) -> Eff<T>
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        Eff::from_fn(move || self.run().inspect_err(&f))
    }

    /// Lift into an async effect that completes without suspending.
    #[cfg(feature = "async")]
    pub fn into_async(self) -> crate::effect::Aff<T>
    where
        T: Send,
    {
        crate::effect::Aff::from_fn(move || self.run())
    }
}
