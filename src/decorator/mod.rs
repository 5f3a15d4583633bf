//! Observability decorators
//!
//! A decorator implements the same function traits as the function it wraps
//! and adds exactly one side effect:
//!
//! - [`ErrorLogging`] logs failures at error severity;
//! - [`Tracing`] logs each call and each successful return.
//!
//! Both take a factory producing a fresh inner handle. The factory is called
//! once per run of the returned effect, never when `apply` builds it, so call
//! scoped state in the inner function never leaks between calls. Both also
//! carry the display identity of the innermost concrete logic, read once per
//! decorator from the first inner handle it needs.
//!
//! Which decorators wrap which function, and in what order, is the caller's
//! decision. The outermost decorator sees the call first and the outcome
//! last:
//!
//! ```
//! use std::sync::Arc;
//! use decorum::prelude::*;
//! use decorum::function::from_fn;
//! use decorum::testing::RecordingSink;
//!
//! let sink = Arc::new(RecordingSink::new());
//! let inner_sink = Arc::clone(&sink);
//! let function = ErrorLogging::resolve(
//!     move || {
//!         Tracing::resolve(
//!             || Validated::new(from_fn("math::halve", |n: u32| Eff::pure(n / 2))),
//!             inner_sink.clone(),
//!         )
//!     },
//!     sink.clone(),
//! );
//!
//! assert_eq!(function.apply(10).run(), Ok(5));
//! assert_eq!(
//!     sink.messages(),
//!     vec!["math::halve called with 10", "math::halve returned 5"]
//! );
//! ```

use std::any::Any;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::identity::{Identified, Identity};

mod error_logging;
mod trace;

pub use error_logging::ErrorLogging;
pub use trace::Tracing;

type Spare = Option<Box<dyn Any + Send>>;

/// Factory of inner handles plus the identity read from them.
///
/// Reading the identity before any run builds one handle and keeps it as a
/// spare; the next run takes the spare instead of calling the factory, so a
/// run never builds more than one handle.
struct Handles<Fac> {
    factory: Fac,
    identity: OnceLock<Identity>,
    spare: Mutex<Spare>,
}

impl<Fac> Handles<Fac> {
    fn named(identity: Identity, factory: Fac) -> Self {
        Handles {
            factory,
            identity: OnceLock::from(identity),
            spare: Mutex::new(None),
        }
    }

    fn unnamed(factory: Fac) -> Self {
        Handles {
            factory,
            identity: OnceLock::new(),
            spare: Mutex::new(None),
        }
    }

    fn spare(&self) -> MutexGuard<'_, Spare> {
        self.spare.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A handle for one run.
    fn build<Inner>(&self) -> Inner
    where
        Fac: Fn() -> Inner,
        Inner: Send + 'static,
    {
        let spare = self.spare().take();
        match spare.map(|handle| handle.downcast::<Inner>()) {
            Some(Ok(handle)) => *handle,
            _ => (self.factory)(),
        }
    }

    /// Identity of this decorator, building a spare handle if still unknown.
    fn identity<Inner>(&self) -> Identity
    where
        Fac: Fn() -> Inner,
        Inner: Identified + Send + 'static,
    {
        self.identity
            .get_or_init(|| {
                let handle = (self.factory)();
                let identity = handle.identity();
                *self.spare() = Some(Box::new(handle));
                identity
            })
            .clone()
    }

    /// Identity of this decorator, taken from a handle built for a run.
    fn observe(&self, handle: &impl Identified) -> Identity {
        self.identity.get_or_init(|| handle.identity()).clone()
    }

    /// Identity if already known, else the inner type's name.
    fn known<Inner>(&self) -> Identity {
        self.identity
            .get()
            .cloned()
            .unwrap_or_else(Identity::of::<Inner>)
    }
}
