//! Deferred, re-runnable effects
//!
//! An effect describes how to produce a `Result<T, Error>` without producing
//! it. Nothing happens until the effect is run; running it again re-runs the
//! whole description, there is no memoization.
//!
//! Two variants exist:
//!
//! | Variant | Runs with | Suspends | Cancellable |
//! |---------|-----------|----------|-------------|
//! | [`Eff<T>`] | `run()` | never | no |
//! | [`Aff<T>`] | `run(&token).await` | where the logic awaits | yes |
//!
//! Both are cheap to clone. A clone shares the description, so running both
//! copies executes the underlying logic twice.
//!
//! # Panics at the boundary
//!
//! Running an effect never unwinds into the caller. A panic raised by the
//! underlying logic is caught where the effect runs and becomes an
//! execution failure whose cause is a [`Panicked`](crate::error::Panicked)
//! fault. Combinators run their inner effect through the same boundary, so
//! observers such as [`Eff::tap_err`] also see panics as failures.
//!
//! # Example
//!
//! ```
//! use decorum::Eff;
//!
//! let effect = Eff::pure(21).map(|x| x * 2);
//! assert_eq!(effect.run(), Ok(42));
//! assert_eq!(effect.run(), Ok(42));
//! ```

#[cfg(feature = "async")]
mod future;
#[cfg(feature = "tracing")]
mod instrument;
mod sync;

#[cfg(feature = "async")]
pub use future::Aff;
pub use sync::Eff;

/// Re-export so callers can build and fire cancellation signals.
#[cfg(feature = "async")]
pub use tokio_util::sync::CancellationToken;
