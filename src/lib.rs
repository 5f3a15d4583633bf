//! # Decorum
//!
//! Validated, deferred functions with pluggable observability.
//!
//! A function is a component that, applied to an input, returns an
//! *effect*: a description of a computation that has not run yet. Running
//! the effect performs the work and yields either a value or a structured
//! [`Error`]. Before the work starts, the input is checked against the
//! function's validation rules; a missing input or a broken rule is reported
//! as a failure with code [`VALIDATION_ERROR_CODE`] and the logic never runs.
//!
//! Synchronous effects are [`Eff`]. Asynchronous effects are [`Aff`] and run
//! against a [`CancellationToken`]. Decorators ([`ErrorLogging`],
//! [`Tracing`]) wrap any function, keep its contract and add logging.
//!
//! ## Quick Example
//!
//! ```rust
//! use decorum::prelude::*;
//!
//! #[derive(Debug, Clone)]
//! struct Tally {
//!     name: String,
//!     count: i32,
//! }
//!
//! struct DoubleCount;
//!
//! impl Logic for DoubleCount {
//!     type Input = Option<Tally>;
//!     type Output = i32;
//!
//!     fn rules(&self, rules: &mut Rules<Option<Tally>>) {
//!         rules.rule(
//!             "name",
//!             |t: &Option<Tally>| t.as_ref().is_some_and(|t| !t.name.is_empty()),
//!             "name must not be empty",
//!         );
//!     }
//!
//!     fn call(&self, input: Option<Tally>) -> Eff<i32> {
//!         Eff::pure(input.map_or(0, |t| t.count * 2))
//!     }
//! }
//!
//! let double = Validated::new(DoubleCount);
//!
//! let ok = double.apply(Some(Tally { name: "a".into(), count: 21 }));
//! assert_eq!(ok.run(), Ok(42));
//!
//! let err = double
//!     .apply(Some(Tally { name: String::new(), count: 5 }))
//!     .run()
//!     .unwrap_err();
//! assert_eq!(err.code(), VALIDATION_ERROR_CODE);
//! assert_eq!(err.message(), "Validation failed for Tally");
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod decorator;
pub mod effect;
pub mod error;
pub mod function;
pub mod identity;
pub mod predicate;
pub mod semigroup;
pub mod sink;
pub mod testing;
pub mod validation;
pub mod validator;

// Re-exports
pub use decorator::{ErrorLogging, Tracing};
#[cfg(feature = "async")]
pub use effect::{Aff, CancellationToken};
pub use effect::Eff;
pub use error::{Error, ErrorKind, VALIDATION_ERROR_CODE};
#[cfg(feature = "async")]
pub use function::{AsyncFunction, AsyncLogic, AsyncSupplier, AsyncValidated, Supplier};
pub use function::{Function, Logic, Validated};
pub use identity::{Identified, Identity};
pub use semigroup::Semigroup;
#[cfg(feature = "tracing")]
pub use sink::TracingSink;
pub use sink::LogSink;
pub use validation::Validation;
pub use validator::{Nullable, Rules, Validator};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::decorator::{ErrorLogging, Tracing};
    #[cfg(feature = "async")]
    pub use crate::effect::{Aff, CancellationToken};
    pub use crate::effect::Eff;
    pub use crate::error::{Error, ErrorKind, VALIDATION_ERROR_CODE};
    #[cfg(feature = "async")]
    pub use crate::function::{AsyncFunction, AsyncLogic, AsyncSupplier, AsyncValidated, Supplier};
    pub use crate::function::{Function, Logic, Validated};
    pub use crate::identity::{Identified, Identity};
    pub use crate::predicate::PredicateExt;
    pub use crate::semigroup::Semigroup;
    #[cfg(feature = "tracing")]
    pub use crate::sink::TracingSink;
    pub use crate::sink::LogSink;
    pub use crate::validation::Validation;
    pub use crate::validator::{Nullable, Rules, Validator};
}
