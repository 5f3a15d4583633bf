//! The function contract and its validated base implementations
//!
//! A function is anything exposing `apply(input) -> effect`. Calling `apply`
//! never runs anything; it only describes the call. The caller runs the
//! returned effect.
//!
//! Concrete business logic implements [`Logic`] (sync) or [`AsyncLogic`]
//! (async) and is wrapped once in [`Validated`], [`AsyncValidated`] or
//! [`Supplier`]. Those wrappers own the validator, built exactly once at
//! construction from the logic's rule hook, and guard every run:
//!
//! 1. a null input fails with the reserved validation code and
//!    `"Input could not be null"`; rules are skipped;
//! 2. broken rules fail with the reserved validation code and a
//!    [`ValidationFailure`](crate::error::ValidationFailure) cause listing every
//!    field error;
//! 3. otherwise the logic runs.
//!
//! Decorators implement the same traits, so callers cannot tell a bare
//! function from a decorated one.
//!
//! # Example
//!
//! ```
//! use decorum::prelude::*;
//! use decorum::predicate::not_empty;
//!
//! #[derive(Debug, Clone)]
//! struct Greet {
//!     name: String,
//! }
//!
//! impl Nullable for Greet {}
//!
//! struct Greeter;
//!
//! impl Logic for Greeter {
//!     type Input = Greet;
//!     type Output = String;
//!
//!     fn rules(&self, rules: &mut Rules<Greet>) {
//!         rules.rule_for("name", |g: &Greet| &g.name, not_empty(), "name must not be empty");
//!     }
//!
//!     fn call(&self, input: Greet) -> Eff<String> {
//!         Eff::pure(format!("hello {}", input.name))
//!     }
//! }
//!
//! let greeter = Validated::new(Greeter);
//! let ok = greeter.apply(Greet { name: "ada".into() });
//! assert_eq!(ok.run(), Ok("hello ada".to_string()));
//!
//! let err = greeter.apply(Greet { name: String::new() }).run().unwrap_err();
//! assert_eq!(err.code(), VALIDATION_ERROR_CODE);
//! assert_eq!(err.message(), "Validation failed for Greet");
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::effect::Eff;
use crate::error::{Error, NULL_INPUT_MESSAGE};
use crate::identity::{Identified, Identity};
use crate::validator::{short_type_name, Nullable, Rules, Validator};

#[cfg(feature = "async")]
use crate::effect::Aff;

/// Synchronous function contract.
pub trait Function<I, O>: Send + Sync {
    /// Apply input, returning an effect that invokes the function when run.
    fn apply(&self, input: I) -> Eff<O>;
}

/// Asynchronous function contract.
///
/// The cancellation token is supplied when the returned effect is run and
/// reaches the concrete logic unchanged.
#[cfg(feature = "async")]
pub trait AsyncFunction<I, O>: Send + Sync {
    /// Apply input, returning an async effect that invokes the function when run.
    fn apply(&self, input: I) -> Aff<O>;
}

/// Asynchronous function without input.
#[cfg(feature = "async")]
pub trait AsyncSupplier<O>: Send + Sync {
    /// Return an async effect that invokes the function when run.
    fn apply(&self) -> Aff<O>;
}

impl<I, O, F: Function<I, O> + ?Sized> Function<I, O> for Arc<F> {
    fn apply(&self, input: I) -> Eff<O> {
        (**self).apply(input)
    }
}

#[cfg(feature = "async")]
impl<I, O, F: AsyncFunction<I, O> + ?Sized> AsyncFunction<I, O> for Arc<F> {
    fn apply(&self, input: I) -> Aff<O> {
        (**self).apply(input)
    }
}

#[cfg(feature = "async")]
impl<O, F: AsyncSupplier<O> + ?Sized> AsyncSupplier<O> for Arc<F> {
    fn apply(&self) -> Aff<O> {
        (**self).apply()
    }
}

/// Concrete synchronous logic.
pub trait Logic: Send + Sync + 'static {
    /// Input type; must be cloneable since effects are re-runnable.
    type Input: Nullable + Clone + Send + Sync + 'static;
    /// Success type.
    type Output: 'static;

    /// Register input rules. Called once, at construction. No rules by default.
    fn rules(&self, _rules: &mut Rules<Self::Input>) {}

    /// Display identity used by decorators. Defaults to the type path.
    fn identity(&self) -> Identity {
        Identity::of::<Self>()
    }

    /// The function body, invoked only for valid input.
    fn call(&self, input: Self::Input) -> Eff<Self::Output>;
}

/// Concrete asynchronous logic.
#[cfg(feature = "async")]
pub trait AsyncLogic: Send + Sync + 'static {
    /// Input type; must be cloneable since effects are re-runnable.
    type Input: Nullable + Clone + Send + Sync + 'static;
    /// Success type.
    type Output: Send + 'static;

    /// Register input rules. Called once, at construction. No rules by default.
    fn rules(&self, _rules: &mut Rules<Self::Input>) {}

    /// Display identity used by decorators. Defaults to the type path.
    fn identity(&self) -> Identity {
        Identity::of::<Self>()
    }

    /// The function body, invoked only for valid input.
    fn call(&self, input: Self::Input) -> Aff<Self::Output>;
}

fn check_input<I: Nullable + 'static>(validator: &Validator<I>, input: &I) -> Result<(), Error> {
    if input.is_null() {
        return Err(Error::validation(NULL_INPUT_MESSAGE));
    }
    let outcome = validator.validate(input);
    if outcome.is_valid() {
        Ok(())
    } else {
        Err(Error::invalid_input(
            short_type_name::<I>(),
            outcome.into_errors(),
        ))
    }
}

/// Synchronous logic guarded by null check and input rules.
pub struct Validated<L: Logic> {
    logic: Arc<L>,
    validator: Arc<Validator<L::Input>>,
    identity: Identity,
}

impl<L: Logic> Validated<L> {
    /// Wrap `logic`, building its validator once.
    pub fn new(logic: L) -> Self {
        let validator = Validator::new(|rules| logic.rules(rules));
        let identity = logic.identity();
        Validated {
            logic: Arc::new(logic),
            validator: Arc::new(validator),
            identity,
        }
    }

    /// The validator built at construction.
    pub fn validator(&self) -> &Validator<L::Input> {
        &self.validator
    }
}

impl<L: Logic> Clone for Validated<L> {
    fn clone(&self) -> Self {
        Validated {
            logic: Arc::clone(&self.logic),
            validator: Arc::clone(&self.validator),
            identity: self.identity.clone(),
        }
    }
}

impl<L: Logic> fmt::Debug for Validated<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validated")
            .field("identity", &self.identity)
            .field("validator", &self.validator)
            .finish()
    }
}

impl<L: Logic> Identified for Validated<L> {
    fn identity(&self) -> Identity {
        self.identity.clone()
    }
}

impl<L: Logic> Function<L::Input, L::Output> for Validated<L> {
    fn apply(&self, input: L::Input) -> Eff<L::Output> {
        let logic = Arc::clone(&self.logic);
        let validator = Arc::clone(&self.validator);
        Eff::defer(move || match check_input(&validator, &input) {
            Ok(()) => logic.call(input.clone()),
            Err(error) => Eff::fail(error),
        })
    }
}

/// Asynchronous logic guarded by null check and input rules.
#[cfg(feature = "async")]
pub struct AsyncValidated<L: AsyncLogic> {
    logic: Arc<L>,
    validator: Arc<Validator<L::Input>>,
    identity: Identity,
}

#[cfg(feature = "async")]
impl<L: AsyncLogic> AsyncValidated<L> {
    /// Wrap `logic`, building its validator once.
    pub fn new(logic: L) -> Self {
        let validator = Validator::new(|rules| logic.rules(rules));
        let identity = logic.identity();
        AsyncValidated {
            logic: Arc::new(logic),
            validator: Arc::new(validator),
            identity,
        }
    }

    /// The validator built at construction.
    pub fn validator(&self) -> &Validator<L::Input> {
        &self.validator
    }
}

#[cfg(feature = "async")]
impl<L: AsyncLogic> Clone for AsyncValidated<L> {
    fn clone(&self) -> Self {
        AsyncValidated {
            logic: Arc::clone(&self.logic),
            validator: Arc::clone(&self.validator),
            identity: self.identity.clone(),
        }
    }
}

#[cfg(feature = "async")]
impl<L: AsyncLogic> fmt::Debug for AsyncValidated<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncValidated")
            .field("identity", &self.identity)
            .field("validator", &self.validator)
            .finish()
    }
}

#[cfg(feature = "async")]
impl<L: AsyncLogic> Identified for AsyncValidated<L> {
    fn identity(&self) -> Identity {
        self.identity.clone()
    }
}

#[cfg(feature = "async")]
impl<L: AsyncLogic> AsyncFunction<L::Input, L::Output> for AsyncValidated<L> {
    fn apply(&self, input: L::Input) -> Aff<L::Output> {
        let logic = Arc::clone(&self.logic);
        let validator = Arc::clone(&self.validator);
        Aff::defer(move || match check_input(&validator, &input) {
            Ok(()) => logic.call(input.clone()),
            Err(error) => Aff::fail(error),
        })
    }
}

/// Asynchronous logic over `()` exposed as a no-input function.
///
/// There is nothing to validate, so the logic is called directly.
#[cfg(feature = "async")]
pub struct Supplier<L> {
    logic: Arc<L>,
    identity: Identity,
}

#[cfg(feature = "async")]
impl<L: AsyncLogic<Input = ()>> Supplier<L> {
    /// Wrap `logic`.
    pub fn new(logic: L) -> Self {
        let identity = logic.identity();
        Supplier {
            logic: Arc::new(logic),
            identity,
        }
    }
}

#[cfg(feature = "async")]
impl<L> Clone for Supplier<L> {
    fn clone(&self) -> Self {
        Supplier {
            logic: Arc::clone(&self.logic),
            identity: self.identity.clone(),
        }
    }
}

#[cfg(feature = "async")]
impl<L> fmt::Debug for Supplier<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supplier")
            .field("identity", &self.identity)
            .finish()
    }
}

#[cfg(feature = "async")]
impl<L: AsyncLogic<Input = ()>> Identified for Supplier<L> {
    fn identity(&self) -> Identity {
        self.identity.clone()
    }
}

#[cfg(feature = "async")]
impl<L: AsyncLogic<Input = ()>> AsyncSupplier<L::Output> for Supplier<L> {
    fn apply(&self) -> Aff<L::Output> {
        let logic = Arc::clone(&self.logic);
        Aff::defer(move || logic.call(()))
    }
}

/// Logic backed by a closure.
///
/// Created by [`from_fn`] and [`from_async_fn`].
pub struct FnLogic<F, I, O> {
    name: Identity,
    f: F,
    _marker: PhantomData<fn(I) -> O>,
}

impl<F, I, O> fmt::Debug for FnLogic<F, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLogic")
            .field("name", &self.name)
            .field("f", &"<function>")
            .finish()
    }
}

/// Turn a closure into synchronous logic without rules.
///
/// # Example
///
/// ```
/// use decorum::prelude::*;
/// use decorum::function::from_fn;
///
/// let double = Validated::new(from_fn("double", |n: Option<i32>| {
///     Eff::pure(n.unwrap_or_default() * 2)
/// }));
/// assert_eq!(double.apply(Some(4)).run(), Ok(8));
/// assert_eq!(double.apply(None).run().unwrap_err().code(), VALIDATION_ERROR_CODE);
/// ```
pub fn from_fn<F, I, O>(name: impl Into<Identity>, f: F) -> FnLogic<F, I, O>
where
    F: Fn(I) -> Eff<O> + Send + Sync + 'static,
{
    FnLogic {
        name: name.into(),
        f,
        _marker: PhantomData,
    }
}

/// Turn an async-effect closure into asynchronous logic without rules.
#[cfg(feature = "async")]
pub fn from_async_fn<F, I, O>(name: impl Into<Identity>, f: F) -> FnLogic<F, I, O>
where
    F: Fn(I) -> Aff<O> + Send + Sync + 'static,
{
    FnLogic {
        name: name.into(),
        f,
        _marker: PhantomData,
    }
}

impl<F, I, O> Logic for FnLogic<F, I, O>
where
    F: Fn(I) -> Eff<O> + Send + Sync + 'static,
    I: Nullable + Clone + Send + Sync + 'static,
    O: 'static,
{
    type Input = I;
    type Output = O;

    fn identity(&self) -> Identity {
        self.name.clone()
    }

    fn call(&self, input: I) -> Eff<O> {
        (self.f)(input)
    }
}

#[cfg(feature = "async")]
impl<F, I, O> AsyncLogic for FnLogic<F, I, O>
where
    F: Fn(I) -> Aff<O> + Send + Sync + 'static,
    I: Nullable + Clone + Send + Sync + 'static,
    O: Send + 'static,
{
    type Input = I;
    type Output = O;

    fn identity(&self) -> Identity {
        self.name.clone()
    }

    fn call(&self, input: I) -> Aff<O> {
        (self.f)(input)
    }
}
