//! Input validation hook
//!
//! Every validated function owns a [`Validator`] built exactly once, when the
//! function is constructed, from the rules its logic registers. Running the
//! validator never stops at the first broken rule: all field errors are
//! collected, in registration order, into a [`ValidationOutcome`].
//!
//! # Example
//!
//! ```
//! use decorum::predicate::*;
//! use decorum::validator::Validator;
//!
//! struct Signup {
//!     name: String,
//!     age: u32,
//! }
//!
//! let validator = Validator::new(|rules| {
//!     rules
//!         .rule_for("name", |s: &Signup| &s.name, not_empty(), "name must not be empty")
//!         .rule_for("age", |s: &Signup| &s.age, ge(18), "age must be at least 18");
//! });
//!
//! let outcome = validator.validate(&Signup { name: String::new(), age: 12 });
//! assert!(!outcome.is_valid());
//! assert_eq!(
//!     outcome.messages(),
//!     vec!["name must not be empty", "age must be at least 18"]
//! );
//! ```

use std::fmt;

use crate::predicate::Predicate;
use crate::Validation;

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldError {
    field: String,
    message: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Message registered with the rule.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Verdict of a validator run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationOutcome {
    errors: Vec<FieldError>,
}

impl ValidationOutcome {
    /// `true` when no rule failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Field errors in registration order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Just the messages, in registration order.
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(FieldError::message).collect()
    }

    /// Take the field errors.
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

impl From<Validation<(), Vec<FieldError>>> for ValidationOutcome {
    fn from(validation: Validation<(), Vec<FieldError>>) -> Self {
        match validation {
            Validation::Success(()) => ValidationOutcome::default(),
            Validation::Failure(errors) => ValidationOutcome { errors },
        }
    }
}

type Check<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

struct Rule<T> {
    field: &'static str,
    message: String,
    check: Check<T>,
}

impl<T> Rule<T> {
    fn apply(&self, input: &T) -> Validation<(), Vec<FieldError>> {
        if (self.check)(input) {
            Validation::success(())
        } else {
            Validation::failure(vec![FieldError::new(self.field, self.message.clone())])
        }
    }
}

/// Rule registry handed to a function's rule hook.
pub struct Rules<T> {
    rules: Vec<Rule<T>>,
}

impl<T> fmt::Debug for Rules<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules")
            .field("count", &self.rules.len())
            .finish()
    }
}

impl<T: 'static> Rules<T> {
    fn empty() -> Self {
        Rules { rules: Vec::new() }
    }

    /// Register a rule over the whole input.
    pub fn rule<P>(&mut self, field: &'static str, predicate: P, message: impl Into<String>) -> &mut Self
    where
        P: Predicate<T> + 'static,
    {
        self.rules.push(Rule {
            field,
            message: message.into(),
            check: Box::new(move |input: &T| predicate.check(input)),
        });
        self
    }

    /// Register a rule over one field of the input.
    pub fn rule_for<V, A, P>(
        &mut self,
        field: &'static str,
        accessor: A,
        predicate: P,
        message: impl Into<String>,
    ) -> &mut Self
    where
        V: ?Sized,
        A: Fn(&T) -> &V + Send + Sync + 'static,
        P: Predicate<V> + 'static,
    {
        self.rules.push(Rule {
            field,
            message: message.into(),
            check: Box::new(move |input: &T| predicate.check(accessor(input))),
        });
        self
    }
}

/// Immutable rule set of one function.
pub struct Validator<T> {
    rules: Vec<Rule<T>>,
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rules.iter().map(|r| r.field).collect::<Vec<_>>())
            .finish()
    }
}

impl<T: 'static> Validator<T> {
    /// Build a validator by running the registration hook once.
    pub fn new<F>(register: F) -> Self
    where
        F: FnOnce(&mut Rules<T>),
    {
        let mut rules = Rules::empty();
        register(&mut rules);
        Validator { rules: rules.rules }
    }

    /// A validator without rules; accepts every input.
    pub fn accept_all() -> Self {
        Validator { rules: Vec::new() }
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// `true` when no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule against `input`.
    pub fn validate(&self, input: &T) -> ValidationOutcome {
        self.rules
            .iter()
            .map(|rule| rule.apply(input))
            .fold(Validation::success(()), |acc, next| acc.and(next).map(|_| ()))
            .into()
    }
}

/// Inputs that can carry a null sentinel.
///
/// Validated functions reject null inputs before running any rule. Only
/// `Option::None` is null out of the box; other types opt in with an empty
/// impl, or override [`Nullable::is_null`] for a custom sentinel.
///
/// ```
/// use decorum::validator::Nullable;
///
/// struct Order;
/// impl Nullable for Order {}
///
/// assert!(!Order.is_null());
/// assert!(None::<Order>.is_null());
/// ```
pub trait Nullable {
    /// Whether this value is the null sentinel.
    fn is_null(&self) -> bool {
        false
    }
}

impl<T> Nullable for Option<T> {
    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl<T: Nullable + ?Sized> Nullable for Box<T> {
    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

impl<T: Nullable + ?Sized> Nullable for std::sync::Arc<T> {
    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

impl<T: Nullable + ?Sized> Nullable for &T {
    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

macro_rules! never_null {
    ($($t:ty),* $(,)?) => {
        $(impl Nullable for $t {})*
    };
}

never_null!(
    (), bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
    String, str
);

impl<T> Nullable for Vec<T> {}

const WRAPPERS: [&str; 4] = ["Option", "Box", "Arc", "Rc"];

/// Short display name of a declared input type.
///
/// Module paths and generics are dropped, and nullable or pointer wrappers
/// are looked through: `Option<Box<app::Tally>>` is reported as `Tally`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let mut name = std::any::type_name::<T>();
    loop {
        name = name.trim_start_matches('&').trim_start_matches("mut ");
        let (path, args) = match name.split_once('<') {
            Some((path, args)) => (path, Some(args)),
            None => (name, None),
        };
        let base = path.rsplit("::").next().unwrap_or(path);
        match args {
            Some(args) if WRAPPERS.contains(&base) => {
                name = args.strip_suffix('>').unwrap_or(args);
            }
            _ => return base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{gt, not_empty};

    struct Item {
        name: String,
        count: i32,
    }

    fn item_validator() -> Validator<Item> {
        Validator::new(|rules| {
            rules
                .rule_for("name", |i: &Item| &i.name, not_empty(), "name must not be empty")
                .rule_for("count", |i: &Item| &i.count, gt(0), "count must be positive");
        })
    }

    #[test]
    fn test_accept_all_is_valid() {
        let validator = Validator::<Item>::accept_all();
        let outcome = validator.validate(&Item {
            name: String::new(),
            count: -1,
        });
        assert!(outcome.is_valid());
        assert!(validator.is_empty());
    }

    #[test]
    fn test_collects_all_errors_in_order() {
        let outcome = item_validator().validate(&Item {
            name: String::new(),
            count: 0,
        });
        assert_eq!(
            outcome.errors(),
            &[
                FieldError::new("name", "name must not be empty"),
                FieldError::new("count", "count must be positive"),
            ]
        );
    }

    #[test]
    fn test_single_failure() {
        let outcome = item_validator().validate(&Item {
            name: "ok".into(),
            count: 0,
        });
        assert_eq!(outcome.messages(), vec!["count must be positive"]);
    }

    #[test]
    fn test_whole_input_rule() {
        let validator = Validator::new(|rules| {
            rules.rule("self", |n: &i32| n % 2 == 0, "must be even");
        });
        assert!(validator.validate(&4).is_valid());
        assert!(!validator.validate(&3).is_valid());
        assert_eq!(validator.len(), 1);
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Item>(), "Item");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
        assert_eq!(short_type_name::<i32>(), "i32");
    }

    #[test]
    fn test_short_type_name_looks_through_wrappers() {
        assert_eq!(short_type_name::<Option<Item>>(), "Item");
        assert_eq!(short_type_name::<Option<Box<Item>>>(), "Item");
        assert_eq!(short_type_name::<std::sync::Arc<Item>>(), "Item");
        assert_eq!(short_type_name::<&Item>(), "Item");
        assert_eq!(short_type_name::<Option<Vec<Item>>>(), "Vec");
    }

    #[test]
    fn test_nullable() {
        assert!(None::<i32>.is_null());
        assert!(!Some(1).is_null());
        assert!(!"text".is_null());
        assert!(Box::new(None::<u8>).is_null());
    }
}
