//! Validation type for accumulating rule failures
//!
//! `Validation` is similar to `Result` but combines failures instead of
//! stopping at the first one. The [`Validator`](crate::validator::Validator)
//! folds every registered rule into a single `Validation` so that callers see
//! the complete, ordered list of field errors.
//!
//! # Examples
//!
//! ```
//! use decorum::Validation;
//!
//! let v1 = Validation::<i32, _>::failure(vec!["error1"]);
//! let v2 = Validation::<i32, _>::failure(vec!["error2"]);
//!
//! assert_eq!(v1.and(v2), Validation::Failure(vec!["error1", "error2"]));
//! ```

use crate::predicate::Predicate;
use crate::Semigroup;

/// A validation that either succeeds with a value or fails with accumulated errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<T, E> {
    /// Successful validation with a value
    Success(T),
    /// Failed validation with accumulated errors
    Failure(E),
}

impl<T, E> Validation<T, E> {
    /// Create a successful validation
    #[inline]
    pub fn success(value: T) -> Self {
        Validation::Success(value)
    }

    /// Create a failed validation
    #[inline]
    pub fn failure(error: E) -> Self {
        Validation::Failure(error)
    }

    /// Create a validation from a Result
    #[inline]
    pub fn from_result(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Validation::Success(value),
            Err(error) => Validation::Failure(error),
        }
    }

    /// Convert this validation to a Result
    ///
    /// # Examples
    ///
    /// ```
    /// use decorum::Validation;
    ///
    /// let v = Validation::<i32, _>::failure("error".to_string());
    /// assert_eq!(v.into_result(), Err("error".to_string()));
    /// ```
    #[inline]
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Validation::Success(value) => Ok(value),
            Validation::Failure(error) => Err(error),
        }
    }

    /// Check if this validation is successful
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Validation::Success(_))
    }

    /// Check if this validation failed
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Validation::Failure(_))
    }

    /// Transform the success value if present
    #[inline]
    pub fn map<U, F>(self, f: F) -> Validation<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Validation::Success(value) => Validation::Success(f(value)),
            Validation::Failure(error) => Validation::Failure(error),
        }
    }

    /// Transform the error value if present
    #[inline]
    pub fn map_err<E2, F>(self, f: F) -> Validation<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Validation::Success(value) => Validation::Success(value),
            Validation::Failure(error) => Validation::Failure(f(error)),
        }
    }
}

impl<T, E: Semigroup> Validation<T, E> {
    /// Combine two validations, accumulating errors using the Semigroup instance
    pub fn and<U>(self, other: Validation<U, E>) -> Validation<(T, U), E> {
        match (self, other) {
            (Validation::Success(a), Validation::Success(b)) => Validation::Success((a, b)),
            (Validation::Failure(e1), Validation::Failure(e2)) => {
                Validation::Failure(e1.combine(e2))
            }
            (Validation::Failure(e), _) => Validation::Failure(e),
            (_, Validation::Failure(e)) => Validation::Failure(e),
        }
    }

    /// Chain a dependent validation
    #[inline]
    pub fn and_then<U, F>(self, f: F) -> Validation<U, E>
    where
        F: FnOnce(T) -> Validation<U, E>,
    {
        match self {
            Validation::Success(value) => f(value),
            Validation::Failure(error) => Validation::Failure(error),
        }
    }

    /// Combine all validations in a Vec
    ///
    /// # Examples
    ///
    /// ```
    /// use decorum::Validation;
    ///
    /// let validations = vec![
    ///     Validation::<i32, _>::failure(vec!["error1"]),
    ///     Validation::success(2),
    ///     Validation::failure(vec!["error2"]),
    /// ];
    /// let result = Validation::all_vec(validations);
    /// assert_eq!(result, Validation::Failure(vec!["error1", "error2"]));
    /// ```
    pub fn all_vec(validations: Vec<Validation<T, E>>) -> Validation<Vec<T>, E> {
        validations
            .into_iter()
            .fold(Validation::Success(Vec::new()), |acc, v| {
                acc.and(v).map(|(mut values, value)| {
                    values.push(value);
                    values
                })
            })
    }
}

impl<T, E> Validation<T, E> {
    /// Fail with `error` when the success value does not satisfy `predicate`.
    ///
    /// An existing failure is kept as is.
    ///
    /// # Examples
    ///
    /// ```
    /// use decorum::{Validation, predicate::*};
    ///
    /// let v = Validation::<_, &str>::success(String::new()).ensure(not_empty(), "empty");
    /// assert_eq!(v, Validation::Failure("empty"));
    /// ```
    pub fn ensure<P>(self, predicate: P, error: E) -> Self
    where
        P: Predicate<T>,
    {
        match self {
            Validation::Success(value) if predicate.check(&value) => Validation::Success(value),
            Validation::Success(_) => Validation::Failure(error),
            failure => failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{gt, PredicateExt};

    #[test]
    fn test_and_accumulates_in_order() {
        let v = Validation::<i32, _>::failure(vec!["a"])
            .and(Validation::<i32, _>::success(1))
            .and(Validation::<i32, _>::failure(vec!["b"]));
        assert_eq!(v, Validation::Failure(vec!["a", "b"]));
    }

    #[test]
    fn test_all_vec_success() {
        let v = Validation::<_, Vec<&str>>::all_vec(vec![
            Validation::success(1),
            Validation::success(2),
        ]);
        assert_eq!(v, Validation::Success(vec![1, 2]));
    }

    #[test]
    fn test_ensure_keeps_first_failure() {
        let v = Validation::<i32, _>::failure("first").ensure(gt(0), "second");
        assert_eq!(v, Validation::Failure("first"));
    }

    #[test]
    fn test_ensure_with_combined_predicate() {
        let v = Validation::<_, &str>::success(5).ensure(gt(0).and(gt(10)), "out of range");
        assert_eq!(v, Validation::Failure("out of range"));
    }

    #[test]
    fn test_result_round_trip_preserves_error() {
        let v = Validation::<i32, _>::from_result(Err("bad"));
        assert!(v.is_failure());
        assert_eq!(v.into_result(), Err("bad"));
    }
}
