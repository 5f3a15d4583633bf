//! Composable predicates for input rules
//!
//! Rules registered on a function are plain predicates over a field value.
//! Closures work directly; the helpers here cover the common checks and can be
//! combined with `and`, `or` and `not`.
//!
//! # Example
//!
//! ```rust
//! use decorum::predicate::*;
//!
//! let percent = ge(0).and(le(100));
//! assert!(percent.check(&42));
//! assert!(!percent.check(&101));
//!
//! let username = len_between(3, 20);
//! assert!(username.check("john_doe"));
//! assert!(!username.check("jo"));
//! ```

/// A composable predicate over values of type T.
pub trait Predicate<T: ?Sized>: Send + Sync {
    /// Check if the value satisfies this predicate.
    fn check(&self, value: &T) -> bool;
}

impl<T: ?Sized, F> Predicate<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    #[inline]
    fn check(&self, value: &T) -> bool {
        self(value)
    }
}

/// Extension trait for predicate combinators.
pub trait PredicateExt<T: ?Sized>: Predicate<T> + Sized {
    /// True only when both predicates are true.
    fn and<P: Predicate<T>>(self, other: P) -> And<Self, P> {
        And(self, other)
    }

    /// True when either predicate is true.
    fn or<P: Predicate<T>>(self, other: P) -> Or<Self, P> {
        Or(self, other)
    }

    /// Invert the predicate.
    fn not(self) -> Not<Self> {
        Not(self)
    }
}

impl<T: ?Sized, P: Predicate<T>> PredicateExt<T> for P {}

/// AND combinator - both predicates must be true.
#[derive(Clone, Copy, Debug)]
pub struct And<P1, P2>(pub P1, pub P2);

impl<T: ?Sized, P1: Predicate<T>, P2: Predicate<T>> Predicate<T> for And<P1, P2> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        self.0.check(value) && self.1.check(value)
    }
}

/// OR combinator - either predicate must be true.
#[derive(Clone, Copy, Debug)]
pub struct Or<P1, P2>(pub P1, pub P2);

impl<T: ?Sized, P1: Predicate<T>, P2: Predicate<T>> Predicate<T> for Or<P1, P2> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        self.0.check(value) || self.1.check(value)
    }
}

/// NOT combinator - inverts the predicate.
#[derive(Clone, Copy, Debug)]
pub struct Not<P>(pub P);

impl<T: ?Sized, P: Predicate<T>> Predicate<T> for Not<P> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        !self.0.check(value)
    }
}

/// Checks that a string or collection is not empty.
#[derive(Clone, Copy, Default, Debug)]
pub struct NotEmpty;

impl Predicate<str> for NotEmpty {
    #[inline]
    fn check(&self, value: &str) -> bool {
        !value.is_empty()
    }
}

impl Predicate<String> for NotEmpty {
    #[inline]
    fn check(&self, value: &String) -> bool {
        !value.is_empty()
    }
}

impl<T: Sync> Predicate<Vec<T>> for NotEmpty {
    #[inline]
    fn check(&self, value: &Vec<T>) -> bool {
        !value.is_empty()
    }
}

/// Create a predicate that rejects empty strings and collections.
///
/// ```rust
/// use decorum::predicate::*;
///
/// assert!(not_empty().check("hello"));
/// assert!(!not_empty().check(""));
/// ```
pub fn not_empty() -> NotEmpty {
    NotEmpty
}

/// Checks that a string length lies in an inclusive range.
#[derive(Clone, Copy, Debug)]
pub struct LenBetween {
    min: usize,
    max: usize,
}

impl Predicate<str> for LenBetween {
    #[inline]
    fn check(&self, value: &str) -> bool {
        (self.min..=self.max).contains(&value.len())
    }
}

impl Predicate<String> for LenBetween {
    #[inline]
    fn check(&self, value: &String) -> bool {
        (self.min..=self.max).contains(&value.len())
    }
}

/// Create a predicate that checks string length is between min and max (inclusive).
pub fn len_between(min: usize, max: usize) -> LenBetween {
    LenBetween { min, max }
}

/// Comparison against a fixed bound.
#[derive(Clone, Copy, Debug)]
pub struct Compare<T> {
    bound: T,
    op: CompareOp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CompareOp {
    Gt,
    Ge,
    Lt,
    Le,
}

impl<T: PartialOrd + Send + Sync> Predicate<T> for Compare<T> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        match self.op {
            CompareOp::Gt => *value > self.bound,
            CompareOp::Ge => *value >= self.bound,
            CompareOp::Lt => *value < self.bound,
            CompareOp::Le => *value <= self.bound,
        }
    }
}

/// Value must be strictly greater than `bound`.
pub fn gt<T>(bound: T) -> Compare<T> {
    Compare {
        bound,
        op: CompareOp::Gt,
    }
}

/// Value must be greater than or equal to `bound`.
pub fn ge<T>(bound: T) -> Compare<T> {
    Compare {
        bound,
        op: CompareOp::Ge,
    }
}

/// Value must be strictly less than `bound`.
pub fn lt<T>(bound: T) -> Compare<T> {
    Compare {
        bound,
        op: CompareOp::Lt,
    }
}

/// Value must be less than or equal to `bound`.
pub fn le<T>(bound: T) -> Compare<T> {
    Compare {
        bound,
        op: CompareOp::Le,
    }
}

/// Value must lie in `min..=max`.
///
/// ```rust
/// use decorum::predicate::*;
///
/// let age = between(0, 150);
/// assert!(age.check(&30));
/// assert!(!age.check(&200));
/// ```
pub fn between<T>(min: T, max: T) -> And<Compare<T>, Compare<T>> {
    And(ge(min), le(max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_predicate() {
        let even = |n: &i32| n % 2 == 0;
        assert!(even.check(&4));
        assert!(!even.check(&3));
    }

    #[test]
    fn test_or_and_not() {
        let p = lt(0).or(gt(100));
        assert!(p.check(&-1));
        assert!(p.check(&101));
        assert!(!p.check(&50));
        assert!(p.not().check(&50));
    }

    #[test]
    fn test_not_empty_on_vec() {
        assert!(not_empty().check(&vec![1]));
        assert!(!not_empty().check(&Vec::<i32>::new()));
    }

    #[test]
    fn test_len_between_bounds() {
        let p = len_between(2, 3);
        assert!(!p.check("a"));
        assert!(p.check("ab"));
        assert!(p.check("abc"));
        assert!(!p.check("abcd"));
    }
}
