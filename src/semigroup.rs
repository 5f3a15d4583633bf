//! Semigroup trait for accumulating failures
//!
//! Rule checks never short-circuit: every failing rule contributes its field
//! error, and the partial results are merged with [`Semigroup::combine`].
//!
//! # Examples
//!
//! ```
//! use decorum::Semigroup;
//!
//! let first = vec!["name must not be empty"];
//! let second = vec!["count must be positive"];
//! assert_eq!(
//!     first.combine(second),
//!     vec!["name must not be empty", "count must be positive"]
//! );
//! ```

/// A type that supports an associative binary operation
///
/// # Laws
///
/// ```text
/// a.combine(b).combine(c) == a.combine(b.combine(c))
/// ```
pub trait Semigroup: Sized {
    /// Combine this value with another value associatively
    fn combine(self, other: Self) -> Self;
}

impl<T> Semigroup for Vec<T> {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

impl Semigroup for String {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.push_str(&other);
        self
    }
}

impl Semigroup for () {
    #[inline]
    fn combine(self, _other: Self) -> Self {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_keeps_order() {
        let v = vec![1, 2].combine(vec![3]).combine(vec![4, 5]);
        assert_eq!(v, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_string_concatenates() {
        assert_eq!("ab".to_string().combine("cd".to_string()), "abcd");
    }

    #[test]
    fn test_vec_associativity() {
        let a = vec![1];
        let b = vec![2];
        let c = vec![3];
        assert_eq!(
            a.clone().combine(b.clone()).combine(c.clone()),
            a.combine(b.combine(c))
        );
    }
}
