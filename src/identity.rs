//! Display identity of a function
//!
//! An [`Identity`] names the concrete implementation behind a function handle.
//! It only shows up in log entries. Decorators resolve it once, at
//! construction, and every decorator layer reports the name of the innermost
//! concrete logic, so one logical function keeps one stable name however deep
//! the wrapping goes.

use std::fmt;
use std::sync::Arc;

/// Human-readable name of a concrete function implementation.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", from = "String")
)]
pub struct Identity(Arc<str>);

impl Identity {
    /// Wrap an explicit name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Identity(Arc::from(name.as_ref()))
    }

    /// The fully qualified name of `T`.
    ///
    /// ```
    /// use decorum::Identity;
    ///
    /// struct CreateOrder;
    /// assert!(Identity::of::<CreateOrder>().as_str().ends_with("CreateOrder"));
    /// ```
    pub fn of<T: ?Sized>() -> Self {
        Identity::new(std::any::type_name::<T>())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Identity").field(&&*self.0).finish()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(name: &str) -> Self {
        Identity::new(name)
    }
}

impl From<String> for Identity {
    fn from(name: String) -> Self {
        Identity(Arc::from(name))
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0.to_string()
    }
}

/// Function handles that know the identity of their concrete logic.
///
/// Validated functions report their logic type; decorators forward the
/// identity they resolved from the handle they wrap.
pub trait Identified {
    /// Identity of the innermost concrete implementation.
    fn identity(&self) -> Identity;
}

impl<T: Identified + ?Sized> Identified for Arc<T> {
    fn identity(&self) -> Identity {
        (**self).identity()
    }
}

impl<T: Identified + ?Sized> Identified for Box<T> {
    fn identity(&self) -> Identity {
        (**self).identity()
    }
}
