//! Tracing span support for effects.
//!
//! The span is entered while the effect runs, on every run.

use tracing::Span;

use crate::effect::Eff;

impl<T: 'static> Eff<T> {
    /// Run this effect inside `span`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use decorum::Eff;
    ///
    /// let effect = Eff::pure(42).instrument(tracing::info_span!("answer"));
    /// assert_eq!(effect.run(), Ok(42));
    /// ```
    pub fn instrument(self, span: Span) -> Eff<T> {
        Eff::from_fn(move || {
            let _entered = span.enter();
            self.run()
        })
    }
}

#[cfg(feature = "async")]
impl<T: Send + 'static> crate::effect::Aff<T> {
    /// Run this effect inside `span`.
    ///
    /// Follows the `tracing::Instrument` pattern: the span is entered on
    /// every poll of the running effect.
    pub fn instrument(self, span: Span) -> crate::effect::Aff<T> {
        use tracing::Instrument as _;

        crate::effect::Aff::from_run_fn(move |cancel: tokio_util::sync::CancellationToken| {
            let inner = self.clone();
            async move { inner.run(&cancel).await }.instrument(span.clone())
        })
    }
}
