//! Error utilities shared by the arrange crates.
//!
//! Arranged transports fail with a [`BoxError`], so the concrete error of a
//! response producer reaches the test untouched and can be downcast.
//! Failures of the transport itself, such as reading a body or decoding a
//! payload, are reported as an [`OpaqueError`] which carries a short
//! description of what was being done.

use std::error::Error;
use std::fmt::Display;

/// Alias for a type-erased error type.
pub type BoxError = Box<dyn Error + Send + Sync>;

mod opaque;
pub use opaque::OpaqueError;

/// Describe what was being done when a [`Result`] failed or an [`Option`] came back empty.
///
/// ```
/// use arrange_core::error::ErrorContext;
///
/// let err = "x1".parse::<u8>().context("parse retry count").unwrap_err();
/// assert_eq!(err.to_string(), "parse retry count: invalid digit found in string");
///
/// let err = None::<u8>.context("read retry count").unwrap_err();
/// assert_eq!(err.to_string(), "read retry count: value is missing");
/// ```
pub trait ErrorContext<T>: private::Sealed {
    /// Wrap the error, if any, in the given context.
    fn context<C>(self, context: C) -> Result<T, OpaqueError>
    where
        C: Display + Send + Sync + 'static;

    /// Wrap the error, if any, in the context produced by `context`.
    fn with_context<C, F>(self, context: F) -> Result<T, OpaqueError>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn context<C>(self, context: C) -> Result<T, OpaqueError>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|err| OpaqueError::with_context(context, err.into()))
    }

    fn with_context<C, F>(self, context: F) -> Result<T, OpaqueError>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|err| OpaqueError::with_context(context(), err.into()))
    }
}

impl<T> ErrorContext<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T, OpaqueError>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| OpaqueError::with_context(context, missing()))
    }

    fn with_context<C, F>(self, context: F) -> Result<T, OpaqueError>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| OpaqueError::with_context(context(), missing()))
    }
}

fn missing() -> BoxError {
    OpaqueError::from_display("value is missing").into_inner()
}

/// Iterate over `error` followed by its chain of sources.
pub fn sources<'a>(
    error: &'a (dyn Error + 'static),
) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    std::iter::successors(Some(error), |&error| error.source())
}

/// The innermost source of `error`, or `error` itself if it has none.
pub fn root_cause<'a>(error: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
    sources(error).last().unwrap_or(error)
}

mod private {
    pub trait Sealed {}

    impl<T, E> Sealed for Result<T, E> {}
    impl<T> Sealed for Option<T> {}
}
