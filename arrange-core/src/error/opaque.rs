use super::BoxError;
use std::error::Error;
use std::fmt::{self, Debug, Display};

/// A type-erased error, optionally described by the context it occurred in.
///
/// Created through [`ErrorContext`](super::ErrorContext) or one of its constructors.
pub struct OpaqueError {
    context: Option<Box<dyn Display + Send + Sync>>,
    inner: BoxError,
}

impl OpaqueError {
    /// Create an [`OpaqueError`] from an error.
    pub fn from_std(error: impl Error + Send + Sync + 'static) -> Self {
        Self::from_boxed(Box::new(error))
    }

    /// Create an [`OpaqueError`] from a message.
    pub fn from_display(message: impl Display + Debug + Send + Sync + 'static) -> Self {
        Self::from_std(Message(message))
    }

    /// Create an [`OpaqueError`] from a boxed error.
    pub fn from_boxed(inner: BoxError) -> Self {
        Self {
            context: None,
            inner,
        }
    }

    pub(super) fn with_context(
        context: impl Display + Send + Sync + 'static,
        inner: BoxError,
    ) -> Self {
        Self {
            context: Some(Box::new(context)),
            inner,
        }
    }

    /// Returns true if the wrapped error is of type `T`.
    pub fn is<T: Error + 'static>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Downcast the wrapped error to a `T`.
    pub fn downcast_ref<T: Error + 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    /// Consume the [`OpaqueError`], returning the wrapped error without its context.
    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

impl Debug for OpaqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => f
                .debug_struct("OpaqueError")
                .field("context", &format_args!("{context}"))
                .field("inner", &self.inner)
                .finish(),
            None => Debug::fmt(&self.inner, f),
        }
    }
}

impl Display for OpaqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{context}: {}", self.inner),
            None => Display::fmt(&self.inner, f),
        }
    }
}

impl Error for OpaqueError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.context {
            Some(_) => Some(self.inner.as_ref()),
            None => self.inner.source(),
        }
    }
}

struct Message<M>(M);

impl<M: Debug> Debug for Message<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl<M: Display> Display for Message<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<M: Display + Debug> Error for Message<M> {}
