//! Errors produced while dispatching arranged requests.
//!
//! Errors returned by response producers are passed through untouched,
//! these are the errors the arrangement itself can fail with.

use crate::CapturedRequest;
use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use std::fmt;

/// No registered case handler accepted the request.
///
/// Carries the full snapshot of the rejected request,
/// so the failure explains itself. The alternate display format (`{:#}`)
/// also lists the headers and body of the request.
#[derive(Debug, Clone)]
pub struct UnhandledRequestError {
    request: CapturedRequest,
}

impl UnhandledRequestError {
    /// Create a new [`UnhandledRequestError`] for the given request.
    #[must_use]
    pub fn new(request: CapturedRequest) -> Self {
        Self { request }
    }

    /// The snapshot of the request nobody accepted.
    #[must_use]
    pub fn request(&self) -> &CapturedRequest {
        &self.request
    }

    /// Consume the error, returning the snapshot of the request.
    #[must_use]
    pub fn into_request(self) -> CapturedRequest {
        self.request
    }

    /// The method of the unhandled request.
    #[must_use]
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// The target of the unhandled request.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    /// The headers of the unhandled request.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// The body bytes of the unhandled request, if any.
    #[must_use]
    pub fn raw_body(&self) -> Option<&Bytes> {
        self.request.raw_body()
    }

    /// The decoded body of the unhandled request, if any.
    #[must_use]
    pub fn decoded_body(&self) -> Option<&str> {
        self.request.decoded_body()
    }
}

impl fmt::Display for UnhandledRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no handlers registered for request: {} {}",
            self.request.method(),
            self.request.uri()
        )?;
        if f.alternate() {
            for (name, value) in self.request.headers() {
                write!(f, "\n{name}: {value:?}")?;
            }
            match (self.request.decoded_body(), self.request.raw_body()) {
                (Some(text), _) => write!(f, "\n\n{text}")?,
                (None, Some(bytes)) => write!(f, "\n\n<{} bytes>", bytes.len())?,
                (None, None) => (),
            }
        }
        Ok(())
    }
}

impl std::error::Error for UnhandledRequestError {}

arrange_core::macros::static_str_error! {
    /// Returned by a case handler which was built without a responder.
    pub struct ResponseNotConfiguredError = "response not configured";

    /// Returned when the dispatch was cancelled before a response was produced.
    pub struct DispatchCancelledError = "dispatch cancelled before a response was produced";
}
