use crate::{CapturedRequest, ResponseNotConfiguredError, Response};
use arrange_core::Service;
use arrange_core::error::BoxError;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Produces the response of a case handler for an accepted request.
///
/// The [`CancellationToken`] fires when the caller abandons the dispatch,
/// long running producers can observe it to stop early.
pub trait Responder: Send + Sync + 'static {
    /// Produce a response for the accepted request.
    fn respond(
        &self,
        request: CapturedRequest,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<Response, BoxError>> + Send + '_;

    /// Box this responder to allow for dynamic dispatch.
    fn boxed(self) -> BoxResponder
    where
        Self: Sized,
    {
        BoxResponder::new(self)
    }
}

trait DynResponder {
    fn respond_box(
        &self,
        request: CapturedRequest,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<Response, BoxError>> + Send + '_>>;
}

impl<R: Responder> DynResponder for R {
    fn respond_box(
        &self,
        request: CapturedRequest,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<Response, BoxError>> + Send + '_>> {
        Box::pin(self.respond(request, cancel))
    }
}

/// A boxed [`Responder`], for where you require dynamic dispatch.
#[derive(Clone)]
pub struct BoxResponder {
    inner: Arc<dyn DynResponder + Send + Sync + 'static>,
}

impl BoxResponder {
    /// Create a new [`BoxResponder`] from the given responder.
    pub fn new(responder: impl Responder) -> Self {
        Self {
            inner: Arc::new(responder),
        }
    }

    /// A responder which always fails with a [`ResponseNotConfiguredError`].
    pub fn not_configured() -> Self {
        Self::new(NotConfigured)
    }
}

impl Default for BoxResponder {
    fn default() -> Self {
        Self::not_configured()
    }
}

impl fmt::Debug for BoxResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxResponder").finish()
    }
}

impl Responder for BoxResponder {
    fn respond(
        &self,
        request: CapturedRequest,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<Response, BoxError>> + Send + '_ {
        self.inner.respond_box(request, cancel)
    }

    fn boxed(self) -> BoxResponder {
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct NotConfigured;

impl Responder for NotConfigured {
    fn respond(
        &self,
        _request: CapturedRequest,
        _cancel: CancellationToken,
    ) -> impl Future<Output = Result<Response, BoxError>> + Send + '_ {
        std::future::ready(Err(ResponseNotConfiguredError::new().into()))
    }
}

/// Create a [`Responder`] from an async closure.
pub fn responder_fn<F, Fut>(f: F) -> ResponderFn<F>
where
    F: Fn(CapturedRequest, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
{
    ResponderFn(f)
}

/// A [`Responder`] implemented by an async closure, created with [`responder_fn`].
#[derive(Clone)]
pub struct ResponderFn<F>(F);

impl<F> fmt::Debug for ResponderFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResponderFn")
            .field(&format_args!("{}", std::any::type_name::<F>()))
            .finish()
    }
}

impl<F, Fut> Responder for ResponderFn<F>
where
    F: Fn(CapturedRequest, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
{
    fn respond(
        &self,
        request: CapturedRequest,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<Response, BoxError>> + Send + '_ {
        (self.0)(request, cancel)
    }
}

/// A [`Responder`] backed by a [`Service`] serving captured requests.
///
/// The cancellation token is not passed to the service,
/// the dispatch still stops waiting for it once cancelled.
#[derive(Debug, Clone)]
pub struct ServiceResponder<S>(S);

impl<S> ServiceResponder<S> {
    /// Create a new [`ServiceResponder`] from the given service.
    pub const fn new(service: S) -> Self {
        Self(service)
    }
}

impl<S> Responder for ServiceResponder<S>
where
    S: Service<CapturedRequest, Output = Response, Error: Into<BoxError>>,
{
    async fn respond(
        &self,
        request: CapturedRequest,
        _cancel: CancellationToken,
    ) -> Result<Response, BoxError> {
        self.0.serve(request).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BodyExtractExt;
    use arrange_core::service::service_fn;
    use bytes::Bytes;
    use http::StatusCode;

    fn request() -> CapturedRequest {
        CapturedRequest::from_request(http::Request::new(Bytes::from_static(b"ping")))
    }

    #[tokio::test]
    async fn not_configured_responder() {
        let err = BoxResponder::default()
            .respond(request(), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is::<ResponseNotConfiguredError>());
    }

    #[tokio::test]
    async fn responder_fn_echo() {
        let responder = responder_fn(|req: CapturedRequest, _| async move {
            let body = req.decoded_body().unwrap_or_default().to_owned();
            Ok(Response::new(body.into()))
        });
        let response = responder
            .respond(request(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(response.try_into_string().await.unwrap(), "ping");
    }

    #[tokio::test]
    async fn service_responder() {
        let responder = ServiceResponder::new(service_fn(|req: CapturedRequest| async move {
            let mut response = Response::default();
            *response.status_mut() = if req.raw_body().is_some() {
                StatusCode::ACCEPTED
            } else {
                StatusCode::NO_CONTENT
            };
            Ok::<_, BoxError>(response)
        }))
        .boxed();
        let response = responder
            .respond(request(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
