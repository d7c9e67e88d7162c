//! [`tower_service::Service`] support for [`ArrangedService`],
//! to plug it in wherever a tower http transport is expected.

use crate::service::request_cancellation;
use crate::{ArrangedService, Response};
use arrange_core::error::BoxError;
use std::pin::Pin;
use std::task::{Context, Poll};

impl<B> tower_service::Service<http::Request<B>> for ArrangedService
where
    B: http_body::Body<Data: Send, Error: Into<BoxError>> + Send + 'static,
{
    type Response = Response;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Response, BoxError>> + Send + 'static>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<B>) -> Self::Future {
        let service = self.clone();
        let cancel = request_cancellation(&request);
        Box::pin(async move { service.dispatch(request, cancel).await })
    }
}
