use crate::{Body, Content, Request, Response};
use arrange_core::error::BoxError;
use arrange_core::service::{BoxService, Service};
use http::header::CONTENT_TYPE;
use http::{Method, Uri};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// A minimal http client sending its requests to an arranged transport.
///
/// Usually created with [`ArrangementBuilder::build_client`],
/// but any [`Service`] serving requests can be used.
///
/// [`ArrangementBuilder::build_client`]: crate::ArrangementBuilder::build_client
#[derive(Debug, Clone)]
pub struct ArrangedClient {
    service: BoxService<Request, Response, BoxError>,
}

impl ArrangedClient {
    /// Create a new [`ArrangedClient`] sending its requests to the given service.
    pub fn new<S>(service: S) -> Self
    where
        S: Service<Request, Output = Response, Error = BoxError>,
    {
        Self {
            service: service.boxed(),
        }
    }

    /// Send a request.
    pub async fn send(&self, request: Request) -> Result<Response, BoxError> {
        self.service.serve(request).await
    }

    /// Send a request which is cancelled when the given token fires.
    pub async fn send_with_cancel(
        &self,
        mut request: Request,
        cancel: CancellationToken,
    ) -> Result<Response, BoxError> {
        request.extensions_mut().insert(cancel);
        self.send(request).await
    }

    /// Send a request with the given method, target and optional content.
    pub async fn request<U>(
        &self,
        method: Method,
        uri: U,
        content: Option<Content>,
    ) -> Result<Response, BoxError>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        let builder = http::Request::builder().method(method).uri(uri);
        let request = match content {
            Some(content) => {
                let (bytes, content_type) = content.into_parts();
                builder
                    .header(CONTENT_TYPE, content_type)
                    .body(Body::from(bytes))?
            }
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    /// Send a `GET` request for the given target.
    pub async fn get<U>(&self, uri: U) -> Result<Response, BoxError>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
    {
        self.request(Method::GET, uri, None).await
    }

    /// Send a `POST` request with the given value as JSON body.
    pub async fn post_json<U, T>(&self, uri: U, value: &T) -> Result<Response, BoxError>
    where
        Uri: TryFrom<U>,
        <Uri as TryFrom<U>>::Error: Into<http::Error>,
        T: Serialize + ?Sized,
    {
        let content = Content::json(value)?;
        self.request(Method::POST, uri, Some(content)).await
    }
}

impl From<crate::ArrangedService> for ArrangedClient {
    fn from(service: crate::ArrangedService) -> Self {
        Self::new(service)
    }
}
