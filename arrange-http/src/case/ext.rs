use super::{
    AcceptAll, AcceptMethod, AcceptRoute, AcceptUri, AcceptWhen, CaseHandlerBuilder, accept_fn,
    responder_fn,
};
use crate::codec::{BodyCodec, Content, JsonCodec};
use crate::{CapturedRequest, Response, ResponseBuilder};
use arrange_core::error::BoxError;
use http::{Method, StatusCode, Uri};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[cfg(feature = "xml")]
use crate::codec::XmlCodec;

/// Accept rules.
impl CaseHandlerBuilder {
    /// Accept every request.
    #[must_use]
    pub fn accept_all(self) -> Self {
        self.with_accept_rule(AcceptAll)
    }

    /// Accept requests with the given method.
    #[must_use]
    pub fn accept_method(self, method: Method) -> Self {
        self.with_accept_rule(AcceptMethod::new(method))
    }

    /// Accept requests for the given target.
    #[must_use]
    pub fn accept_uri(self, uri: impl fmt::Display) -> Self {
        self.with_accept_rule(AcceptUri::new(uri))
    }

    /// Accept requests whose target satisfies the predicate.
    #[must_use]
    pub fn accept_uri_fn<F>(self, predicate: F) -> Self
    where
        F: Fn(&Uri) -> bool + Send + Sync + 'static,
    {
        self.accept_when(move |request| predicate(request.uri()))
    }

    /// Accept requests with the given method and target.
    #[must_use]
    pub fn accept_route(self, method: Method, uri: impl fmt::Display) -> Self {
        self.with_accept_rule(AcceptRoute::new(method, uri))
    }

    /// Accept requests whose method and target satisfy the predicate.
    #[must_use]
    pub fn accept_route_fn<F>(self, predicate: F) -> Self
    where
        F: Fn(&Method, &Uri) -> bool + Send + Sync + 'static,
    {
        self.accept_when(move |request| predicate(request.method(), request.uri()))
    }

    /// Accept requests satisfying the synchronous predicate.
    #[must_use]
    pub fn accept_when<F>(self, predicate: F) -> Self
    where
        F: Fn(&CapturedRequest) -> bool + Send + Sync + 'static,
    {
        self.with_accept_rule(AcceptWhen::new(predicate))
    }

    /// Accept requests satisfying the asynchronous predicate.
    #[must_use]
    pub fn accept_async<F, Fut>(self, predicate: F) -> Self
    where
        F: Fn(CapturedRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.with_accept_rule(accept_fn(predicate))
    }

    /// Accept requests whose method, target and decoded body satisfy the predicate.
    ///
    /// The body is decoded with the given codec. A missing or undecodable
    /// body is replaced by `default` before the predicate sees it.
    #[must_use]
    pub fn accept_route_with_codec<C, T, F>(self, codec: C, default: T, predicate: F) -> Self
    where
        C: BodyCodec,
        T: DeserializeOwned + Clone + Send + Sync + 'static,
        F: Fn(&Method, &Uri, &T) -> bool + Send + Sync + 'static,
    {
        self.accept_when(move |request| {
            let body = codec.decode_or(request, default.clone());
            predicate(request.method(), request.uri(), &body)
        })
    }

    /// Accept requests whose method, target and JSON body satisfy the predicate.
    ///
    /// See [`Self::accept_route_with_codec`].
    #[must_use]
    pub fn accept_route_json<T, F>(self, default: T, predicate: F) -> Self
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
        F: Fn(&Method, &Uri, &T) -> bool + Send + Sync + 'static,
    {
        self.accept_route_with_codec(JsonCodec::new(), default, predicate)
    }

    /// Accept requests whose method, target and XML body satisfy the predicate.
    ///
    /// See [`Self::accept_route_with_codec`].
    #[cfg(feature = "xml")]
    #[cfg_attr(docsrs, doc(cfg(feature = "xml")))]
    #[must_use]
    pub fn accept_route_xml<T, F>(self, default: T, predicate: F) -> Self
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
        F: Fn(&Method, &Uri, &T) -> bool + Send + Sync + 'static,
    {
        self.accept_route_with_codec(XmlCodec::new(), default, predicate)
    }
}

/// Responders.
impl CaseHandlerBuilder {
    /// Respond with an empty response of the given status.
    #[must_use]
    pub fn respond_status(self, status: StatusCode) -> Self {
        self.with_response_handler(responder_fn(move |_, _| {
            std::future::ready(Ok::<_, BoxError>(
                ResponseBuilder::new().with_status(status).build(),
            ))
        }))
    }

    /// Respond with the given status and content.
    #[must_use]
    pub fn respond_static_content(self, status: StatusCode, content: Content) -> Self {
        self.with_response_handler(responder_fn(move |_, _| {
            std::future::ready(Ok::<_, BoxError>(
                ResponseBuilder::new()
                    .with_status(status)
                    .with_content(content.clone())
                    .build(),
            ))
        }))
    }

    /// Respond with the response built by the given function.
    ///
    /// The function receives a [`ResponseBuilder`] which already
    /// carries the request as [`OriginalRequest`].
    ///
    /// [`OriginalRequest`]: crate::OriginalRequest
    #[must_use]
    pub fn respond_with<F>(self, build: F) -> Self
    where
        F: Fn(ResponseBuilder, &CapturedRequest) -> ResponseBuilder + Send + Sync + 'static,
    {
        self.with_response_handler(responder_fn(move |request: CapturedRequest, _| {
            let builder = ResponseBuilder::new().with_request(request.clone());
            std::future::ready(Ok::<_, BoxError>(build(builder, &request).build()))
        }))
    }

    /// Respond with the response built by the given async function.
    ///
    /// See [`Self::respond_with`].
    #[must_use]
    pub fn respond_with_async<F, Fut>(self, build: F) -> Self
    where
        F: Fn(ResponseBuilder, CapturedRequest, CancellationToken) -> Fut
            + Send
            + Sync
            + 'static,
        Fut: Future<Output = Result<ResponseBuilder, BoxError>> + Send + 'static,
    {
        self.with_response_handler(responder_fn(move |request: CapturedRequest, cancel| {
            let builder = ResponseBuilder::new().with_request(request.clone());
            let future = build(builder, request, cancel);
            async move { Ok::<_, BoxError>(future.await?.build()) }
        }))
    }

    /// Respond with the given status and the value encoded by the codec.
    ///
    /// The value is encoded for every response, encoding errors
    /// are returned as the error of the response.
    #[must_use]
    pub fn respond_content_with_codec<C, T>(self, codec: C, status: StatusCode, value: T) -> Self
    where
        C: BodyCodec,
        T: Serialize + Send + Sync + 'static,
    {
        self.with_response_handler(responder_fn(move |_, _| {
            std::future::ready(encoded_response(&codec, status, &value, None))
        }))
    }

    /// Respond with a status and value derived from the decoded request body.
    ///
    /// A missing or undecodable body is replaced by `default`.
    #[must_use]
    pub fn respond_derived_with_codec<C, Req, Resp, F>(
        self,
        codec: C,
        default: Req,
        derive: F,
    ) -> Self
    where
        C: BodyCodec,
        Req: DeserializeOwned + Clone + Send + Sync + 'static,
        Resp: Serialize,
        F: Fn(Req) -> (StatusCode, Resp) + Send + Sync + 'static,
    {
        self.with_response_handler(responder_fn(move |request: CapturedRequest, _| {
            let body = codec.decode_or(&request, default.clone());
            let (status, value) = derive(body);
            std::future::ready(encoded_response(&codec, status, &value, Some(request)))
        }))
    }

    /// Async variant of [`Self::respond_derived_with_codec`].
    #[must_use]
    pub fn respond_derived_with_codec_async<C, Req, Resp, F, Fut>(
        self,
        codec: C,
        default: Req,
        derive: F,
    ) -> Self
    where
        C: BodyCodec,
        Req: DeserializeOwned + Clone + Send + Sync + 'static,
        Resp: Serialize + Send,
        F: Fn(Req, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = (StatusCode, Resp)> + Send + 'static,
    {
        let codec = Arc::new(codec);
        self.with_response_handler(responder_fn(move |request: CapturedRequest, cancel| {
            let codec = codec.clone();
            let body = codec.decode_or(&request, default.clone());
            let future = derive(body, cancel);
            async move {
                let (status, value) = future.await;
                encoded_response(codec.as_ref(), status, &value, Some(request))
            }
        }))
    }

    /// Respond with a status and value derived from the captured request by an async function.
    #[must_use]
    pub fn respond_request_with_codec_async<C, Resp, F, Fut>(self, codec: C, derive: F) -> Self
    where
        C: BodyCodec,
        Resp: Serialize + Send,
        F: Fn(CapturedRequest, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = (StatusCode, Resp)> + Send + 'static,
    {
        let codec = Arc::new(codec);
        self.with_response_handler(responder_fn(move |request: CapturedRequest, cancel| {
            let codec = codec.clone();
            let future = derive(request, cancel);
            async move {
                let (status, value) = future.await;
                encoded_response(codec.as_ref(), status, &value, None)
            }
        }))
    }

    /// Respond with the given status and the value as JSON.
    #[must_use]
    pub fn respond_content_json<T>(self, status: StatusCode, value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        self.respond_content_with_codec(JsonCodec::new(), status, value)
    }

    /// Respond with a status and JSON value derived from the JSON request body.
    ///
    /// See [`Self::respond_derived_with_codec`].
    #[must_use]
    pub fn respond_derived_json<Req, Resp, F>(self, default: Req, derive: F) -> Self
    where
        Req: DeserializeOwned + Clone + Send + Sync + 'static,
        Resp: Serialize,
        F: Fn(Req) -> (StatusCode, Resp) + Send + Sync + 'static,
    {
        self.respond_derived_with_codec(JsonCodec::new(), default, derive)
    }

    /// Async variant of [`Self::respond_derived_json`].
    #[must_use]
    pub fn respond_derived_json_async<Req, Resp, F, Fut>(self, default: Req, derive: F) -> Self
    where
        Req: DeserializeOwned + Clone + Send + Sync + 'static,
        Resp: Serialize + Send,
        F: Fn(Req, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = (StatusCode, Resp)> + Send + 'static,
    {
        self.respond_derived_with_codec_async(JsonCodec::new(), default, derive)
    }

    /// Respond with a status and JSON value derived from the captured request.
    #[must_use]
    pub fn respond_request_json_async<Resp, F, Fut>(self, derive: F) -> Self
    where
        Resp: Serialize + Send,
        F: Fn(CapturedRequest, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = (StatusCode, Resp)> + Send + 'static,
    {
        self.respond_request_with_codec_async(JsonCodec::new(), derive)
    }

    /// Respond with the given status and the value as XML.
    #[cfg(feature = "xml")]
    #[cfg_attr(docsrs, doc(cfg(feature = "xml")))]
    #[must_use]
    pub fn respond_content_xml<T>(self, status: StatusCode, value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        self.respond_content_with_codec(XmlCodec::new(), status, value)
    }

    /// Respond with a status and XML value derived from the XML request body.
    ///
    /// See [`Self::respond_derived_with_codec`].
    #[cfg(feature = "xml")]
    #[cfg_attr(docsrs, doc(cfg(feature = "xml")))]
    #[must_use]
    pub fn respond_derived_xml<Req, Resp, F>(self, default: Req, derive: F) -> Self
    where
        Req: DeserializeOwned + Clone + Send + Sync + 'static,
        Resp: Serialize,
        F: Fn(Req) -> (StatusCode, Resp) + Send + Sync + 'static,
    {
        self.respond_derived_with_codec(XmlCodec::new(), default, derive)
    }

    /// Async variant of [`Self::respond_derived_xml`].
    #[cfg(feature = "xml")]
    #[cfg_attr(docsrs, doc(cfg(feature = "xml")))]
    #[must_use]
    pub fn respond_derived_xml_async<Req, Resp, F, Fut>(self, default: Req, derive: F) -> Self
    where
        Req: DeserializeOwned + Clone + Send + Sync + 'static,
        Resp: Serialize + Send,
        F: Fn(Req, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = (StatusCode, Resp)> + Send + 'static,
    {
        self.respond_derived_with_codec_async(XmlCodec::new(), default, derive)
    }

    /// Respond with a status and XML value derived from the captured request.
    #[cfg(feature = "xml")]
    #[cfg_attr(docsrs, doc(cfg(feature = "xml")))]
    #[must_use]
    pub fn respond_request_xml_async<Resp, F, Fut>(self, derive: F) -> Self
    where
        Resp: Serialize + Send,
        F: Fn(CapturedRequest, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = (StatusCode, Resp)> + Send + 'static,
    {
        self.respond_request_with_codec_async(XmlCodec::new(), derive)
    }
}

fn encoded_response<C, T>(
    codec: &C,
    status: StatusCode,
    value: &T,
    request: Option<CapturedRequest>,
) -> Result<Response, BoxError>
where
    C: BodyCodec,
    T: Serialize + ?Sized,
{
    let content = codec.content(value)?;
    let mut builder = ResponseBuilder::new()
        .with_status(status)
        .with_content(content);
    if let Some(request) = request {
        builder.set_request(request);
    }
    Ok(builder.build())
}
