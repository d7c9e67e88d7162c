//! Immutable snapshots of outbound requests.
//!
//! A request reaching an [`ArrangedService`] is captured exactly once into a
//! [`CapturedRequest`]. Every accept rule and the chosen responder observe
//! that same frozen value, so a body is read only once no matter how many
//! case handlers inspect it.
//!
//! [`ArrangedService`]: crate::ArrangedService

use crate::Body;
use arrange_core::error::{BoxError, ErrorContext, OpaqueError};
use arrange_core::telemetry::tracing;
use bytes::Bytes;
use http::{Extensions, HeaderMap, Method, Uri, Version};
use http_body_util::BodyExt;
use std::sync::Arc;

mod decode;

/// How the protocol version of a request may be negotiated
/// by the transport that eventually sends it.
///
/// Carried through a [`CapturedRequest`] unchanged. Insert it in the request
/// extensions to declare it; requests without one use the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VersionPolicy {
    /// Use the requested version or downgrade to a lower one.
    #[default]
    RequestVersionOrLower,
    /// Use the requested version or upgrade to a higher one.
    RequestVersionOrHigher,
    /// Only the requested version is acceptable.
    RequestVersionExact,
}

/// Immutable snapshot of an outbound request.
///
/// Cloning is cheap: all captured parts are shared.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    method: Method,
    uri: Uri,
    version: Version,
    version_policy: VersionPolicy,
    headers: HeaderMap,
    options: Extensions,
    raw_body: Option<Bytes>,
    decoded_body: Option<String>,
}

impl CapturedRequest {
    /// Capture the given request, reading its body into memory.
    ///
    /// A body that reports the end of its stream before any frame is read is
    /// captured as absent, as is a body which ends without yielding any data.
    /// Failing to read the body stream is an error,
    /// failing to decode it as text is not (the decoded body is absent instead).
    pub async fn capture<B>(request: http::Request<B>) -> Result<Self, OpaqueError>
    where
        B: http_body::Body<Error: Into<BoxError>>,
    {
        let (parts, body) = request.into_parts();
        let raw_body = if body.is_end_stream() {
            None
        } else {
            let collected = body
                .collect()
                .await
                .context("capture request body")?;
            Some(collected.to_bytes()).filter(|bytes| !bytes.is_empty())
        };
        Ok(Self::from_parts(parts, raw_body))
    }

    /// Create a snapshot from the parts of a request and its already buffered body.
    #[must_use]
    pub fn from_parts(parts: http::request::Parts, raw_body: Option<Bytes>) -> Self {
        let http::request::Parts {
            method,
            uri,
            version,
            headers,
            extensions,
            ..
        } = parts;

        let version_policy = extensions
            .get::<VersionPolicy>()
            .copied()
            .unwrap_or_default();

        let decoded_body = raw_body.as_ref().and_then(|bytes| {
            let encoding = decode::declared_encoding(&headers);
            let text = decode::decode_text(encoding, bytes);
            tracing::trace!(
                http.request.body.size = bytes.len(),
                body.charset = encoding.name(),
                body.decoded = text.is_some(),
                "captured request body",
            );
            text
        });

        Self {
            inner: Arc::new(Inner {
                method,
                uri,
                version,
                version_policy,
                headers,
                options: extensions,
                raw_body,
                decoded_body,
            }),
        }
    }

    /// Create a snapshot from a fully buffered request.
    ///
    /// An empty buffer is captured as an absent body.
    #[must_use]
    pub fn from_request(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self::from_parts(parts, (!body.is_empty()).then_some(body))
    }

    /// Rebuild a request from this snapshot, replaying the captured body.
    pub fn to_request(&self) -> http::Request<Body> {
        let body = self
            .inner
            .raw_body
            .clone()
            .map(Body::from)
            .unwrap_or_default();

        let mut request = http::Request::new(body);
        *request.method_mut() = self.inner.method.clone();
        *request.uri_mut() = self.inner.uri.clone();
        *request.version_mut() = self.inner.version;
        *request.headers_mut() = self.inner.headers.clone();
        *request.extensions_mut() = self.inner.options.clone();
        request
    }

    /// The request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.inner.method
    }

    /// The request target.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.inner.uri
    }

    /// The requested protocol version.
    #[must_use]
    pub fn version(&self) -> Version {
        self.inner.version
    }

    /// The version negotiation policy of the request.
    #[must_use]
    pub fn version_policy(&self) -> VersionPolicy {
        self.inner.version_policy
    }

    /// The request headers, content headers included.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Out-of-band metadata attached to the original request.
    #[must_use]
    pub fn options(&self) -> &Extensions {
        &self.inner.options
    }

    /// The captured body bytes, absent when no body was sent.
    #[must_use]
    pub fn raw_body(&self) -> Option<&Bytes> {
        self.inner.raw_body.as_ref()
    }

    /// The captured body decoded as text using the declared charset (or UTF-8).
    ///
    /// Absent when no body was sent or when it could not be decoded.
    #[must_use]
    pub fn decoded_body(&self) -> Option<&str> {
        self.inner.decoded_body.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BodyExtractExt;
    use http::header::CONTENT_TYPE;

    #[derive(Debug, Clone, PartialEq)]
    struct TraceTag(&'static str);

    #[tokio::test]
    async fn capture_without_body() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("https://example.com/items")
            .header("accept", "application/json")
            .body(Body::empty())
            .unwrap();

        let captured = CapturedRequest::capture(request).await.unwrap();
        assert_eq!(captured.method(), Method::POST);
        assert_eq!(captured.uri(), "https://example.com/items");
        assert_eq!(captured.headers()["accept"], "application/json");
        assert!(captured.raw_body().is_none());
        assert!(captured.decoded_body().is_none());
    }

    #[tokio::test]
    async fn capture_streamed_body_without_data() {
        let mut trailers = HeaderMap::new();
        trailers.insert("x-done", http::HeaderValue::from_static("1"));
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/items")
            .body(Body::with_trailers(Bytes::new(), trailers))
            .unwrap();

        let captured = CapturedRequest::capture(request).await.unwrap();
        assert!(captured.raw_body().is_none());
        assert!(captured.decoded_body().is_none());

        let buffered = CapturedRequest::from_request(http::Request::new(Bytes::new()));
        assert_eq!(buffered.raw_body(), captured.raw_body());
    }

    #[tokio::test]
    async fn capture_with_json_body() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/sum")
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(Body::from(r#"{"n":3}"#))
            .unwrap();

        let captured = CapturedRequest::capture(request).await.unwrap();
        assert_eq!(captured.raw_body().unwrap().as_ref(), br#"{"n":3}"#);
        assert_eq!(captured.decoded_body(), Some(r#"{"n":3}"#));
    }

    #[tokio::test]
    async fn capture_latin1_body() {
        let request = http::Request::builder()
            .uri("/")
            .header(CONTENT_TYPE, "text/plain; charset=iso-8859-1")
            .body(Body::from(&b"caf\xe9"[..]))
            .unwrap();

        let captured = CapturedRequest::capture(request).await.unwrap();
        assert_eq!(captured.decoded_body(), Some("café"));
    }

    #[tokio::test]
    async fn capture_invalid_utf8_body() {
        let request = http::Request::builder()
            .uri("/")
            .body(Body::from(vec![0xc3, 0x28]))
            .unwrap();

        let captured = CapturedRequest::capture(request).await.unwrap();
        assert_eq!(captured.raw_body().unwrap().len(), 2);
        assert!(captured.decoded_body().is_none());
    }

    #[tokio::test]
    async fn capture_keeps_options_and_version_policy() {
        let mut request = http::Request::new(Body::empty());
        *request.version_mut() = Version::HTTP_2;
        request.extensions_mut().insert(TraceTag("abc"));
        request
            .extensions_mut()
            .insert(VersionPolicy::RequestVersionExact);

        let captured = CapturedRequest::capture(request).await.unwrap();
        assert_eq!(captured.version(), Version::HTTP_2);
        assert_eq!(
            captured.version_policy(),
            VersionPolicy::RequestVersionExact
        );
        assert_eq!(captured.options().get::<TraceTag>(), Some(&TraceTag("abc")));
    }

    #[test]
    fn default_version_policy() {
        let captured = CapturedRequest::from_request(http::Request::new(Bytes::new()));
        assert_eq!(
            captured.version_policy(),
            VersionPolicy::RequestVersionOrLower
        );
        assert!(captured.raw_body().is_none());
    }

    #[test]
    fn clones_share_the_snapshot() {
        let captured =
            CapturedRequest::from_request(http::Request::new(Bytes::from_static(b"hello")));
        let clone = captured.clone();
        assert!(Arc::ptr_eq(&captured.inner, &clone.inner));
    }

    #[tokio::test]
    async fn to_request_replays_body() {
        let request = http::Request::builder()
            .method(Method::PUT)
            .uri("/items/1")
            .header("x-id", "1")
            .body(Bytes::from_static(b"payload"))
            .unwrap();
        let captured = CapturedRequest::from_request(request);

        let replayed = captured.to_request();
        assert_eq!(replayed.method(), Method::PUT);
        assert_eq!(replayed.uri(), "/items/1");
        assert_eq!(replayed.headers()["x-id"], "1");
        assert_eq!(replayed.try_into_string().await.unwrap(), "payload");
    }
}
