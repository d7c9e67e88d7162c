//! Body codecs and typed content.
//!
//! A [`BodyCodec`] turns values into typed response content
//! and captured request bodies back into values.
//! Decoding a request body can fall back to a default value
//! ([`BodyCodec::decode_or`]), so arranged rules and responders never fail
//! just because a client sent a body they did not expect.

use crate::CapturedRequest;
use arrange_core::error::{ErrorContext, OpaqueError};
use arrange_core::telemetry::tracing;
use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use http::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;

mod json;
pub use json::JsonCodec;

#[cfg(feature = "xml")]
mod xml;
#[cfg(feature = "xml")]
#[cfg_attr(docsrs, doc(cfg(feature = "xml")))]
pub use xml::XmlCodec;

/// Encodes values into bodies of a content type and decodes them back.
pub trait BodyCodec: Send + Sync + 'static {
    /// The content type of the bodies produced by this codec.
    fn content_type(&self) -> HeaderValue;

    /// Encode a value into a body.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, OpaqueError>;

    /// Decode a value from body bytes.
    fn decode_slice<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, OpaqueError>;

    /// Decode a value from the body of a captured request.
    ///
    /// Fails if the request has no body.
    fn decode<T: DeserializeOwned>(&self, request: &CapturedRequest) -> Result<T, OpaqueError> {
        let bytes = request.raw_body().context("decode request without body")?;
        self.decode_slice(bytes)
    }

    /// Decode a value from the body of a captured request,
    /// falling back to the default if the body is absent or cannot be decoded.
    fn decode_or<T: DeserializeOwned>(&self, request: &CapturedRequest, default: T) -> T {
        match self.decode(request) {
            Ok(value) => value,
            Err(err) => {
                tracing::trace!(
                    http.request.method = %request.method(),
                    url.full = %request.uri(),
                    "use default for undecodable request body: {err}",
                );
                default
            }
        }
    }

    /// Encode a value into [`Content`] of this codec's content type.
    fn content<T: Serialize + ?Sized>(&self, value: &T) -> Result<Content, OpaqueError> {
        let bytes = self.encode(value)?;
        Ok(Content::new(bytes, self.content_type()))
    }
}

/// A body together with its content type.
#[derive(Debug, Clone)]
pub struct Content {
    bytes: Bytes,
    content_type: HeaderValue,
}

impl Content {
    /// Create new [`Content`] from raw bytes and a content type.
    pub fn new(bytes: impl Into<Bytes>, content_type: HeaderValue) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
        }
    }

    /// Plain text content, encoded as UTF-8.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(
            text.into(),
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )
    }

    /// Plain text content in the given encoding.
    ///
    /// Characters the encoding cannot represent are written as numeric character references.
    pub fn text_with_charset(text: &str, encoding: &'static Encoding) -> Self {
        let encoding = encoding.output_encoding();
        if encoding == UTF_8 {
            return Self::text(text);
        }
        let (bytes, _, _) = encoding.encode(text);
        let content_type = format!("text/plain; charset={}", encoding.name().to_ascii_lowercase());
        Self::new(
            bytes.into_owned(),
            HeaderValue::from_str(&content_type)
                .unwrap_or_else(|_| HeaderValue::from_static("text/plain")),
        )
    }

    /// JSON content of the given value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, OpaqueError> {
        JsonCodec::new().content(value)
    }

    /// XML content of the given value.
    #[cfg(feature = "xml")]
    #[cfg_attr(docsrs, doc(cfg(feature = "xml")))]
    pub fn xml<T: Serialize + ?Sized>(value: &T) -> Result<Self, OpaqueError> {
        XmlCodec::new().content(value)
    }

    /// The body bytes.
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// The content type of the body.
    #[must_use]
    pub fn content_type(&self) -> &HeaderValue {
        &self.content_type
    }

    /// Consume the content, returning the body bytes and content type.
    #[must_use]
    pub fn into_parts(self) -> (Bytes, HeaderValue) {
        (self.bytes, self.content_type)
    }
}
