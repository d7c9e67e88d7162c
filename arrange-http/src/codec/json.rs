use super::BodyCodec;
use crate::CapturedRequest;
use arrange_core::error::{ErrorContext, OpaqueError};
use bytes::Bytes;
use http::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// [`BodyCodec`] for `application/json` bodies.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Create a new [`JsonCodec`] producing compact JSON.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Produce pretty printed JSON.
    #[must_use]
    pub const fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}

impl BodyCodec for JsonCodec {
    fn content_type(&self) -> HeaderValue {
        HeaderValue::from_static("application/json; charset=utf-8")
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, OpaqueError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        }
        .context("encode value as JSON")?;
        Ok(bytes.into())
    }

    fn decode_slice<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, OpaqueError> {
        serde_json::from_slice(bytes).context("decode JSON body")
    }

    /// Decodes the text of the request body,
    /// which respects the charset declared by the request.
    fn decode<T: DeserializeOwned>(&self, request: &CapturedRequest) -> Result<T, OpaqueError> {
        let text = request
            .decoded_body()
            .context("decode JSON from request without text body")?;
        serde_json::from_str(text).context("decode JSON body")
    }
}
