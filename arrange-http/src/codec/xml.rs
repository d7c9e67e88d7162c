use super::BodyCodec;
use crate::CapturedRequest;
use arrange_core::error::{ErrorContext, OpaqueError};
use bytes::Bytes;
use http::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// [`BodyCodec`] for XML bodies.
///
/// The root element is named after the serialized type,
/// unless a root name is set.
#[derive(Debug, Clone)]
pub struct XmlCodec {
    root: Option<Cow<'static, str>>,
    content_type: HeaderValue,
}

impl Default for XmlCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlCodec {
    /// Create a new [`XmlCodec`] producing `application/xml` content.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            content_type: HeaderValue::from_static("application/xml"),
        }
    }

    /// Name the root element of encoded values.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<Cow<'static, str>>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set the content type of encoded values, e.g. `text/xml`.
    #[must_use]
    pub fn with_content_type(mut self, content_type: HeaderValue) -> Self {
        self.content_type = content_type;
        self
    }
}

impl BodyCodec for XmlCodec {
    fn content_type(&self) -> HeaderValue {
        self.content_type.clone()
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, OpaqueError> {
        let xml = match &self.root {
            Some(root) => quick_xml::se::to_string_with_root(root, value),
            None => quick_xml::se::to_string(value),
        }
        .context("encode value as XML")?;
        Ok(xml.into())
    }

    fn decode_slice<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, OpaqueError> {
        quick_xml::de::from_reader(bytes).context("decode XML body")
    }

    /// Decodes the text of the request body,
    /// which respects the charset declared by the request.
    fn decode<T: DeserializeOwned>(&self, request: &CapturedRequest) -> Result<T, OpaqueError> {
        let text = request
            .decoded_body()
            .context("decode XML from request without text body")?;
        quick_xml::de::from_str(text).context("decode XML body")
    }
}
