use arrange_core::error::{BoxError, ErrorContext, OpaqueError};
use bytes::Bytes;
use http_body_util::BodyExt;

/// An extension trait for requests and responses
/// that provides methods to extract data from their body.
pub trait BodyExtractExt: private::Sealed {
    /// Collect the (contained) body into a single buffer.
    fn try_into_bytes(self) -> impl Future<Output = Result<Bytes, OpaqueError>> + Send;

    /// Try to turn the (contained) body in an utf-8 string.
    fn try_into_string(self) -> impl Future<Output = Result<String, OpaqueError>> + Send;

    /// Try to deserialize the (contained) body as a JSON object.
    fn try_into_json<T: serde::de::DeserializeOwned + Send + 'static>(
        self,
    ) -> impl Future<Output = Result<T, OpaqueError>> + Send;
}

impl<Body> BodyExtractExt for http::Response<Body>
where
    Body: http_body::Body<Data: Send + 'static, Error: Into<BoxError>> + Send + 'static,
{
    async fn try_into_bytes(self) -> Result<Bytes, OpaqueError> {
        collect(self.into_body()).await
    }

    async fn try_into_string(self) -> Result<String, OpaqueError> {
        let bytes = collect(self.into_body()).await?;
        String::from_utf8(bytes.to_vec()).context("parse response body as utf-8 string")
    }

    async fn try_into_json<T: serde::de::DeserializeOwned + Send + 'static>(
        self,
    ) -> Result<T, OpaqueError> {
        let bytes = collect(self.into_body()).await?;
        serde_json::from_slice(bytes.as_ref()).context("deserialize response body as JSON")
    }
}

impl<Body> BodyExtractExt for http::Request<Body>
where
    Body: http_body::Body<Data: Send + 'static, Error: Into<BoxError>> + Send + 'static,
{
    async fn try_into_bytes(self) -> Result<Bytes, OpaqueError> {
        collect(self.into_body()).await
    }

    async fn try_into_string(self) -> Result<String, OpaqueError> {
        let bytes = collect(self.into_body()).await?;
        String::from_utf8(bytes.to_vec()).context("parse request body as utf-8 string")
    }

    async fn try_into_json<T: serde::de::DeserializeOwned + Send + 'static>(
        self,
    ) -> Result<T, OpaqueError> {
        let bytes = collect(self.into_body()).await?;
        serde_json::from_slice(bytes.as_ref()).context("deserialize request body as JSON")
    }
}

async fn collect<B>(body: B) -> Result<Bytes, OpaqueError>
where
    B: http_body::Body<Error: Into<BoxError>>,
{
    let collected = body
        .collect()
        .await
        .context("collect body")?;
    Ok(collected.to_bytes())
}

mod private {
    pub trait Sealed {}

    impl<Body> Sealed for http::Response<Body> {}
    impl<Body> Sealed for http::Request<Body> {}
}
