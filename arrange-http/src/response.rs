//! Building arranged responses.

use crate::{Body, CapturedRequest, Content, Response};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Version};
use std::borrow::Cow;

/// Response extension holding the reason phrase set by a [`ResponseBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonPhrase(pub Cow<'static, str>);

impl ReasonPhrase {
    /// The reason phrase as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Response extension holding the snapshot of the request a response answers.
#[derive(Debug, Clone)]
pub struct OriginalRequest(pub CapturedRequest);

/// Builder for arranged responses.
///
/// The status defaults to `501 Not Implemented`, so a response
/// that was never given a status stands out. Headers and trailers
/// accumulate and adding the same name and value twice keeps one of them.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    status: StatusCode,
    version: Option<Version>,
    headers: HeaderMap,
    trailers: HeaderMap,
    content: Option<Content>,
    reason: Option<ReasonPhrase>,
    request: Option<CapturedRequest>,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseBuilder {
    /// The status of a response when none was set.
    pub const DEFAULT_STATUS: StatusCode = StatusCode::NOT_IMPLEMENTED;

    /// Create a new [`ResponseBuilder`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: Self::DEFAULT_STATUS,
            version: None,
            headers: HeaderMap::new(),
            trailers: HeaderMap::new(),
            content: None,
            reason: None,
            request: None,
        }
    }

    /// Set the status of the response.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Set the status of the response.
    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    /// Add a header value, unless that name already has this value.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        append_unique(&mut self.headers, name, value);
        self
    }

    /// Add a header value, unless that name already has this value.
    pub fn add_header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        append_unique(&mut self.headers, name, value);
        self
    }

    /// Add a trailer value, unless that name already has this value.
    ///
    /// Trailers are sent as a trailers frame after the body.
    #[must_use]
    pub fn with_trailer(mut self, name: HeaderName, value: HeaderValue) -> Self {
        append_unique(&mut self.trailers, name, value);
        self
    }

    /// Add a trailer value, unless that name already has this value.
    pub fn add_trailer(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        append_unique(&mut self.trailers, name, value);
        self
    }

    /// Set the content of the response, replacing any content set before.
    ///
    /// The content type of the content becomes the `Content-Type` of the response.
    #[must_use]
    pub fn with_content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    /// Set the content of the response, replacing any content set before.
    pub fn set_content(&mut self, content: Content) -> &mut Self {
        self.content = Some(content);
        self
    }

    /// Set the protocol version of the response.
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Set the protocol version of the response.
    pub fn set_version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    /// Set the reason phrase, available as a [`ReasonPhrase`] response extension.
    #[must_use]
    pub fn with_reason_phrase(mut self, reason: impl Into<Cow<'static, str>>) -> Self {
        self.reason = Some(ReasonPhrase(reason.into()));
        self
    }

    /// Set the reason phrase, available as a [`ReasonPhrase`] response extension.
    pub fn set_reason_phrase(&mut self, reason: impl Into<Cow<'static, str>>) -> &mut Self {
        self.reason = Some(ReasonPhrase(reason.into()));
        self
    }

    /// Set the request answered by the response,
    /// available as an [`OriginalRequest`] response extension.
    #[must_use]
    pub fn with_request(mut self, request: CapturedRequest) -> Self {
        self.request = Some(request);
        self
    }

    /// Set the request answered by the response,
    /// available as an [`OriginalRequest`] response extension.
    pub fn set_request(&mut self, request: CapturedRequest) -> &mut Self {
        self.request = Some(request);
        self
    }

    /// Build the response.
    #[must_use]
    pub fn build(self) -> Response {
        let (data, content_type) = match self.content {
            Some(content) => {
                let (bytes, content_type) = content.into_parts();
                (bytes, Some(content_type))
            }
            None => Default::default(),
        };

        let body = if self.trailers.is_empty() {
            Body::from(data)
        } else {
            Body::with_trailers(data, self.trailers)
        };

        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        if let Some(version) = self.version {
            *response.version_mut() = version;
        }

        *response.headers_mut() = self.headers;
        if let Some(content_type) = content_type {
            response.headers_mut().insert(CONTENT_TYPE, content_type);
        }

        if let Some(reason) = self.reason {
            response.extensions_mut().insert(reason);
        }
        if let Some(request) = self.request {
            response.extensions_mut().insert(OriginalRequest(request));
        }

        response
    }
}

fn append_unique(map: &mut HeaderMap, name: HeaderName, value: HeaderValue) {
    if !map.get_all(&name).iter().any(|existing| *existing == value) {
        map.append(name, value);
    }
}
