//! Arranged http transport: case handlers, dispatcher and codecs.
//!
//! An [`ArrangedService`] is an in-memory stand-in for an http transport.
//! Tests register [`CaseHandler`]s in order, each pairing one or more accept
//! rules with a response producer. Every outbound request is captured once
//! into an immutable [`CapturedRequest`], the handlers are walked in
//! registration order and the first one that accepts the request produces
//! the response. A request nobody accepts fails with an
//! [`UnhandledRequestError`] carrying the full snapshot.
//!
//! ```
//! use arrange_http::{ArrangementBuilder, BodyExtractExt, Method, StatusCode};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), arrange_core::error::BoxError> {
//! let client = ArrangementBuilder::new()
//!     .with_handler("health", |case| {
//!         case.accept_route(Method::GET, "/health")
//!             .respond_status(StatusCode::OK)
//!     })
//!     .build_client();
//!
//! let response = client.get("/health").await?;
//! assert_eq!(response.status(), StatusCode::OK);
//! assert!(response.try_into_string().await?.is_empty());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod body;
pub use body::{Body, BodyExtractExt};

pub mod request;
pub use request::{CapturedRequest, VersionPolicy};

pub mod case;
pub use case::{
    AcceptRule, BoxAcceptRule, BoxResponder, CaseHandler, CaseHandlerBuilder, Responder,
    accept_fn, responder_fn,
};

mod service;
pub use service::ArrangedService;

mod builder;
pub use builder::ArrangementBuilder;

mod client;
pub use client::ArrangedClient;

pub mod error;
pub use error::{DispatchCancelledError, ResponseNotConfiguredError, UnhandledRequestError};

pub mod codec;
pub use codec::{BodyCodec, Content, JsonCodec};
#[cfg(feature = "xml")]
pub use codec::XmlCodec;

pub mod response;
pub use response::{OriginalRequest, ReasonPhrase, ResponseBuilder};

mod uri;
pub use uri::UriExt;

#[cfg(feature = "tower")]
mod tower;

#[doc(inline)]
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, Version, header};

#[doc(inline)]
pub use tokio_util::sync::CancellationToken;

/// Type alias for [`http::Request`] whose body type defaults to [`Body`].
pub type Request<T = Body> = http::Request<T>;

/// Type alias for [`http::Response`] whose body type defaults to [`Body`].
pub type Response<T = Body> = http::Response<T>;

pub mod dep {
    //! Dependencies for arrange http modules.
    //!
    //! Exported for your convenience.

    pub mod http {
        //! Re-export of the [`http`] crate.
        //!
        //! [`http`]: https://docs.rs/http

        #[doc(inline)]
        pub use http::*;
    }

    pub mod http_body {
        //! Re-export of the [`http-body`] crate.
        //!
        //! [`http-body`]: https://docs.rs/http-body

        #[doc(inline)]
        pub use http_body::*;
    }

    pub mod http_body_util {
        //! Re-export of the [`http-body-util`] crate.
        //!
        //! [`http-body-util`]: https://docs.rs/http-body-util

        #[doc(inline)]
        pub use http_body_util::*;
    }

    pub mod mime {
        //! Re-export of the [`mime`] crate.
        //!
        //! [`mime`]: https://docs.rs/mime

        #[doc(inline)]
        pub use mime::*;
    }

    pub mod encoding_rs {
        //! Re-export of the [`encoding_rs`] crate,
        //! used to decode captured bodies according to their declared charset.
        //!
        //! [`encoding_rs`]: https://docs.rs/encoding_rs

        #[doc(inline)]
        pub use encoding_rs::*;
    }
}
