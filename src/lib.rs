//! An arranged, in-memory http transport for testing http clients.
//!
//! Instead of talking to a real server, the client under test sends its requests
//! to an [`ArrangedService`](http::ArrangedService). Each request is captured
//! once into a [`CapturedRequest`](http::CapturedRequest) and offered to the
//! registered case handlers in registration order. The first handler whose
//! accept rules match produces the response. Requests nobody accepts fail with an
//! [`UnhandledRequestError`](http::UnhandledRequestError) carrying the captured request,
//! so a test can tell exactly what was sent.
//!
//! ```
//! use arrange::http::{ArrangementBuilder, BodyExtractExt, Method, StatusCode};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let client = ArrangementBuilder::new()
//!     .with_handler("greet", |case| {
//!         case.accept_route(Method::GET, "/greet")
//!             .respond_content_json(StatusCode::OK, serde_json::json!({ "hello": "world" }))
//!     })
//!     .build_client();
//!
//! let response = client.get("/greet").await.unwrap();
//! assert_eq!(response.status(), StatusCode::OK);
//!
//! let body: serde_json::Value = response.try_into_json().await.unwrap();
//! assert_eq!(body["hello"], "world");
//!
//! let err = client.get("/nope").await.unwrap_err();
//! assert!(err.is::<arrange::http::UnhandledRequestError>());
//! # }
//! ```
//!
//! # Crate features
//!
//! - `xml` (default): xml request and response bodies through [`XmlCodec`](http::XmlCodec);
//! - `tower`: [`tower_service::Service`] support for the arranged transport;
//! - `full`: all of the above.
//!
//! [`tower_service::Service`]: https://docs.rs/tower-service

#![cfg_attr(docsrs, feature(doc_cfg))]

pub use arrange_core::{error, service, telemetry};

#[doc(inline)]
pub use arrange_core::Service;

pub mod http {
    //! Arranged http transport, case handlers and their building blocks.
    //!
    //! Re-export of the `arrange-http` crate.

    #[doc(inline)]
    pub use arrange_http::*;
}
