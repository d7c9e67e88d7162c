//! `async fn serve(&self, Input) -> Result<Output, Error>`
//!
//! # arrange core
//!
//! Core building blocks shared by the arrange crates:
//!
//! - the [`Service`] trait, the abstraction an arranged transport is exposed as;
//! - [`error`] types and utilities ([`BoxError`], [`OpaqueError`], [`ErrorContext`]);
//! - [`telemetry`] re-exports, so all arrange crates log through the same [`tracing`] facade.
//!
//! [`BoxError`]: error::BoxError
//! [`OpaqueError`]: error::OpaqueError
//! [`ErrorContext`]: error::ErrorContext
//! [`tracing`]: https://docs.rs/tracing

#![cfg_attr(docsrs, feature(doc_cfg))]

#[doc(hidden)]
#[macro_use]
pub mod macros;

pub mod error;

pub mod service;
pub use service::Service;

pub mod telemetry;

#[doc(hidden)]
pub mod test_helpers;
