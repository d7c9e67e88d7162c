//! Service type and utilities.
//!
//! A [`Service`] is the abstraction an arranged transport is plugged in as:
//! one async method turning an input (e.g. an http request) into an output or an error.

mod svc;
#[doc(inline)]
pub use svc::{BoxService, Service};

pub mod handler;
pub use handler::service_fn;
