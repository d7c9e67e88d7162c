//! End-to-end tests driving an http client through an arranged transport.

mod codecs;
mod dispatch;
mod scenarios;
