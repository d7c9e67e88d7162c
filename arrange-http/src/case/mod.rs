//! Case handlers: accept rules paired with a responder.
//!
//! A [`CaseHandler`] represents one arranged test case. It accepts a request
//! when any of its [`AcceptRule`]s does. The rules are evaluated one after
//! another in the order they were added and evaluation stops at the first
//! rule accepting the request. A handler without rules accepts nothing.
//!
//! Handlers are assembled with a [`CaseHandlerBuilder`]:
//!
//! ```
//! use arrange_http::{CaseHandler, Method, StatusCode};
//!
//! let handler = CaseHandler::builder()
//!     .accept_route(Method::GET, "/health")
//!     .accept_route(Method::HEAD, "/health")
//!     .respond_status(StatusCode::OK)
//!     .build();
//! # let _ = handler;
//! ```

use crate::{CapturedRequest, Response};
use arrange_core::error::BoxError;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

mod rule;
pub use rule::{
    AcceptAll, AcceptFn, AcceptMethod, AcceptRoute, AcceptRule, AcceptUri, AcceptWhen,
    BoxAcceptRule, accept_fn,
};

mod responder;
pub use responder::{BoxResponder, Responder, ResponderFn, ServiceResponder, responder_fn};

mod ext;

/// One arranged test case: accept rules and the responder
/// producing the response for requests they accept.
///
/// Immutable once built. Cloning is cheap and clones share their rules and responder.
#[derive(Clone)]
pub struct CaseHandler {
    rules: Arc<[BoxAcceptRule]>,
    responder: BoxResponder,
}

impl CaseHandler {
    /// Create a [`CaseHandler`] from a single rule and a responder.
    pub fn new(rule: impl AcceptRule, responder: impl Responder) -> Self {
        Self {
            rules: Arc::from([rule.boxed()]),
            responder: responder.boxed(),
        }
    }

    /// Create a new [`CaseHandlerBuilder`].
    #[must_use]
    pub fn builder() -> CaseHandlerBuilder {
        CaseHandlerBuilder::new()
    }

    /// Returns true if any of the rules accepts the request.
    ///
    /// Rules are evaluated in insertion order and later rules
    /// are not evaluated once one accepted the request.
    pub async fn matches(&self, request: &CapturedRequest) -> bool {
        for rule in self.rules.iter() {
            if rule.accepts(request).await {
                return true;
            }
        }
        false
    }

    /// Produce the response for an accepted request.
    pub async fn respond(
        &self,
        request: CapturedRequest,
        cancel: CancellationToken,
    ) -> Result<Response, BoxError> {
        self.responder.respond(request, cancel).await
    }

    /// The number of accept rules of this handler.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl fmt::Debug for CaseHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseHandler")
            .field("rules", &self.rules.len())
            .field("responder", &self.responder)
            .finish()
    }
}

/// Builder for a [`CaseHandler`].
///
/// Rules accumulate, the responder is replaced on every set.
/// Until a responder is set the built handler fails with a
/// [`ResponseNotConfiguredError`].
///
/// [`ResponseNotConfiguredError`]: crate::ResponseNotConfiguredError
#[derive(Debug, Clone, Default)]
pub struct CaseHandlerBuilder {
    rules: Vec<BoxAcceptRule>,
    responder: BoxResponder,
}

impl CaseHandlerBuilder {
    /// Create a new [`CaseHandlerBuilder`] without rules or responder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accept rule, evaluated after the rules added before it.
    #[must_use]
    pub fn with_accept_rule(mut self, rule: impl AcceptRule) -> Self {
        self.rules.push(rule.boxed());
        self
    }

    /// Add an accept rule, evaluated after the rules added before it.
    pub fn add_accept_rule(&mut self, rule: impl AcceptRule) -> &mut Self {
        self.rules.push(rule.boxed());
        self
    }

    /// Set the responder, replacing any responder set before.
    #[must_use]
    pub fn with_response_handler(mut self, responder: impl Responder) -> Self {
        self.responder = responder.boxed();
        self
    }

    /// Set the responder, replacing any responder set before.
    pub fn set_response_handler(&mut self, responder: impl Responder) -> &mut Self {
        self.responder = responder.boxed();
        self
    }

    /// Build a [`CaseHandler`] from the rules and responder set so far.
    ///
    /// The rules are copied: changes made to this builder afterwards
    /// do not affect the returned handler.
    #[must_use]
    pub fn build(&self) -> CaseHandler {
        CaseHandler {
            rules: Arc::from(self.rules.as_slice()),
            responder: self.responder.clone(),
        }
    }
}
