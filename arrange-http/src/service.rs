use crate::{
    CapturedRequest, CaseHandler, DispatchCancelledError, Response, UnhandledRequestError,
};
use arrange_core::Service;
use arrange_core::error::BoxError;
use arrange_core::telemetry::tracing;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// An arranged http transport: an ordered registry of [`CaseHandler`]s.
///
/// Each request is captured once and offered to the handlers in
/// registration order. The first handler accepting it produces the
/// response, later handlers are not consulted. A request no handler
/// accepts fails with an [`UnhandledRequestError`].
///
/// Clones share the same registry, so handlers can be added or removed
/// through any clone while the service is in use. A dispatch works on the
/// handlers registered at the moment it started.
#[derive(Clone, Default)]
pub struct ArrangedService {
    registry: Arc<RwLock<IndexMap<String, CaseHandler>>>,
}

impl ArrangedService {
    /// Create a new [`ArrangedService`] without handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under the given id.
    ///
    /// Registering an id which is already registered replaces its handler
    /// and keeps its position in the dispatch order.
    pub fn add(&self, id: impl Into<String>, handler: CaseHandler) {
        let id = id.into();
        tracing::trace!(handler.id = %id, "register arranged case handler");
        self.registry.write().insert(id, handler);
    }

    /// Register a handler under a generated id, which is returned.
    pub fn add_anonymous(&self, handler: CaseHandler) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.add(id.clone(), handler);
        id
    }

    /// Remove the handler registered under the given id.
    ///
    /// Returns false if no handler was registered under that id.
    pub fn remove(&self, id: &str) -> bool {
        self.registry.write().shift_remove(id).is_some()
    }

    /// Remove all handlers.
    pub fn clear(&self) {
        self.registry.write().clear();
    }

    /// The number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    /// Returns true if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.read().is_empty()
    }

    /// Returns true if a handler is registered under the given id.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.registry.read().contains_key(id)
    }

    /// The handler registered under the given id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<CaseHandler> {
        self.registry.read().get(id).cloned()
    }

    /// The registered ids, in dispatch order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.registry.read().keys().cloned().collect()
    }

    /// Dispatch a request to the first handler accepting it.
    ///
    /// Fails with a [`DispatchCancelledError`] when `cancel` fires before
    /// the response is produced. Errors of the response producer are
    /// returned as is.
    pub async fn dispatch<B>(
        &self,
        request: http::Request<B>,
        cancel: CancellationToken,
    ) -> Result<Response, BoxError>
    where
        B: http_body::Body<Error: Into<BoxError>>,
    {
        let request = CapturedRequest::capture(request).await?;
        self.dispatch_captured(request, cancel).await
    }

    /// Dispatch an already captured request to the first handler accepting it.
    ///
    /// See [`Self::dispatch`].
    pub async fn dispatch_captured(
        &self,
        request: CapturedRequest,
        cancel: CancellationToken,
    ) -> Result<Response, BoxError> {
        let handlers: Vec<(String, CaseHandler)> = self
            .registry
            .read()
            .iter()
            .map(|(id, handler)| (id.clone(), handler.clone()))
            .collect();

        for (id, handler) in handlers {
            if handler.matches(&request).await {
                tracing::debug!(
                    handler.id = %id,
                    http.request.method = %request.method(),
                    url.full = %request.uri(),
                    "arranged case handler accepted request",
                );
                return tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(DispatchCancelledError::new().into()),
                    result = handler.respond(request, cancel.clone()) => result,
                };
            }
            tracing::trace!(handler.id = %id, "arranged case handler declined request");
        }

        tracing::debug!(
            http.request.method = %request.method(),
            url.full = %request.uri(),
            "no arranged case handler accepted request",
        );
        Err(UnhandledRequestError::new(request).into())
    }
}

impl fmt::Debug for ArrangedService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrangedService")
            .field("handlers", &self.ids())
            .finish()
    }
}

/// The cancellation token of a request: the [`CancellationToken`]
/// in its extensions, or a fresh token which never fires.
pub(crate) fn request_cancellation<B>(request: &http::Request<B>) -> CancellationToken {
    request
        .extensions()
        .get::<CancellationToken>()
        .cloned()
        .unwrap_or_default()
}

impl<B> Service<http::Request<B>> for ArrangedService
where
    B: http_body::Body<Data: Send, Error: Into<BoxError>> + Send + 'static,
{
    type Output = Response;
    type Error = BoxError;

    async fn serve(&self, request: http::Request<B>) -> Result<Self::Output, Self::Error> {
        let cancel = request_cancellation(&request);
        self.dispatch(request, cancel).await
    }
}
