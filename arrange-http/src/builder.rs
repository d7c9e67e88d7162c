use crate::{ArrangedClient, ArrangedService, CaseHandler, CaseHandlerBuilder};
use indexmap::IndexMap;

/// Builder assembling [`CaseHandler`]s into an [`ArrangedService`].
///
/// Handlers are dispatched in the order they were added.
/// Adding a handler under an id which was added before replaces
/// that handler and keeps its position.
///
/// ```
/// use arrange_http::{ArrangementBuilder, CaseHandler, Method, StatusCode};
///
/// let service = ArrangementBuilder::new()
///     .with_case_handler(
///         "no-deletes",
///         CaseHandler::builder()
///             .accept_method(Method::DELETE)
///             .respond_status(StatusCode::FORBIDDEN)
///             .build(),
///     )
///     .with_anonymous_handler(|case| case.accept_all().respond_status(StatusCode::NOT_FOUND))
///     .build();
///
/// assert_eq!(service.len(), 2);
/// assert_eq!(service.ids()[0], "no-deletes");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArrangementBuilder {
    handlers: IndexMap<String, CaseHandler>,
}

impl ArrangementBuilder {
    /// Create a new [`ArrangementBuilder`] without handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler under the given id.
    #[must_use]
    pub fn with_case_handler(mut self, id: impl Into<String>, handler: CaseHandler) -> Self {
        self.set_case_handler(id, handler);
        self
    }

    /// Add a handler under the given id.
    pub fn set_case_handler(&mut self, id: impl Into<String>, handler: CaseHandler) -> &mut Self {
        self.handlers.insert(id.into(), handler);
        self
    }

    /// Add a handler under a generated id.
    #[must_use]
    pub fn with_anonymous_case_handler(mut self, handler: CaseHandler) -> Self {
        self.set_anonymous_case_handler(handler);
        self
    }

    /// Add a handler under a generated id.
    pub fn set_anonymous_case_handler(&mut self, handler: CaseHandler) -> &mut Self {
        self.set_case_handler(uuid::Uuid::new_v4().to_string(), handler)
    }

    /// Add a handler under the given id,
    /// built by the given function from a fresh [`CaseHandlerBuilder`].
    #[must_use]
    pub fn with_handler<F>(mut self, id: impl Into<String>, arrange: F) -> Self
    where
        F: FnOnce(CaseHandlerBuilder) -> CaseHandlerBuilder,
    {
        self.set_handler(id, arrange);
        self
    }

    /// Add a handler under the given id,
    /// built by the given function from a fresh [`CaseHandlerBuilder`].
    pub fn set_handler<F>(&mut self, id: impl Into<String>, arrange: F) -> &mut Self
    where
        F: FnOnce(CaseHandlerBuilder) -> CaseHandlerBuilder,
    {
        let handler = arrange(CaseHandlerBuilder::new()).build();
        self.set_case_handler(id, handler)
    }

    /// Add a handler under a generated id,
    /// built by the given function from a fresh [`CaseHandlerBuilder`].
    #[must_use]
    pub fn with_anonymous_handler<F>(mut self, arrange: F) -> Self
    where
        F: FnOnce(CaseHandlerBuilder) -> CaseHandlerBuilder,
    {
        self.set_anonymous_handler(arrange);
        self
    }

    /// Add a handler under a generated id,
    /// built by the given function from a fresh [`CaseHandlerBuilder`].
    pub fn set_anonymous_handler<F>(&mut self, arrange: F) -> &mut Self
    where
        F: FnOnce(CaseHandlerBuilder) -> CaseHandlerBuilder,
    {
        let handler = arrange(CaseHandlerBuilder::new()).build();
        self.set_anonymous_case_handler(handler)
    }

    /// Build a new [`ArrangedService`] with the handlers added so far.
    ///
    /// Every service built has its own registry.
    #[must_use]
    pub fn build(&self) -> ArrangedService {
        let service = ArrangedService::new();
        for (id, handler) in &self.handlers {
            service.add(id.clone(), handler.clone());
        }
        service
    }

    /// Build a new [`ArrangedClient`] on top of a freshly built [`ArrangedService`].
    #[must_use]
    pub fn build_client(&self) -> ArrangedClient {
        ArrangedClient::new(self.build())
    }
}
