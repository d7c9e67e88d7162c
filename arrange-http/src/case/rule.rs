use crate::CapturedRequest;
use http::{Method, Uri};
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

/// A rule deciding whether a case handler accepts a captured request.
pub trait AcceptRule: Send + Sync + 'static {
    /// Returns true if the request is accepted by this rule.
    fn accepts<'a>(&'a self, request: &'a CapturedRequest)
    -> impl Future<Output = bool> + Send + 'a;

    /// Box this rule to allow for dynamic dispatch.
    fn boxed(self) -> BoxAcceptRule
    where
        Self: Sized,
    {
        BoxAcceptRule::new(self)
    }
}

trait DynAcceptRule {
    fn accepts_box<'a>(
        &'a self,
        request: &'a CapturedRequest,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>>;
}

impl<R: AcceptRule> DynAcceptRule for R {
    fn accepts_box<'a>(
        &'a self,
        request: &'a CapturedRequest,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(self.accepts(request))
    }
}

/// A boxed [`AcceptRule`], for where you require dynamic dispatch.
#[derive(Clone)]
pub struct BoxAcceptRule {
    inner: Arc<dyn DynAcceptRule + Send + Sync + 'static>,
}

impl BoxAcceptRule {
    /// Create a new [`BoxAcceptRule`] from the given rule.
    pub fn new(rule: impl AcceptRule) -> Self {
        Self {
            inner: Arc::new(rule),
        }
    }
}

impl fmt::Debug for BoxAcceptRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxAcceptRule").finish()
    }
}

impl AcceptRule for BoxAcceptRule {
    fn accepts<'a>(
        &'a self,
        request: &'a CapturedRequest,
    ) -> impl Future<Output = bool> + Send + 'a {
        self.inner.accepts_box(request)
    }

    fn boxed(self) -> BoxAcceptRule {
        self
    }
}

/// Create an [`AcceptRule`] from an async closure.
///
/// The closure receives its own (cheap) clone of the snapshot,
/// so the returned future does not borrow from it.
pub fn accept_fn<F, Fut>(f: F) -> AcceptFn<F>
where
    F: Fn(CapturedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    AcceptFn(f)
}

/// An [`AcceptRule`] implemented by an async closure, created with [`accept_fn`].
#[derive(Clone)]
pub struct AcceptFn<F>(F);

impl<F> fmt::Debug for AcceptFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AcceptFn")
            .field(&format_args!("{}", std::any::type_name::<F>()))
            .finish()
    }
}

impl<F, Fut> AcceptRule for AcceptFn<F>
where
    F: Fn(CapturedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    fn accepts<'a>(
        &'a self,
        request: &'a CapturedRequest,
    ) -> impl Future<Output = bool> + Send + 'a {
        (self.0)(request.clone())
    }
}

/// An [`AcceptRule`] implemented by a synchronous predicate.
#[derive(Clone)]
pub struct AcceptWhen<F>(F);

impl<F> AcceptWhen<F>
where
    F: Fn(&CapturedRequest) -> bool + Send + Sync + 'static,
{
    /// Create a new [`AcceptWhen`] rule from the given predicate.
    pub const fn new(predicate: F) -> Self {
        Self(predicate)
    }
}

impl<F> fmt::Debug for AcceptWhen<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AcceptWhen")
            .field(&format_args!("{}", std::any::type_name::<F>()))
            .finish()
    }
}

impl<F> AcceptRule for AcceptWhen<F>
where
    F: Fn(&CapturedRequest) -> bool + Send + Sync + 'static,
{
    fn accepts<'a>(
        &'a self,
        request: &'a CapturedRequest,
    ) -> impl Future<Output = bool> + Send + 'a {
        std::future::ready((self.0)(request))
    }
}

/// Accepts every request.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct AcceptAll;

impl AcceptRule for AcceptAll {
    fn accepts<'a>(
        &'a self,
        _request: &'a CapturedRequest,
    ) -> impl Future<Output = bool> + Send + 'a {
        std::future::ready(true)
    }
}

/// Accepts requests with the given method.
#[derive(Debug, Clone)]
pub struct AcceptMethod(Method);

impl AcceptMethod {
    /// Create a new [`AcceptMethod`] rule.
    #[must_use]
    pub const fn new(method: Method) -> Self {
        Self(method)
    }
}

impl AcceptRule for AcceptMethod {
    fn accepts<'a>(
        &'a self,
        request: &'a CapturedRequest,
    ) -> impl Future<Output = bool> + Send + 'a {
        std::future::ready(request.method() == self.0)
    }
}

/// Accepts requests for the given target.
///
/// The target is compared to the complete request uri,
/// so a relative target only matches relative requests.
/// Scheme and host compare case-insensitively and an explicit
/// default port (80 for http, 443 for https) equals no port.
#[derive(Debug, Clone)]
pub struct AcceptUri {
    target: String,
    parsed: Option<Uri>,
}

impl AcceptUri {
    /// Create a new [`AcceptUri`] rule.
    pub fn new(uri: impl fmt::Display) -> Self {
        let target = uri.to_string();
        let parsed = target.parse().ok();
        Self { target, parsed }
    }

    fn matches(&self, uri: &Uri) -> bool {
        uri == self.target.as_str()
            || self
                .parsed
                .as_ref()
                .is_some_and(|expected| same_target(expected, uri))
    }
}

fn same_target(a: &Uri, b: &Uri) -> bool {
    let scheme_eq = match (a.scheme_str(), b.scheme_str()) {
        (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
        (None, None) => true,
        _ => false,
    };
    let host_eq = match (a.host(), b.host()) {
        (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
        (None, None) => true,
        _ => false,
    };
    scheme_eq
        && host_eq
        && effective_port(a) == effective_port(b)
        && a.path() == b.path()
        && a.query() == b.query()
}

fn effective_port(uri: &Uri) -> Option<u16> {
    uri.port_u16().or_else(|| match uri.scheme_str() {
        Some(scheme) if scheme.eq_ignore_ascii_case("http") => Some(80),
        Some(scheme) if scheme.eq_ignore_ascii_case("https") => Some(443),
        _ => None,
    })
}

impl AcceptRule for AcceptUri {
    fn accepts<'a>(
        &'a self,
        request: &'a CapturedRequest,
    ) -> impl Future<Output = bool> + Send + 'a {
        std::future::ready(self.matches(request.uri()))
    }
}

/// Accepts requests with the given method and target.
#[derive(Debug, Clone)]
pub struct AcceptRoute {
    method: Method,
    uri: AcceptUri,
}

impl AcceptRoute {
    /// Create a new [`AcceptRoute`] rule.
    pub fn new(method: Method, uri: impl fmt::Display) -> Self {
        Self {
            method,
            uri: AcceptUri::new(uri),
        }
    }
}

impl AcceptRule for AcceptRoute {
    fn accepts<'a>(
        &'a self,
        request: &'a CapturedRequest,
    ) -> impl Future<Output = bool> + Send + 'a {
        std::future::ready(request.method() == self.method && self.uri.matches(request.uri()))
    }
}
