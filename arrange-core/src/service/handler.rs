//! Async closures as [`Service`]s.

use crate::Service;
use std::fmt;

/// Create a [`Service`] from an async function taking the input.
///
/// ```
/// use arrange_core::service::{Service, service_fn};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let shout = service_fn(|input: &'static str| async move {
///     Ok::<_, std::convert::Infallible>(input.to_uppercase())
/// });
/// assert_eq!(shout.serve("hi").await.unwrap(), "HI");
/// # }
/// ```
pub fn service_fn<F>(f: F) -> ServiceFn<F> {
    ServiceFn { f }
}

/// The [`Service`] returned by [`service_fn`].
#[derive(Clone)]
pub struct ServiceFn<F> {
    f: F,
}

impl<F> fmt::Debug for ServiceFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceFn")
            .field(&format_args!("{}", std::any::type_name::<F>()))
            .finish()
    }
}

impl<Input, F, Fut, O, E> Service<Input> for ServiceFn<F>
where
    F: Fn(Input) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, E>> + Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
{
    type Output = O;
    type Error = E;

    #[inline]
    fn serve(
        &self,
        input: Input,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send + '_ {
        (self.f)(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[tokio::test]
    async fn closure_as_service() {
        let svc = service_fn(|n: u16| async move {
            if n < 600 { Ok(n * 2) } else { Err("out of range") }
        });
        assert_eq!(svc.serve(21).await, Ok(42));
        assert_eq!(svc.serve(700).await, Err("out of range"));
    }

    #[tokio::test]
    async fn boxed_closure_service() {
        let svc = service_fn(|input: String| async move { Ok::<_, ()>(input.len()) }).boxed();
        assert_eq!(svc.clone().serve("four".to_owned()).await, Ok(4));
    }

    #[test]
    fn service_fn_is_send_and_sync() {
        fn check<T: Send + Sync>(_: &T) {}
        let svc = service_fn(|_: ()| async { Ok::<_, ()>(()) });
        check(&svc);
        assert_send::<ServiceFn<fn(())>>();
    }
}
