use crate::bounded::{BoxError, Send, Sync};
use crate::http::Request;
use crate::wrap::{Next, Wrap};

use std::future::Future;

use async_trait::async_trait;

/// Create middleware from a closure.
///
/// ```
/// use herd::{wrap_fn, Request};
/// use herd::http::{header, HeaderValue};
///
/// let wrap = wrap_fn(|req: Request, next| async move {
///     req.insert_header(header::ACCEPT, HeaderValue::from_static("*/*"));
///     next.call(req).await
/// });
/// ```
pub fn wrap_fn<F, O, E>(f: F) -> WrapFn<F>
where
    F: Fn(Request, Next) -> O + Send + Sync + 'static,
    O: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    WrapFn { f }
}

/// Middleware created with [`wrap_fn`].
pub struct WrapFn<F> {
    f: F,
}

#[cfg_attr(not(feature = "not-send"), async_trait)]
#[cfg_attr(feature = "not-send", async_trait(?Send))]
impl<F, O, E> Wrap for WrapFn<F>
where
    F: Fn(Request, Next) -> O + Send + Sync + 'static,
    O: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    async fn call(&self, req: Request, next: Next) -> Result<(), BoxError> {
        (self.f)(req, next).await.map_err(Into::into)
    }
}
