//! Asynchronous middleware.
//!
//! Middleware is registered on a [`Request`] with [`Request::wrap`] and
//! run with [`Request::execute_middlewares`]:
//!
//! ```
//! use herd::{wrap_fn, Incoming, Request};
//!
//! # async fn run() -> Result<(), herd::BoxError> {
//! let req = Request::new(Incoming {
//!     url: "/old".to_owned(),
//!     ..Default::default()
//! });
//!
//! req.wrap(wrap_fn(|req: Request, next| async move {
//!     req.set_url("/new");
//!     next.call(req).await
//! }));
//!
//! req.execute_middlewares(|req: Request| async move {
//!     assert_eq!(req.path(), "/new");
//!     Ok::<_, herd::BoxError>(())
//! })
//! .await
//! # }
//! ```

mod wrap_fn;

pub use wrap_fn::{wrap_fn, WrapFn};

use crate::bounded::{BoxError, BoxFnOnce, BoxFuture, Rc, Send, Sync};
use crate::http::Request;

use std::future::Future;

use async_trait::async_trait;

/// Middleware that runs before the terminal handler.
///
/// A middleware receives the request and the rest of the chain. It
/// continues the chain by calling [`Next::call`], or ends it by
/// dropping `next`, in which case neither the following middlewares
/// nor the terminal handler run.
#[cfg_attr(not(feature = "not-send"), async_trait)]
#[cfg_attr(feature = "not-send", async_trait(?Send))]
pub trait Wrap: Send + Sync + 'static {
    /// Call the middleware with a request, and the rest of the chain.
    ///
    /// An error ends the chain and is returned from
    /// [`Request::execute_middlewares`] unchanged.
    async fn call(&self, req: Request, next: Next) -> Result<(), BoxError>;
}

#[cfg_attr(not(feature = "not-send"), async_trait)]
#[cfg_attr(feature = "not-send", async_trait(?Send))]
impl<W: Wrap> Wrap for Rc<W> {
    async fn call(&self, req: Request, next: Next) -> Result<(), BoxError> {
        W::call(self, req, next).await
    }
}

type Terminal = BoxFnOnce<'static, Request, BoxFuture<'static, Result<(), BoxError>>>;

/// The rest of the middleware chain.
pub struct Next {
    chain: Rc<[Rc<dyn Wrap>]>,
    index: usize,
    terminal: Terminal,
}

impl Next {
    pub(crate) fn new<F, O, E>(chain: Rc<[Rc<dyn Wrap>]>, terminal: F) -> Self
    where
        F: FnOnce(Request) -> O + Send + 'static,
        O: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Next {
            chain,
            index: 0,
            terminal: Box::new(
                move |req: Request| -> BoxFuture<'static, Result<(), BoxError>> {
                    Box::pin(async move { terminal(req).await.map_err(Into::into) })
                },
            ),
        }
    }

    /// Call the next middleware, or the terminal handler if
    /// every middleware has run.
    pub async fn call(mut self, req: Request) -> Result<(), BoxError> {
        match self.chain.get(self.index).cloned() {
            Some(wrap) => {
                tracing::trace!(index = self.index, "calling middleware");
                self.index += 1;
                wrap.call(req, self).await
            }
            None => {
                tracing::trace!("calling terminal handler");
                (self.terminal)(req).await
            }
        }
    }

    /// The number of middlewares that have not run yet.
    pub fn remaining(&self) -> usize {
        self.chain.len() - self.index
    }
}
