//! An HTTP request model for servers.
//!
//! A transport hands over what it received as an [`Incoming`], and
//! [`Request::new`] turns it into a [`Request`]: normalized method,
//! path and decoded query, headers, parsed cookies, and client/proxy
//! address resolution. The body is read lazily, once, by the first
//! of the `parse_body_as_*` methods. Middleware registered with
//! [`Request::wrap`] runs in order before a terminal handler.

mod bounded;
#[cfg(not(feature = "not-send"))]
mod util;

pub mod cookie;
pub mod http;
pub mod wrap;

pub use async_trait::async_trait;
pub use crate::bounded::BoxError;
pub use crate::http::{Body, BodyConfig, BodyError, Incoming, Param, Params, Request};
pub use crate::wrap::{wrap_fn, Next, Wrap};
