use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use futures_core::Stream;

pub use crate::util::SyncCell as RefCell;
pub use once_cell::sync::OnceCell;
pub use std::marker::{Send, Sync};
pub use std::sync::Arc as Rc;

/// An dynamically typed [`Future`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An dynamically typed [`Stream`].
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// An dynamically typed [`Error`].
pub type BoxError = Box<dyn Error + Send + Sync>;

/// A boxed one-shot callback.
pub type BoxFnOnce<'a, A, T> = Box<dyn FnOnce(A) -> T + Send + 'a>;
