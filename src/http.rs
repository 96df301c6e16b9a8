//! The request model and the types it is built from.

mod body;
mod params;
mod request;

pub use body::Body;
pub use params::{Param, Params};
pub use request::{BodyConfig, BodyError, Incoming, Request};

pub use bytes::Bytes;
pub use http::{header, HeaderMap, HeaderValue};
