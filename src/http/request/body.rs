use super::Request;
use crate::bounded::{BoxError, BoxFuture, OnceCell, Rc, RefCell};
use crate::http::{Body, Params};

use std::error::Error as StdError;
use std::fmt;

use bytes::{Bytes, BytesMut};
use futures_util::future::{FutureExt, Shared};
use http::header;
use serde::de::DeserializeOwned;

type Read = Shared<BoxFuture<'static, Result<Bytes, ReadError>>>;

/// Configuration for reading request bodies.
#[derive(Clone, Debug, Default)]
pub struct BodyConfig {
    limit: Option<usize>,
}

impl BodyConfig {
    /// Create a [`BodyConfig`] instance.
    ///
    /// By default the size of a body is not limited.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum number of bytes that can be streamed.
    ///
    /// Reading a larger body fails with an error for which
    /// [`BodyError::is_limit`] returns `true`.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

// The transport's body and the single read of it.
pub(crate) struct BodyState {
    source: RefCell<Option<Body>>,
    read: OnceCell<Read>,
    config: BodyConfig,
}

impl BodyState {
    pub(crate) fn new(body: Body, config: BodyConfig) -> Self {
        Self {
            source: RefCell::new(Some(body)),
            read: OnceCell::new(),
            config,
        }
    }
}

impl Request {
    /// Read the request body as bytes.
    ///
    /// The body is read from the transport on the first call, and the
    /// outcome is cached: every later call, and every call made while
    /// the read is in progress, returns the same bytes or the same error.
    pub async fn parse_body_as_buffer(&self) -> Result<Bytes, BodyError> {
        let state = &self.shared.body;

        let read = state
            .read
            .get_or_init(|| {
                let body = state.source.borrow_mut().take().unwrap_or_default();
                let content_length = self
                    .header(header::CONTENT_LENGTH)
                    .and_then(|length| length.trim().parse::<u64>().ok());

                let read: BoxFuture<'static, _> =
                    Box::pin(read_body(body, state.config.limit, content_length));
                read.shared()
            })
            .clone();

        read.await.map_err(BodyError::from)
    }

    /// Read the request body and deserialize it as JSON.
    #[cfg(feature = "json")]
    pub async fn parse_body_as_json<T>(&self) -> Result<T, BodyError>
    where
        T: DeserializeOwned,
    {
        let body = self.parse_body_as_buffer().await?;
        serde_json::from_slice(&body).map_err(|err| BodyError(BodyErrorKind::Json(err)))
    }

    /// Read the request body and decode it as `application/x-www-form-urlencoded`.
    pub async fn parse_body_as_url_encoded(&self) -> Result<Params, BodyError> {
        let body = self.parse_body_as_buffer().await?;
        Params::parse(&body).map_err(|err| BodyError(BodyErrorKind::Form(err)))
    }

    /// Read the request body and deserialize it from a URL encoded form.
    pub async fn parse_body_as_form<T>(&self) -> Result<T, BodyError>
    where
        T: DeserializeOwned,
    {
        let body = self.parse_body_as_buffer().await?;
        serde_urlencoded::from_bytes(&body).map_err(|err| BodyError(BodyErrorKind::Form(err)))
    }

    /// The request body, if it has been read successfully.
    pub fn body(&self) -> Option<Bytes> {
        self.shared
            .body
            .read
            .get()
            .and_then(Shared::peek)
            .and_then(|read| read.as_ref().ok())
            .cloned()
    }
}

async fn read_body(
    mut body: Body,
    limit: Option<usize>,
    content_length: Option<u64>,
) -> Result<Bytes, ReadError> {
    if let (Some(limit), Some(length)) = (limit, content_length) {
        if length > limit as u64 {
            tracing::warn!(limit, content_length = length, "request body exceeds limit");
            return Err(ReadError::ExceededLimit(limit));
        }
    }

    let check = |chunk: Bytes, total: usize| match limit {
        Some(limit) if chunk.len() + total > limit => {
            tracing::warn!(limit, "request body exceeds limit");
            Err(ReadError::ExceededLimit(limit))
        }
        _ => Ok(chunk),
    };

    let first = match body.chunk().await {
        Some(chunk) => chunk.map_err(ReadError::io).and_then(|b| check(b, 0))?,
        None => return Ok(Bytes::new()),
    };

    let second = match body.chunk().await {
        Some(chunk) => chunk
            .map_err(ReadError::io)
            .and_then(|b| check(b, first.len()))?,
        None => {
            tracing::debug!(len = first.len(), "request body read");
            return Ok(first);
        }
    };

    let mut bytes = BytesMut::with_capacity(first.len() + second.len());
    bytes.extend_from_slice(&first);
    bytes.extend_from_slice(&second);

    while let Some(chunk) = body.chunk().await {
        let chunk = chunk
            .map_err(ReadError::io)
            .and_then(|b| check(b, bytes.len()))?;

        bytes.extend_from_slice(&chunk);
    }

    tracing::debug!(len = bytes.len(), "request body read");
    Ok(bytes.freeze())
}

// The cached outcome of a body read, shared by every caller.
#[derive(Clone, Debug)]
enum ReadError {
    Io(Rc<BoxError>),
    ExceededLimit(usize),
}

impl ReadError {
    fn io(err: BoxError) -> Self {
        tracing::warn!(error = %err, "failed to read request body");
        ReadError::Io(Rc::new(err))
    }
}

/// Error returned when reading or decoding the request body fails.
#[derive(Debug)]
pub struct BodyError(BodyErrorKind);

#[derive(Debug)]
enum BodyErrorKind {
    Io(Rc<BoxError>),
    ExceededLimit(usize),
    #[cfg(feature = "json")]
    Json(serde_json::Error),
    Form(serde_urlencoded::de::Error),
}

impl BodyError {
    /// Whether the transport reported an error while streaming the body.
    ///
    /// The transport's error is available through [`source`](StdError::source).
    pub fn is_io(&self) -> bool {
        matches!(self.0, BodyErrorKind::Io(_))
    }

    /// Whether the body was larger than the configured limit.
    pub fn is_limit(&self) -> bool {
        matches!(self.0, BodyErrorKind::ExceededLimit(_))
    }

    /// Whether the body is not syntactically valid for the requested format.
    pub fn is_syntax(&self) -> bool {
        match &self.0 {
            #[cfg(feature = "json")]
            BodyErrorKind::Json(err) => err.is_syntax() || err.is_eof(),
            _ => false,
        }
    }
}

impl From<ReadError> for BodyError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::Io(err) => BodyError(BodyErrorKind::Io(err)),
            ReadError::ExceededLimit(limit) => BodyError(BodyErrorKind::ExceededLimit(limit)),
        }
    }
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            BodyErrorKind::Io(err) => write!(f, "failed to read body: {}", err),
            BodyErrorKind::ExceededLimit(limit) => {
                write!(f, "body size exceeded limit of {} bytes", limit)
            }
            #[cfg(feature = "json")]
            BodyErrorKind::Json(err) => write!(f, "failed to deserialize body: {}", err),
            BodyErrorKind::Form(err) => write!(f, "failed to deserialize body: {}", err),
        }
    }
}

impl StdError for BodyError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.0 {
            BodyErrorKind::Io(err) => Some(&***err),
            BodyErrorKind::ExceededLimit(_) => None,
            #[cfg(feature = "json")]
            BodyErrorKind::Json(err) => Some(err),
            BodyErrorKind::Form(err) => Some(err),
        }
    }
}
