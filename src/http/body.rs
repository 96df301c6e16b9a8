use crate::bounded::{BoxError, BoxStream, Send};

use std::pin::Pin;
use std::task::{Context, Poll};
use std::{fmt, mem};

use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;
use pin_project_lite::pin_project;

/// The body of an incoming request, as delivered by the transport.
///
/// A body is a single-pass source of chunks. It is read at most once,
/// by the first call to [`Request::parse_body_as_buffer`] or one of the
/// decoding methods built on it. Flow control is pull-based: the
/// transport is only asked for the next chunk when the reader is ready
/// for it.
///
/// [`Request::parse_body_as_buffer`]: crate::Request::parse_body_as_buffer
pub struct Body {
    kind: BodyKind,
}

enum BodyKind {
    Stream(BoxStream<'static, Result<Bytes, BoxError>>),
    Once(Bytes),
    Empty,
}

impl Body {
    /// Create a `Body` from a stream of bytes.
    ///
    /// An `Err` item ends the body: it is reported to every
    /// caller waiting on the body, and to every later one.
    pub fn stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        Body {
            kind: BodyKind::Stream(Box::pin(MapErr { inner: stream })),
        }
    }

    /// Create a body directly from bytes.
    pub fn once(bytes: impl Into<Bytes>) -> Self {
        Body {
            kind: BodyKind::Once(bytes.into()),
        }
    }

    /// Create an empty `Body`.
    pub fn empty() -> Self {
        Body {
            kind: BodyKind::Empty,
        }
    }

    pub(crate) async fn chunk(&mut self) -> Option<Result<Bytes, BoxError>> {
        self.next().await
    }
}

pin_project! {
    struct MapErr<S> {
        #[pin]
        inner: S,
    }
}

impl<S, E> Stream for MapErr<S>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    type Item = Result<Bytes, BoxError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project()
            .inner
            .poll_next(cx)
            .map(|item| item.map(|chunk| chunk.map_err(Into::into)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl Stream for Body {
    type Item = Result<Bytes, BoxError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match &mut self.kind {
            BodyKind::Stream(stream) => stream.as_mut().poll_next(cx),
            BodyKind::Once(bytes) => {
                let bytes = mem::take(bytes);
                self.kind = BodyKind::Empty;
                Poll::Ready(Some(Ok(bytes)))
            }
            BodyKind::Empty => Poll::Ready(None),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.kind {
            BodyKind::Stream(stream) => stream.size_hint(),
            BodyKind::Once(_) => (1, Some(1)),
            BodyKind::Empty => (0, Some(0)),
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            BodyKind::Stream(_) => "Stream",
            BodyKind::Once(_) => "Once",
            BodyKind::Empty => "Empty",
        };

        f.debug_tuple("Body").field(&kind).finish()
    }
}
