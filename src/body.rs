use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use hyper::body::{Body as HttpBody, Bytes, Frame};

/// A minimal response body: empty, or a single buffered chunk.
pub enum Body {
    Empty,
    Once(Option<Bytes>),
}

impl HttpBody for Body {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match &mut self.as_mut().get_mut() {
            Self::Empty => Poll::Ready(None),
            Self::Once(val) => Poll::Ready(val.take().map(|bytes| Ok(Frame::data(bytes)))),
        }
    }
}

impl Body {
    /// An empty body.
    pub fn empty() -> Self {
        Self::Empty
    }

    /// The buffered contents.
    pub fn into_bytes(self) -> Bytes {
        match self {
            Self::Empty => Bytes::new(),
            Self::Once(bytes) => bytes.unwrap_or_default(),
        }
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Once(Some(Bytes::from(s.as_bytes().to_vec())))
        }
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Once(Some(Bytes::from(s.into_bytes())))
        }
    }
}
