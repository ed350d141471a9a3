//! Response sinks receiving a delivered file.
//!
//! A sink gets the response head exactly once, then the body through its
//! [`AsyncWrite`] side. Backpressure is whatever `poll_write` reports; a
//! completed `shutdown` is the "finished" signal.

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::AsyncWrite;
use tracing::debug;

/// Status line and headers written before any body byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    /// May be empty when the type could not be resolved.
    pub content_type: String,
    pub content_length: u64,
}

impl ResponseHead {
    pub fn ok(content_type: String, content_length: u64) -> Self {
        Self {
            status: 200,
            content_type,
            content_length,
        }
    }

    pub fn headers(&self) -> [(&'static str, String); 2] {
        [
            ("Content-Type", self.content_type.clone()),
            ("Content-Length", self.content_length.to_string()),
        ]
    }
}

impl fmt::Display for ResponseHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "status: {}", self.status)?;
        for (name, value) in self.headers() {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

pub trait ResponseSink: AsyncWrite + Unpin {
    /// Emit the response head. Called once, before the first body write.
    fn write_head(&mut self, head: ResponseHead) -> io::Result<()>;
}

/// Adapts any writer into a sink, optionally echoing the head to stderr.
#[derive(Debug)]
pub struct WriterSink<W> {
    inner: W,
    head: Option<ResponseHead>,
    echo_head: bool,
}

impl<W> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            head: None,
            echo_head: false,
        }
    }

    pub fn echo_head(mut self, echo: bool) -> Self {
        self.echo_head = echo;
        self
    }

    pub fn head(&self) -> Option<&ResponseHead> {
        self.head.as_ref()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: AsyncWrite + Unpin> ResponseSink for WriterSink<W> {
    fn write_head(&mut self, head: ResponseHead) -> io::Result<()> {
        if self.head.is_some() {
            return Err(io::Error::other("response head already written"));
        }
        debug!(status = head.status, content_length = head.content_length, "response head");
        if self.echo_head {
            eprint!("{head}");
        }
        self.head = Some(head);
        Ok(())
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for WriterSink<W> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}
