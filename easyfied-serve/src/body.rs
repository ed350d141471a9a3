//! Bridge between a delivery task and an axum response body.
//!
//! The delivery task writes into one end of an in-memory pipe; the response
//! body streams from the other end. A full pipe parks the delivery task until
//! hyper has sent more bytes, and a dropped body makes the next write fail.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use easyfied::error::DeliveryError;
use easyfied::io::sink::{ResponseHead, ResponseSink};
use futures::stream::Stream;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, DuplexStream};
use tokio::sync::oneshot;

/// Outcome of a delivery up to the point the head is known.
pub type HeadResult = Result<ResponseHead, DeliveryError>;

/// Sink half handed to the delivery task.
pub struct ChannelSink {
    head_tx: Option<oneshot::Sender<HeadResult>>,
    writer: DuplexStream,
}

impl ChannelSink {
    /// Take the head channel if the head has not been sent yet.
    pub fn take_head_tx(&mut self) -> Option<oneshot::Sender<HeadResult>> {
        self.head_tx.take()
    }
}

/// Create a sink, the receiver for its head, and the body it feeds.
pub fn channel(capacity: usize) -> (ChannelSink, oneshot::Receiver<HeadResult>, Body) {
    let (head_tx, head_rx) = oneshot::channel();
    let (writer, reader) = tokio::io::duplex(capacity.max(1));
    let sink = ChannelSink {
        head_tx: Some(head_tx),
        writer,
    };
    let body = Body::from_stream(read_chunks(reader, capacity.max(1)));
    (sink, head_rx, body)
}

fn read_chunks<R>(mut reader: R, capacity: usize) -> impl Stream<Item = io::Result<Bytes>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    async_stream::stream! {
        let mut buf = vec![0u8; capacity];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => yield Ok(Bytes::copy_from_slice(&buf[..n])),
                Err(err) => {
                    yield Err(err);
                    break;
                }
            }
        }
    }
}

impl ResponseSink for ChannelSink {
    fn write_head(&mut self, head: ResponseHead) -> io::Result<()> {
        let tx = self
            .head_tx
            .take()
            .ok_or_else(|| io::Error::other("response head already written"))?;
        tx.send(Ok(head))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "response dropped"))
    }
}

impl AsyncWrite for ChannelSink {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.writer).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.writer).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.writer).poll_shutdown(cx)
    }
}
