//! Static file delivery from a sandboxed root.

use std::io;

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, instrument, warn};

use crate::core::sandbox::PathSandbox;
use crate::error::DeliveryError;
use crate::io::content_type::content_type_for;
use crate::io::fs::{FileSystem, LocalFs};
use crate::io::sink::{ResponseHead, ResponseSink};

/// Read buffer size used when the caller does not pick one.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Streams files under a [`PathSandbox`] into response sinks.
///
/// Nothing is cached: every delivery stats and reads the file again.
#[derive(Debug, Clone)]
pub struct FileDeliverer<F = LocalFs> {
    sandbox: PathSandbox,
    fs: F,
    chunk_size: usize,
}

impl FileDeliverer<LocalFs> {
    pub fn new(sandbox: PathSandbox) -> Self {
        Self::with_fs(sandbox, LocalFs)
    }
}

impl<F: FileSystem> FileDeliverer<F> {
    pub fn with_fs(sandbox: PathSandbox, fs: F) -> Self {
        Self {
            sandbox,
            fs,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the read buffer size. Zero is bumped to one byte.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn sandbox(&self) -> &PathSandbox {
        &self.sandbox
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Deliver `sub_path` into `sink` and return the number of body bytes sent.
    ///
    /// The head (status 200, `Content-Type`, `Content-Length`) is written before
    /// any body byte. The call resolves only after the sink has shut down
    /// cleanly; a sink error or a file shorter than its stat size fails with
    /// [`DeliveryError::StreamFailure`].
    #[instrument(skip(self, sink), fields(root = %self.sandbox.root().display()))]
    pub async fn deliver<S: ResponseSink>(
        &self,
        sub_path: &str,
        sink: &mut S,
    ) -> Result<u64, DeliveryError> {
        let Some(full_path) = self.sandbox.resolve(sub_path) else {
            debug!("path escapes sandbox");
            return Err(DeliveryError::IllegalPath {
                requested: sub_path.to_string(),
            });
        };

        let meta = self
            .fs
            .stat(&full_path)
            .await
            .map_err(|source| DeliveryError::FileUnavailable {
                path: full_path.clone(),
                source,
            })?;
        if meta.is_dir {
            debug!(path = %full_path.display(), "refusing directory");
            return Err(DeliveryError::IsADirectory { path: full_path });
        }

        let file =
            self.fs
                .open(&full_path)
                .await
                .map_err(|source| DeliveryError::FileUnavailable {
                    path: full_path.clone(),
                    source,
                })?;

        let head = ResponseHead::ok(content_type_for(&full_path), meta.len);
        sink.write_head(head).map_err(DeliveryError::StreamFailure)?;

        let mut body = BufReader::with_capacity(self.chunk_size, file.take(meta.len));
        let written = match tokio::io::copy_buf(&mut body, &mut *sink).await {
            Ok(written) => written,
            Err(err) => {
                warn!(path = %full_path.display(), error = %err, "body transfer aborted");
                return Err(DeliveryError::StreamFailure(err));
            }
        };
        if written != meta.len {
            warn!(
                path = %full_path.display(),
                expected = meta.len,
                written,
                "file shorter than its stat size"
            );
            return Err(DeliveryError::StreamFailure(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file ended after {written} of {} bytes", meta.len),
            )));
        }

        sink.shutdown().await.map_err(DeliveryError::StreamFailure)?;
        debug!(path = %full_path.display(), bytes = written, "delivered");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::io::fs::FileMeta;
    use crate::test_support::{AssetDir, CountingFs, RecordingSink, SinkEvent};

    /// Reports files as `extra` bytes longer than they are.
    struct OverstatingFs {
        extra: u64,
    }

    impl FileSystem for OverstatingFs {
        type File = tokio::fs::File;

        async fn stat(&self, path: &Path) -> io::Result<FileMeta> {
            let meta = LocalFs.stat(path).await?;
            Ok(FileMeta {
                len: meta.len + self.extra,
                ..meta
            })
        }

        async fn open(&self, path: &Path) -> io::Result<Self::File> {
            LocalFs.open(path).await
        }
    }

    fn deliverer(assets: &AssetDir) -> FileDeliverer<CountingFs> {
        FileDeliverer::with_fs(assets.sandbox().expect("sandbox"), CountingFs::default())
    }

    #[tokio::test]
    async fn delivers_file_with_head_first() {
        let assets = AssetDir::new().expect("assets");
        assets.file("css/site.css", b"body{}").expect("write");
        let deliverer = deliverer(&assets);
        let mut sink = RecordingSink::default();

        let sent = deliverer
            .deliver("./css/site.css", &mut sink)
            .await
            .expect("deliver");

        assert_eq!(sent, 6);
        assert_eq!(sink.body, b"body{}".to_vec());
        assert!(sink.finished);
        assert_eq!(
            sink.events.first(),
            Some(&SinkEvent::Head(ResponseHead::ok(
                "text/css; charset=utf-8".to_string(),
                6
            )))
        );
        assert!(sink.events[1..].iter().all(|e| matches!(e, SinkEvent::Write(_))));
    }

    #[tokio::test]
    async fn illegal_path_never_stats() {
        let assets = AssetDir::new().expect("assets");
        let deliverer = deliverer(&assets);
        let mut sink = RecordingSink::default();

        let err = deliverer
            .deliver("../../etc/passwd", &mut sink)
            .await
            .expect_err("outside root");

        assert!(matches!(err, DeliveryError::IllegalPath { .. }));
        assert_eq!(deliverer.fs().stat_calls(), 0);
        assert!(sink.events.is_empty());
    }

    #[tokio::test]
    async fn directory_is_refused() {
        let assets = AssetDir::new().expect("assets");
        assets.file("docs/readme.txt", b"hi").expect("write");
        let deliverer = deliverer(&assets);
        let mut sink = RecordingSink::default();

        let err = deliverer
            .deliver("docs", &mut sink)
            .await
            .expect_err("directory");
        assert!(matches!(err, DeliveryError::IsADirectory { .. }));

        let err = deliverer
            .deliver(".", &mut sink)
            .await
            .expect_err("root directory");
        assert!(matches!(err, DeliveryError::IsADirectory { .. }));
        assert!(sink.events.is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_unavailable_with_os_detail() {
        let assets = AssetDir::new().expect("assets");
        let deliverer = deliverer(&assets);
        let mut sink = RecordingSink::default();

        let err = deliverer
            .deliver("missing.txt", &mut sink)
            .await
            .expect_err("missing");

        let http = err.http_error().expect("http error");
        assert_eq!(http.title, "Unable to open file");
        assert!(http.detail.is_some());
        assert_eq!(deliverer.fs().stat_calls(), 1);
    }

    #[tokio::test]
    async fn unknown_extension_gets_empty_content_type() {
        let assets = AssetDir::new().expect("assets");
        assets.file("blob.nosuchext", b"\x00\x01").expect("write");
        let deliverer = deliverer(&assets);
        let mut sink = RecordingSink::default();

        deliverer
            .deliver("blob.nosuchext", &mut sink)
            .await
            .expect("deliver");
        assert_eq!(
            sink.head().map(|h| h.content_type.as_str()),
            Some("")
        );
    }

    #[tokio::test]
    async fn large_file_streams_in_chunks_under_backpressure() {
        let assets = AssetDir::new().expect("assets");
        let payload: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        assets.file("big.bin", &payload).expect("write");
        let deliverer = deliverer(&assets).chunk_size(4096);
        let mut sink = RecordingSink::throttled();

        let sent = deliverer
            .deliver("big.bin", &mut sink)
            .await
            .expect("deliver");

        assert_eq!(sent, payload.len() as u64);
        assert_eq!(sink.body, payload);
        assert!(sink.pending_returned > 0);
        assert!(sink.max_write <= 4096);
    }

    #[tokio::test]
    async fn sink_failure_aborts_delivery() {
        let assets = AssetDir::new().expect("assets");
        assets.file("big.bin", &vec![7u8; 10_000]).expect("write");
        let deliverer = deliverer(&assets).chunk_size(1024);
        let mut sink = RecordingSink::failing_after(2048);

        let err = deliverer
            .deliver("big.bin", &mut sink)
            .await
            .expect_err("sink fails");

        assert!(matches!(err, DeliveryError::StreamFailure(_)));
        assert!(err.http_error().is_none());
        assert!(!sink.finished);
        assert!(sink.body.len() <= 2048);
    }

    #[tokio::test]
    async fn every_delivery_restats() {
        let assets = AssetDir::new().expect("assets");
        assets.file("a.txt", b"one").expect("write");
        let deliverer = deliverer(&assets);

        let mut first = RecordingSink::default();
        deliverer.deliver("a.txt", &mut first).await.expect("first");
        assets.file("a.txt", b"second").expect("rewrite");
        let mut second = RecordingSink::default();
        deliverer.deliver("a.txt", &mut second).await.expect("second");

        assert_eq!(first.body, b"one".to_vec());
        assert_eq!(second.body, b"second".to_vec());
        assert_eq!(deliverer.fs().stat_calls(), 2);
    }

    #[tokio::test]
    async fn file_shorter_than_stat_fails_without_finishing() {
        let assets = AssetDir::new().expect("assets");
        assets.file("short.txt", b"hello").expect("write");
        let sandbox = assets.sandbox().expect("sandbox");
        let deliverer = FileDeliverer::with_fs(sandbox, OverstatingFs { extra: 10 });
        let mut sink = RecordingSink::default();

        let err = deliverer
            .deliver("short.txt", &mut sink)
            .await
            .expect_err("short read");

        match &err {
            DeliveryError::StreamFailure(source) => {
                assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected stream failure, got {other:?}"),
        }
        assert!(err.http_error().is_none());
        assert!(!sink.finished);
        assert_eq!(sink.head().map(|h| h.content_length), Some(15));
        assert_eq!(sink.body, b"hello".to_vec());
    }

    #[tokio::test]
    async fn refused_shutdown_fails_after_full_body() {
        let assets = AssetDir::new().expect("assets");
        assets.file("a.txt", b"complete").expect("write");
        let deliverer = deliverer(&assets);
        let mut sink = RecordingSink::failing_shutdown();

        let err = deliverer
            .deliver("a.txt", &mut sink)
            .await
            .expect_err("shutdown refused");

        assert!(matches!(err, DeliveryError::StreamFailure(_)));
        assert!(err.http_error().is_none());
        assert_eq!(sink.body, b"complete".to_vec());
        assert!(!sink.finished);
    }
}
