//! Test-only helpers: scratch asset roots, recording sinks, counting filesystem.

use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use anyhow::{Context as _, Result};
use tempfile::TempDir;
use tokio::io::AsyncWrite;

use crate::core::sandbox::PathSandbox;
use crate::io::fs::{FileMeta, FileSystem, LocalFs};
use crate::io::sink::{ResponseHead, ResponseSink};

/// A temporary directory to deliver files from.
pub struct AssetDir {
    dir: TempDir,
}

impl AssetDir {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create asset tempdir")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` at `rel`, creating parent directories.
    pub fn file(&self, rel: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        std::fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn sandbox(&self) -> Result<PathSandbox> {
        PathSandbox::try_new(self.dir.path())
            .with_context(|| format!("open sandbox {}", self.dir.path().display()))
    }
}

/// What a [`RecordingSink`] observed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Head(ResponseHead),
    /// A body write of this many bytes.
    Write(usize),
}

/// Sink that records the head, every write, and shutdown.
///
/// `throttled` sinks report `Pending` on every other write to exercise
/// backpressure; `failing_after` sinks break once the byte limit is reached;
/// `failing_shutdown` sinks accept every byte but refuse to finish.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
    pub body: Vec<u8>,
    pub finished: bool,
    pub pending_returned: usize,
    pub max_write: usize,
    throttle: bool,
    stalled: bool,
    fail_after: Option<usize>,
    fail_shutdown: bool,
}

impl RecordingSink {
    pub fn throttled() -> Self {
        Self {
            throttle: true,
            ..Self::default()
        }
    }

    pub fn failing_after(limit: usize) -> Self {
        Self {
            fail_after: Some(limit),
            ..Self::default()
        }
    }

    pub fn failing_shutdown() -> Self {
        Self {
            fail_shutdown: true,
            ..Self::default()
        }
    }

    pub fn head(&self) -> Option<&ResponseHead> {
        self.events.iter().find_map(|event| match event {
            SinkEvent::Head(head) => Some(head),
            SinkEvent::Write(_) => None,
        })
    }
}

impl ResponseSink for RecordingSink {
    fn write_head(&mut self, head: ResponseHead) -> io::Result<()> {
        self.events.push(SinkEvent::Head(head));
        Ok(())
    }
}

impl AsyncWrite for RecordingSink {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.throttle {
            self.stalled = !self.stalled;
            if self.stalled {
                self.pending_returned += 1;
                cx.waker().wake_by_ref();
                return Poll::Pending;
            }
        }

        let accepted = match self.fail_after {
            Some(limit) if self.body.len() >= limit => {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "sink closed",
                )));
            }
            Some(limit) => buf.len().min(limit - self.body.len()),
            None => buf.len(),
        };

        self.body.extend_from_slice(&buf[..accepted]);
        self.max_write = self.max_write.max(accepted);
        self.events.push(SinkEvent::Write(accepted));
        Poll::Ready(Ok(accepted))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        if self.fail_shutdown {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "peer closed before finish",
            )));
        }
        self.finished = true;
        Poll::Ready(Ok(()))
    }
}

/// [`LocalFs`] that counts `stat` calls.
#[derive(Debug, Default)]
pub struct CountingFs {
    stats: AtomicUsize,
}

impl CountingFs {
    pub fn stat_calls(&self) -> usize {
        self.stats.load(Ordering::SeqCst)
    }
}

impl FileSystem for CountingFs {
    type File = tokio::fs::File;

    async fn stat(&self, path: &Path) -> io::Result<FileMeta> {
        self.stats.fetch_add(1, Ordering::SeqCst);
        LocalFs.stat(path).await
    }

    async fn open(&self, path: &Path) -> io::Result<Self::File> {
        LocalFs.open(path).await
    }
}
