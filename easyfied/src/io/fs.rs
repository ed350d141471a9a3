//! Filesystem access used by static delivery.
//!
//! Delivery reaches the disk only through [`FileSystem`] so tests can observe
//! which calls are made.

use std::future::Future;
use std::io;
use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncRead;

/// The subset of file metadata delivery needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    pub is_dir: bool,
    pub len: u64,
}

pub trait FileSystem: Send + Sync {
    type File: AsyncRead + Unpin + Send;

    fn stat(&self, path: &Path) -> impl Future<Output = io::Result<FileMeta>> + Send;

    fn open(&self, path: &Path) -> impl Future<Output = io::Result<Self::File>> + Send;
}

/// The local disk, through tokio's blocking-pool file API.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    type File = File;

    async fn stat(&self, path: &Path) -> io::Result<FileMeta> {
        let meta = tokio::fs::metadata(path).await?;
        Ok(FileMeta {
            is_dir: meta.is_dir(),
            len: meta.len(),
        })
    }

    async fn open(&self, path: &Path) -> io::Result<File> {
        File::open(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stat_reports_files_and_directories() {
        let temp = tempfile::tempdir().expect("tempdir");
        let file = temp.path().join("a.txt");
        std::fs::write(&file, b"hello").expect("write");

        let meta = LocalFs.stat(&file).await.expect("stat file");
        assert_eq!(meta, FileMeta { is_dir: false, len: 5 });

        let dir = LocalFs.stat(temp.path()).await.expect("stat dir");
        assert!(dir.is_dir);

        let err = LocalFs
            .stat(&temp.path().join("missing"))
            .await
            .expect_err("missing file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
