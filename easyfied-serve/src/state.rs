//! Shared state for static mounts.

use std::sync::Arc;

use anyhow::{Context, Result};
use easyfied::core::sandbox::PathSandbox;
use easyfied::io::deliver::FileDeliverer;

use crate::config::MountConfig;

/// One folder served under a URL prefix.
#[derive(Debug)]
pub struct Mount {
    /// Prefix stripped from request paths, e.g. `/static`.
    pub base_url: String,
    pub deliverer: FileDeliverer,
    /// Capacity of the pipe between the delivery task and the response body.
    pub chunk_size: usize,
}

pub type MountState = Arc<Mount>;

impl Mount {
    pub fn open(config: &MountConfig, chunk_size: usize) -> Result<MountState> {
        let sandbox = PathSandbox::try_new(&config.folder)
            .with_context(|| format!("open mount folder {}", config.folder.display()))?;
        Ok(Arc::new(Self {
            base_url: config.base_url.clone(),
            deliverer: FileDeliverer::new(sandbox).chunk_size(chunk_size),
            chunk_size,
        }))
    }
}
