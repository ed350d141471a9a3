//! Server configuration loaded from TOML.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use easyfied::io::deliver::DEFAULT_CHUNK_SIZE;
use serde::{Deserialize, Serialize};

/// Server configuration (TOML).
///
/// Missing fields default to a loopback listener with no mounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServeConfig {
    /// Address to bind the server to.
    pub bind: String,

    pub port: u16,

    /// Read buffer size used when streaming files.
    pub chunk_size_bytes: usize,

    #[serde(rename = "mount")]
    pub mounts: Vec<MountConfig>,
}

/// A folder served under a URL prefix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MountConfig {
    pub base_url: String,
    pub folder: PathBuf,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
            chunk_size_bytes: DEFAULT_CHUNK_SIZE,
            mounts: Vec::new(),
        }
    }
}

impl ServeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size_bytes == 0 {
            return Err(anyhow!("chunk_size_bytes must be > 0"));
        }
        let mut seen = HashSet::new();
        for mount in &self.mounts {
            if !mount.base_url.starts_with('/') {
                return Err(anyhow!(
                    "mount base_url '{}' must start with '/'",
                    mount.base_url
                ));
            }
            if !seen.insert(normalized_base(&mount.base_url)) {
                return Err(anyhow!("duplicate mount base_url '{}'", mount.base_url));
            }
        }
        Ok(())
    }
}

fn normalized_base(base_url: &str) -> &str {
    match base_url.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// `BASE=FOLDER` as given on the command line.
impl FromStr for MountConfig {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (base_url, folder) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected BASE=FOLDER, got '{s}'"))?;
        if folder.is_empty() {
            return Err(anyhow!("mount '{s}' has an empty folder"));
        }
        Ok(Self {
            base_url: base_url.to_string(),
            folder: PathBuf::from(folder),
        })
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ServeConfig::default()`.
pub fn load_config(path: &Path) -> Result<ServeConfig> {
    if !path.exists() {
        let cfg = ServeConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ServeConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
