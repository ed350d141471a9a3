//! Static file server mounting sandboxed folders under URL prefixes.

mod body;
mod config;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{MountConfig, load_config};
use crate::state::Mount;

#[derive(Parser)]
#[command(name = "easyfied-serve")]
#[command(about = "Serve sandboxed static folders over HTTP")]
struct Args {
    /// TOML config file (defaults apply when missing)
    #[arg(long, default_value = "easyfied.toml")]
    config: PathBuf,

    /// Address to bind the server to (overrides config)
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Static mount as BASE=FOLDER, e.g. /static=./public (repeatable)
    #[arg(long = "mount")]
    mounts: Vec<MountConfig>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("easyfied_serve=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut cfg = load_config(&args.config)?;
    if let Some(bind) = args.bind {
        cfg.bind = bind;
    }
    if let Some(port) = args.port {
        cfg.port = port;
    }
    cfg.mounts.extend(args.mounts);
    cfg.validate()?;
    if cfg.mounts.is_empty() {
        return Err(anyhow!("no static mounts configured (use --mount BASE=FOLDER)"));
    }

    let mut mounts = Vec::with_capacity(cfg.mounts.len());
    for mount_cfg in &cfg.mounts {
        let mount = Mount::open(mount_cfg, cfg.chunk_size_bytes)?;
        info!(
            base_url = %mount.base_url,
            folder = %mount.deliverer.sandbox().root().display(),
            "mounted static folder"
        );
        mounts.push(mount);
    }

    let app = routes::app_router(mounts).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", cfg.bind, cfg.port).parse()?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
