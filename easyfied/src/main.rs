//! Command-line front end for sandboxed delivery and value validation.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use easyfied::core::sandbox::PathSandbox;
use easyfied::exit_codes;
use easyfied::io::deliver::{DEFAULT_CHUNK_SIZE, FileDeliverer};
use easyfied::io::rules::load_rules;
use easyfied::io::sink::WriterSink;
use easyfied::logging;
use easyfied::validate::validate;

#[derive(Parser)]
#[command(
    name = "easyfied",
    version,
    about = "Sandboxed static delivery and value validation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print where CANDIDATE resolves under ROOT, or fail if it escapes.
    CheckPath {
        /// Sandbox root directory.
        #[arg(long)]
        root: PathBuf,
        candidate: String,
    },
    /// Deliver a file from ROOT to stdout.
    Fetch {
        /// Sandbox root directory.
        #[arg(long)]
        root: PathBuf,
        path: String,
        /// Echo the response head to stderr.
        #[arg(short, long)]
        include: bool,
        /// Read buffer size in bytes.
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },
    /// Validate a JSON value against a rules file.
    Validate {
        /// TOML file of `[[rule]]` tables.
        #[arg(long)]
        rules: PathBuf,
        /// JSON value given inline.
        #[arg(long, conflicts_with = "input")]
        value: Option<String>,
        /// File holding the JSON value (stdin when neither is given).
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::CheckPath { root, candidate } => cmd_check_path(&root, &candidate),
        Command::Fetch {
            root,
            path,
            include,
            chunk_size,
        } => cmd_fetch(&root, &path, include, chunk_size).await,
        Command::Validate {
            rules,
            value,
            input,
        } => cmd_validate(&rules, value.as_deref(), input.as_deref()),
    }
}

fn cmd_check_path(root: &Path, candidate: &str) -> Result<i32> {
    let sandbox = open_sandbox(root)?;
    match sandbox.resolve(candidate) {
        Some(resolved) => {
            println!("{}", resolved.display());
            Ok(exit_codes::OK)
        }
        None => {
            eprintln!("Illegal path: {candidate}");
            Ok(exit_codes::REJECTED)
        }
    }
}

async fn cmd_fetch(root: &Path, path: &str, include: bool, chunk_size: usize) -> Result<i32> {
    let deliverer = FileDeliverer::new(open_sandbox(root)?).chunk_size(chunk_size);
    let mut sink = WriterSink::new(tokio::io::stdout()).echo_head(include);
    match deliverer.deliver(path, &mut sink).await {
        Ok(_) => Ok(exit_codes::OK),
        Err(err) => match err.http_error() {
            Some(http) => {
                match &http.detail {
                    Some(detail) => eprintln!("{} {}: {}", http.status, http.title, detail),
                    None => eprintln!("{} {}", http.status, http.title),
                }
                Ok(exit_codes::REJECTED)
            }
            None => Err(err).context("deliver file"),
        },
    }
}

fn cmd_validate(rules: &Path, value: Option<&str>, input: Option<&Path>) -> Result<i32> {
    let validator = load_rules(rules)?;
    let raw = match (value, input) {
        (Some(inline), _) => inline.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read stdin")?;
            buf
        }
    };
    let value: Value = serde_json::from_str(&raw).context("parse json value")?;

    match validate(&value, &validator) {
        Ok(()) => {
            println!("ok");
            Ok(exit_codes::OK)
        }
        Err(err) => {
            eprintln!("{err}");
            Ok(exit_codes::REJECTED)
        }
    }
}

fn open_sandbox(root: &Path) -> Result<PathSandbox> {
    PathSandbox::try_new(root).with_context(|| format!("open sandbox root {}", root.display()))
}
