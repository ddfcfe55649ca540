pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "peershare")]
#[command(version, about = "Search and download files on the PeerShare network")]
pub struct Args {
    /// Client API URL (defaults to the config file, then http://localhost:8000)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the peershare config directory (defaults to ~/.peershare)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG overrides it
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    #[command(subcommand)]
    pub command: crate::Command,
}
