use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{ServerConfig, DEFAULT_BIND, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(name = "notestash")]
#[command(version, about = "A tiny snapshot store for notes, served over HTTP")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log filter (e.g. "debug" or "notestash=trace"); overrides RUST_LOG
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Create empty stores in the data directory if they are missing
    Init {
        /// Directory holding data.txt and data_readable.txt
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to listen on
    #[arg(long, default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Port to listen on
    #[arg(long, short = 'p', default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory holding data.txt and data_readable.txt
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Largest request body accepted by /save
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            bind: args.bind,
            port: args.port,
            data_dir: args.data_dir,
            max_body_bytes: args.max_body_bytes,
        }
    }
}
