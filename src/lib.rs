//! # OHA Client Library
//!
//! Request/response plumbing for the `ohaclient` binary: configuration
//! loading, token acquisition, the HTTP transport and one handler per verb.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

pub mod auth;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod output;
pub mod transport;
pub mod validate;

/// Command-line client for the OHA hash-cracking coordination server
///
/// Connection settings are read from `~/.oha` or, failing that, from the
/// `SERVER_URL`, `SERVER_PORT`, `SERVER_API`, `CLIENT_USERNAME` and
/// `CLIENT_PASSWORD` environment variables.
#[derive(Parser)]
#[command(
    name = "ohaclient",
    version,
    about = "Command-line client for the OHA hash-cracking coordination server",
    long_about = "Command-line client for the OHA hash-cracking coordination server.\n\nAuthenticates with the configured credentials, then registers users, manages permissions,\nsubmits and searches hashes, downloads wordlist/rules/masks slices and manages private lists."
)]
pub struct Cli {
    /// Config file to read instead of ~/.oha
    #[arg(long, global = true, env = constants::ENV_CONFIG_PATH, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Accept self-signed or otherwise invalid server certificates
    #[arg(long, global = true, env = constants::ENV_INSECURE)]
    pub insecure: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Option<commands::Commands>,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(config::default_config_path)
    }
}
