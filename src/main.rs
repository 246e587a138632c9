//! # OHA Client
//!
//! Command-line client for the OHA hash-cracking coordination server.
//!
//! ## Quick Start
//!
//! ```bash
//! # Register the configured user
//! ohaclient register
//!
//! # Upload cracked hashes for hash mode 0
//! ohaclient submit 0 founds.txt
//!
//! # Look up hashes
//! ohaclient search hashes.txt
//!
//! # Fetch the first 100 wordlist entries
//! ohaclient wordlist 100
//! ```
//!
//! ## Configuration
//!
//! `~/.oha` is a JSON file with `server-url`, `server-port`,
//! `server-api-route`, `client-username` and `client-password`. Without it
//! the `SERVER_URL`, `SERVER_PORT`, `SERVER_API`, `CLIENT_USERNAME` and
//! `CLIENT_PASSWORD` environment variables must all be set.

use anyhow::Result;
use clap::{error::ErrorKind, CommandFactory, Parser};
use oha_client::{
    commands::{self, Commands, Context},
    config::{self, ConnectionConfig},
    error::{ConfigError, UsageRequested, ValidationError},
    output, Cli,
};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Parses arguments, loads the configuration once and runs exactly one
/// command. Every failure funnels back here to pick the exit code.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // unknown verbs get the usage text and a clean exit
        Err(err) if err.kind() == ErrorKind::InvalidSubcommand => {
            let _ = print_usage(&mut io::stdout(), None);
            return ExitCode::SUCCESS;
        }
        Err(err) => err.exit(),
    };
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "oha_client=info",
        _ => "oha_client=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut stdout = io::stdout().lock();

    if let Some(Commands::Completions { shell }) = cli.cmd {
        return commands::completions::run(shell, &mut stdout);
    }

    let cfg = config::load(&cli.config_path())?;
    let cfg = if cli.insecure {
        cfg.with_accept_invalid_certs(true)
    } else {
        cfg
    };
    tracing::debug!(config = ?cfg, "configuration loaded");

    let Some(cmd) = cli.cmd else {
        print_usage(&mut stdout, Some(&cfg))?;
        return Ok(());
    };
    let ctx = Context::new(&cfg)?;
    commands::run(cmd, &ctx, &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}

fn print_usage<W: Write>(out: &mut W, cfg: Option<&ConnectionConfig>) -> io::Result<()> {
    if let Some(cfg) = cfg {
        writeln!(out, "{}", output::heading("[+] OHA Client Configuration Settings:"))?;
        writeln!(out, "{}", output::success(&format!("OHA User: {}", cfg.username())))?;
        writeln!(
            out,
            "{}",
            output::success(&format!("OHA Server URL: {}:{}", cfg.host(), cfg.port()))
        )?;
        writeln!(
            out,
            "{}",
            output::success(&format!(
                "OHA Server API URL: {}:{}{}",
                cfg.host(),
                cfg.port(),
                cfg.api_route()
            ))
        )?;
    }
    write!(out, "{}", Cli::command().render_help())?;
    Ok(())
}

fn print_subcommand_usage(command: &str) {
    let mut cli = Cli::command();
    let help = match cli.find_subcommand_mut(command) {
        Some(sub) => sub.render_help(),
        None => cli.render_help(),
    };
    println!("{help}");
}

fn report(err: anyhow::Error) -> ExitCode {
    if let Some(usage) = err.downcast_ref::<UsageRequested>() {
        print_subcommand_usage(usage.command);
        return ExitCode::SUCCESS;
    }

    if let Some(ConfigError::NotConfigured { .. }) = err.downcast_ref::<ConfigError>() {
        eprintln!("{}", output::failure(&format!("[!] {err}")));
        return ExitCode::FAILURE;
    }

    eprintln!("{}", output::failure(&format!("error: {err:#}")));
    if err.downcast_ref::<ValidationError>().is_some() {
        let _ = print_usage(&mut io::stdout(), None);
    }
    ExitCode::FAILURE
}
