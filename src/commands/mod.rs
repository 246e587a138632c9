use crate::{
    auth::{self, AuthToken},
    config::ConnectionConfig,
    error::UsageRequested,
    transport::Transport,
};
use anyhow::Result;
use clap::Subcommand;
use std::io::Write;

pub mod completions;
pub mod create;
pub mod download;
pub mod health;
pub mod lists;
pub mod manage;
pub mod register;
pub mod search;
pub mod status;
pub mod submit;
pub mod update;

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Attempts user registration on the OHA Server")]
    Register,
    #[command(about = "Changes user permissions for target user (interactive prompts)")]
    Manage {
        #[arg(value_name = "UID")]
        uid: Option<String>,
    },
    #[command(about = "Searches the OHA Server for any matching HASH values in a file")]
    Search {
        #[arg(value_name = "FILE")]
        file: Option<String>,
    },
    #[command(about = "Submit a file containing HASH:PLAIN values to the OHA Server")]
    Submit {
        #[arg(value_name = "ALGO")]
        algo: Option<String>,
        #[arg(value_name = "FILE")]
        file: Option<String>,
    },
    #[command(about = "Requests the OHA Server settings then prints them")]
    Health,
    #[command(about = "Check the status of downloadable files on the OHA Server")]
    Status,
    #[command(about = "Downloads portions of the wordlist file from the OHA Server")]
    Wordlist {
        #[arg(value_name = "NUM")]
        num: Option<String>,
        #[arg(value_name = "QUERY")]
        query: Option<String>,
    },
    #[command(about = "Downloads portions of the rules file from the OHA Server")]
    Rules {
        #[arg(value_name = "NUM")]
        num: Option<String>,
        #[arg(value_name = "QUERY")]
        query: Option<String>,
    },
    #[command(about = "Downloads portions of the masks file from the OHA Server")]
    Masks {
        #[arg(value_name = "NUM")]
        num: Option<String>,
        #[arg(value_name = "QUERY")]
        query: Option<String>,
    },
    #[command(about = "View or download the available lists on the OHA Server")]
    Lists {
        #[arg(value_name = "LISTNAME")]
        name: Option<String>,
    },
    #[command(about = "Create a new private list on the OHA Server")]
    Create {
        #[arg(value_name = "LISTNAME")]
        name: Option<String>,
        #[arg(value_name = "FILE")]
        file: Option<String>,
    },
    #[command(about = "Updates the target list on the OHA Server")]
    Update {
        #[arg(value_name = "LISTNAME")]
        name: Option<String>,
        #[arg(value_name = "FILE")]
        file: Option<String>,
    },
    #[command(about = "Emit shell completion scripts")]
    Completions { shell: clap_complete::Shell },
}

/// Everything a handler needs for one invocation
pub struct Context<'a> {
    pub config: &'a ConnectionConfig,
    pub transport: Transport,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a ConnectionConfig) -> Result<Self> {
        Ok(Context {
            config,
            transport: Transport::from_config(config)?,
        })
    }

    pub fn with_transport(config: &'a ConnectionConfig, transport: Transport) -> Self {
        Context { config, transport }
    }

    pub async fn token(&self) -> Result<AuthToken> {
        auth::authenticate(&self.transport, self.config).await
    }
}

/// Unwrap a positional argument or ask `main` to print usage
pub(crate) fn required<'s>(arg: &'s Option<String>, command: &'static str) -> Result<&'s str> {
    arg.as_deref()
        .ok_or_else(|| UsageRequested { command }.into())
}

pub async fn run<W: Write>(cmd: Commands, ctx: &Context<'_>, out: &mut W) -> Result<()> {
    match cmd {
        Commands::Register => register::run(ctx, out).await,
        Commands::Manage { uid } => {
            let uid = required(&uid, "manage")?;
            manage::run(ctx, out, uid, &mut manage::TerminalPrompt).await
        }
        Commands::Search { file } => search::run(ctx, out, required(&file, "search")?).await,
        Commands::Submit { algo, file } => {
            let algo = required(&algo, "submit")?;
            let file = required(&file, "submit")?;
            submit::run(ctx, out, algo, file).await
        }
        Commands::Health => health::run(ctx, out).await,
        Commands::Status => status::run(ctx, out).await,
        Commands::Wordlist { num, query } => {
            let num = required(&num, "wordlist")?;
            download::run(ctx, out, download::Resource::Wordlist, num, query.as_deref()).await
        }
        Commands::Rules { num, query } => {
            let num = required(&num, "rules")?;
            download::run(ctx, out, download::Resource::Rules, num, query.as_deref()).await
        }
        Commands::Masks { num, query } => {
            let num = required(&num, "masks")?;
            download::run(ctx, out, download::Resource::Masks, num, query.as_deref()).await
        }
        Commands::Lists { name } => lists::run(ctx, out, name.as_deref()).await,
        Commands::Create { name, file } => {
            let name = required(&name, "create")?;
            let file = required(&file, "create")?;
            create::run(ctx, out, name, file).await
        }
        Commands::Update { name, file } => {
            let name = required(&name, "update")?;
            let file = required(&file, "update")?;
            update::run(ctx, out, name, file).await
        }
        Commands::Completions { shell } => completions::run(shell, out),
    }
}
