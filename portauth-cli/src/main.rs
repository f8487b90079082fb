//! portauth CLI
//!
//! Command-line administration of the per-port database credential file
//! read by the monitoring agent.
//!
//! # Usage
//!
//! ```bash
//! # Credentials shared by every instance unless overridden
//! portauth default --bind 127.0.0.1 --user monuser --password monpw
//!
//! # An instance on port 3307 bound elsewhere, inheriting the login
//! portauth update 3307 --bind 10.0.0.7
//!
//! # Show everything (passwords masked)
//! portauth list
//!
//! # Disable automatic credential updates
//! portauth autoupdate false
//! ```

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portauth_core::{CredentialDirectory, FileStore, Port};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod config;

use commands::CredentialArgs;

#[derive(Parser)]
#[command(name = "portauth")]
#[command(about = "Manage per-port database credentials for the monitoring agent")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Credential file, overriding the configured one
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Default)]
struct CredentialFlags {
    /// Binding host or address
    #[arg(short, long)]
    bind: Option<String>,

    /// Username (requires --password)
    #[arg(short, long)]
    user: Option<String>,

    /// Password (requires --user)
    #[arg(short, long)]
    password: Option<String>,
}

impl From<CredentialFlags> for CredentialArgs {
    fn from(flags: CredentialFlags) -> Self {
        Self {
            bind: flags.bind,
            user: flags.user,
            password: flags.password,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Set the default credentials used to fill in omitted fields
    Default {
        #[command(flatten)]
        creds: CredentialFlags,
    },

    /// Add or replace credentials for a port
    Update {
        /// Listening port of the server instance
        port: Port,

        #[command(flatten)]
        creds: CredentialFlags,
    },

    /// Delete credentials for a port (0 deletes the default record)
    Delete {
        /// Listening port of the server instance
        port: Port,
    },

    /// List the default record and every configured port
    List,

    /// Show or set whether automatic credential updates are allowed
    Autoupdate {
        /// New setting; omit to show the current one
        #[arg(action = clap::ArgAction::Set)]
        allowed: Option<bool>,
    },
}

impl Commands {
    fn mutates(&self) -> bool {
        match self {
            Self::Default { .. } | Self::Update { .. } | Self::Delete { .. } => true,
            Self::Autoupdate { allowed } => allowed.is_some(),
            Self::List => false,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load_config(cli.config.as_deref())?;
    init_logging(&config.log_level, cli.verbose);
    debug!("Loaded configuration from {:?}", config.config_path);

    let auth_file = cli.file.unwrap_or(config.auth_file);
    let mut dir = CredentialDirectory::new(FileStore::new(&auth_file));
    dir.load()
        .with_context(|| format!("Failed to load credentials from {:?}", auth_file))?;

    let mutates = cli.command.mutates();
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Default { creds } => commands::set_default(&mut dir, &creds.into(), &mut out)?,
        Commands::Update { port, creds } => {
            commands::update_port(&mut dir, port, &creds.into(), &mut out)?
        }
        Commands::Delete { port } => commands::delete_port(&mut dir, port, &mut out)?,
        Commands::List => commands::list(&dir, &mut out)?,
        Commands::Autoupdate { allowed } => commands::autoupdate(&mut dir, allowed, &mut out)?,
    }

    if mutates {
        dir.save()
            .with_context(|| format!("Failed to save credentials to {:?}", auth_file))?;
        debug!("Saved credentials to {:?}", auth_file);
    }

    Ok(())
}

fn init_logging(level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
