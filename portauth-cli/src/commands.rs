//! Subcommand implementations.
//!
//! Each command works against an already loaded directory and writes its
//! human-readable output to `out`. Saving is left to the caller.

use std::io::Write;

use anyhow::{Context, Result};
use portauth_core::{CredentialDirectory, CredentialEntry, DEFAULT_PORT, KeyValueStore, Port};

const MASK: &str = "********";

/// Credential fields given on the command line.
#[derive(Debug, Default, Clone)]
pub struct CredentialArgs {
    pub bind: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl CredentialArgs {
    fn parts(&self) -> (&str, &str, &str) {
        (
            self.bind.as_deref().unwrap_or_default(),
            self.user.as_deref().unwrap_or_default(),
            self.password.as_deref().unwrap_or_default(),
        )
    }
}

pub fn set_default<S: KeyValueStore>(
    dir: &mut CredentialDirectory<S>,
    args: &CredentialArgs,
    out: &mut impl Write,
) -> Result<()> {
    let (bind, user, password) = args.parts();
    dir.add_credential_set(DEFAULT_PORT, bind, user, password)
        .context("Failed to set default credentials")?;
    writeln!(out, "Default credentials updated")?;
    Ok(())
}

pub fn update_port<S: KeyValueStore>(
    dir: &mut CredentialDirectory<S>,
    port: Port,
    args: &CredentialArgs,
    out: &mut impl Write,
) -> Result<()> {
    if port == DEFAULT_PORT {
        anyhow::bail!("Port 0 is reserved for the default record; use `default` instead");
    }

    let (bind, user, password) = args.parts();
    dir.add_credential_set(port, bind, user, password)
        .with_context(|| format!("Failed to set credentials for port {port}"))?;
    writeln!(out, "Credentials for port {port} updated")?;
    Ok(())
}

pub fn delete_port<S: KeyValueStore>(
    dir: &mut CredentialDirectory<S>,
    port: Port,
    out: &mut impl Write,
) -> Result<()> {
    dir.delete_credential_set(port)
        .with_context(|| format!("Failed to delete credentials for port {port}"))?;

    if port == DEFAULT_PORT {
        writeln!(out, "Default credentials deleted")?;
    } else {
        writeln!(out, "Credentials for port {port} deleted")?;
    }
    Ok(())
}

pub fn list<S: KeyValueStore>(dir: &CredentialDirectory<S>, out: &mut impl Write) -> Result<()> {
    writeln!(out, "default: {}", describe(dir.default_entry()))?;

    let mut ports = dir.port_list();
    ports.sort_unstable();
    for port in ports {
        match dir.get_entry(port) {
            Ok(entry) => writeln!(out, "{port}: {}", describe(&entry))?,
            Err(e) => writeln!(out, "{port}: error: {e}")?,
        }
    }

    writeln!(out, "autoupdate: {}", dir.automatic_updates())?;
    Ok(())
}

pub fn autoupdate<S: KeyValueStore>(
    dir: &mut CredentialDirectory<S>,
    setting: Option<bool>,
    out: &mut impl Write,
) -> Result<()> {
    if let Some(allowed) = setting {
        dir.allow_automatic_updates(allowed);
    }
    writeln!(out, "autoupdate: {}", dir.automatic_updates())?;
    Ok(())
}

fn describe(entry: &CredentialEntry) -> String {
    format!(
        "binding={} username={} password={}",
        entry.binding,
        entry.username,
        if entry.password.is_empty() { "" } else { MASK },
    )
}
