//! # portauth Core
//!
//! Credential directory for a monitoring agent that logs in to several
//! database server instances, one per listening port.
//!
//! This crate provides:
//! - [`CredentialEntry`] - binding host, username and password for one port
//! - [`CredentialDirectory`] - add/get/delete over a backing store, with a
//!   port-0 default record that fills in omitted fields
//! - [`KeyValueStore`] - the backing store abstraction, with in-memory and
//!   JSON file implementations
//! - [`PasswordCodec`] - reversible password encoding (base64 by default)
//!
//! Stored passwords are obfuscated, not encrypted. Anyone who can read the
//! credential file can recover them.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use portauth_core::{CredentialDirectory, FileStore};
//!
//! let mut dir = CredentialDirectory::new(FileStore::at_default_path()?);
//! dir.load()?;
//! dir.add_credential_set(3306, "127.0.0.1", "monuser", "monpw")?;
//! dir.save()?;
//! ```

pub mod codec;
pub mod directory;
pub mod entry;
pub mod error;
pub mod secret;
pub mod store;

// Re-export commonly used types at crate root
pub use codec::{Base64Codec, PasswordCodec};

pub use directory::{AUTO_UPDATE_KEY, CredentialDirectory};

pub use entry::{CredentialEntry, DEFAULT_PORT, Field, Port, validate_pairing};

pub use error::{AuthError, ErrorKind};

pub use secret::Secret;

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
