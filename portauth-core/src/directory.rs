//! Per-port credential directory.
//!
//! A [`CredentialDirectory`] maps listening ports to [`CredentialEntry`]
//! records kept in a [`KeyValueStore`]. Port `0` holds the default record:
//! any field a port record leaves empty is taken from it when the record is
//! read back with [`get_entry`](CredentialDirectory::get_entry).
//!
//! Mutations go straight to the store's map. Call
//! [`save`](CredentialDirectory::save) to persist them.
//!
//! # Example
//!
//! ```rust
//! use portauth_core::{CredentialDirectory, MemoryStore};
//!
//! let mut dir = CredentialDirectory::new(MemoryStore::new());
//! dir.load()?;
//!
//! dir.add_credential_set(0, "127.0.0.1", "", "")?;
//! dir.add_credential_set(3306, "", "monuser", "monpw")?;
//!
//! let entry = dir.get_entry(3306)?;
//! assert_eq!(entry.binding, "127.0.0.1");
//! assert_eq!(entry.username, "monuser");
//! # Ok::<(), portauth_core::AuthError>(())
//! ```

use crate::codec::{self, Base64Codec, PasswordCodec};
use crate::entry::{self, CredentialEntry, DEFAULT_PORT, Port};
use crate::error::AuthError;
use crate::store::{KeyValueStore, StoreError};

/// Store key of the automatic-update flag.
pub const AUTO_UPDATE_KEY: &str = "AutoUpdate";

/// Store key of the default record.
const DEFAULT_KEY: &str = "0";

/// Credentials for every monitored port, plus the default record.
pub struct CredentialDirectory<S, C = Base64Codec> {
    store: S,
    codec: C,
    default: CredentialEntry,
}

impl<S: KeyValueStore> CredentialDirectory<S> {
    /// Create a directory over `store` using base64 password encoding.
    pub fn new(store: S) -> Self {
        Self::with_codec(store, Base64Codec)
    }
}

impl<S: KeyValueStore, C: PasswordCodec> CredentialDirectory<S, C> {
    /// Create a directory over `store` with a custom password codec.
    pub fn with_codec(store: S, codec: C) -> Self {
        Self {
            store,
            codec,
            default: CredentialEntry::empty(DEFAULT_PORT),
        }
    }

    /// Load the store and cache the default record.
    ///
    /// A store with nothing persisted yet is an empty directory, not an error.
    pub fn load(&mut self) -> Result<(), AuthError> {
        match self.store.load() {
            Ok(()) => {}
            Err(StoreError::Missing { path }) => {
                tracing::debug!(?path, "No stored credentials, starting empty");
            }
            Err(e) => return Err(e.into()),
        }

        self.default = CredentialEntry::empty(DEFAULT_PORT);
        if self.store.contains_key(DEFAULT_KEY) {
            self.default = self.get_entry(DEFAULT_PORT)?;
        }

        Ok(())
    }

    /// Persist the store.
    pub fn save(&self) -> Result<(), AuthError> {
        self.store.save()?;
        Ok(())
    }

    /// The cached default record.
    pub fn default_entry(&self) -> &CredentialEntry {
        &self.default
    }

    /// Set whether the agent may update its stored credentials automatically.
    pub fn allow_automatic_updates(&mut self, allowed: bool) {
        let setting = if allowed { "true" } else { "false" };
        self.store.set(AUTO_UPDATE_KEY, setting);
    }

    /// Whether automatic updates are allowed.
    ///
    /// Defaults to `true` unless the stored flag is `false` (any case) or `0`.
    /// Unrecognized values are logged and treated as `true`.
    pub fn automatic_updates(&self) -> bool {
        let Some(value) = self.store.get(AUTO_UPDATE_KEY) else {
            return true;
        };

        if value.eq_ignore_ascii_case("true") || value == "1" {
            true
        } else if value.eq_ignore_ascii_case("false") || value == "0" {
            false
        } else {
            tracing::warn!(value, "AutoUpdate value is not true or false, assuming true");
            true
        }
    }

    /// Add or replace the credentials for `port`.
    ///
    /// Username and password must be given together. For port `0` any field
    /// may be empty. For other ports each empty field must be supplied by the
    /// default record.
    pub fn add_credential_set(
        &mut self,
        port: Port,
        binding: &str,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        entry::validate_pairing(username, password)?;

        check_storable("binding", "binding host", binding)?;
        check_storable("user", "username", username)?;

        if port == DEFAULT_PORT {
            self.store.set(
                DEFAULT_KEY,
                &codec::format_record(&self.codec, binding, username, password),
            );
            self.default = CredentialEntry::new(DEFAULT_PORT, binding, username, password);
            tracing::debug!("Stored default credentials");
            return Ok(());
        }

        if binding.is_empty() && self.default.binding.is_empty() {
            return Err(AuthError::invalid_authentication(
                "no binding host specified",
            ));
        }

        if username.is_empty() && self.default.username.is_empty() {
            return Err(AuthError::invalid_authentication("no username specified"));
        }

        if password.is_empty() && self.default.password.is_empty() {
            return Err(AuthError::invalid_authentication("no password specified"));
        }

        self.store.set(
            &port.to_string(),
            &codec::format_record(&self.codec, binding, username, password),
        );
        tracing::debug!(port, "Stored credentials");
        Ok(())
    }

    /// Remove the credentials for `port`.
    ///
    /// The default record cannot be removed while any port record relies on
    /// one of its non-empty fields. Every port record is checked before
    /// anything is removed.
    pub fn delete_credential_set(&mut self, port: Port) -> Result<(), AuthError> {
        let key = port.to_string();
        if !self.store.contains_key(&key) {
            return Err(AuthError::invalid_argument(
                "port",
                "specified port does not exist in configuration",
            ));
        }

        if port == DEFAULT_PORT && !self.default.is_empty() {
            self.ensure_default_unused()?;
        }

        self.store.remove(&key);
        if port == DEFAULT_PORT {
            self.default.clear();
        }

        tracing::debug!(port, "Deleted credentials");
        Ok(())
    }

    /// Ports with stored credentials, excluding the default record.
    pub fn port_list(&self) -> Vec<Port> {
        self.store
            .entries()
            .filter_map(|(key, _)| port_key(key))
            .filter(|&port| port != DEFAULT_PORT)
            .collect()
    }

    /// Resolved credentials for `port`.
    ///
    /// For any port other than `0`, empty fields are filled from the default
    /// record and the result must be complete. The default record itself is
    /// returned as stored.
    pub fn get_entry(&self, port: Port) -> Result<CredentialEntry, AuthError> {
        let key = port.to_string();
        let raw = self
            .store
            .get(&key)
            .ok_or(AuthError::PortNotFound { port })?;

        let fields = codec::split_record(raw).ok_or_else(|| {
            AuthError::invalid_authentication(format!("invalid value for port {key}: {raw}"))
        })?;

        let password = codec::decode_password(&self.codec, &fields.password).ok_or_else(|| {
            AuthError::invalid_authentication(format!(
                "unable to decode password for port {port}: {raw}"
            ))
        })?;

        let stored = CredentialEntry::new(port, fields.binding, fields.username, password);
        if port == DEFAULT_PORT {
            return Ok(stored);
        }

        let resolved = stored.merge_with_default(&self.default);
        if !resolved.missing_fields().is_empty() {
            return Err(AuthError::invalid_authentication(format!(
                "missing values for port {port}: \"{raw}\"  Default binding: {}, default username: {}, default password: {}",
                self.default.binding,
                self.default.username,
                if self.default.password.is_empty() {
                    "empty"
                } else {
                    "not empty"
                },
            )));
        }

        Ok(resolved)
    }

    /// Resolved credentials for every stored port, in port-list order.
    pub fn entries(&self) -> Result<Vec<CredentialEntry>, AuthError> {
        self.port_list()
            .into_iter()
            .map(|port| self.get_entry(port))
            .collect()
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the directory and return the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Fail if any stored port record relies on the current default record.
    fn ensure_default_unused(&self) -> Result<(), AuthError> {
        for (key, raw) in self.store.entries() {
            if key == DEFAULT_KEY || !is_port_key(key) {
                continue;
            }

            // The password is only checked for emptiness, so it stays encoded.
            let fields = codec::split_record(raw).ok_or_else(|| {
                AuthError::invalid_authentication(format!(
                    "corrupt configuration, invalid value for port {key}: {raw}"
                ))
            })?;

            let stored = CredentialEntry::new(
                port_key(key).unwrap_or_default(),
                fields.binding,
                fields.username,
                fields.password,
            );
            if stored.depends_on(&self.default) {
                return Err(AuthError::invalid_authentication(format!(
                    "default record is required for port {key}"
                )));
            }
        }

        Ok(())
    }
}

impl<S: std::fmt::Debug, C> std::fmt::Debug for CredentialDirectory<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialDirectory")
            .field("store", &self.store)
            .field("default", &self.default)
            .finish()
    }
}

/// Reject values that would not survive a write and read back unchanged.
fn check_storable(field: &'static str, label: &str, value: &str) -> Result<(), AuthError> {
    if value.contains(',') {
        return Err(AuthError::invalid_argument(
            field,
            format!("{label} may not contain a comma"),
        ));
    }
    if value.trim() != value {
        return Err(AuthError::invalid_argument(
            field,
            format!("{label} may not begin or end with whitespace"),
        ));
    }
    Ok(())
}

/// Whether `key` is a canonical decimal number: ASCII digits, no leading zero.
fn is_port_key(key: &str) -> bool {
    !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'))
}

/// Parse a port key. Non-numeric keys and values too large for [`Port`] yield `None`.
fn port_key(key: &str) -> Option<Port> {
    if !is_port_key(key) {
        return None;
    }
    key.parse().ok()
}
