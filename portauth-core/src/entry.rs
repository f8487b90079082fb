//! Credential entry model.
//!
//! A [`CredentialEntry`] is one `(binding, username, password)` tuple bound to
//! a listening port, or to the default slot at [`DEFAULT_PORT`]. The default
//! record supplies any field a port record leaves empty; see
//! [`CredentialEntry::merge_with_default`].

use std::fmt;

use crate::error::AuthError;
use crate::secret::Secret;

/// Listening port of a database server instance.
pub type Port = u32;

/// Port number reserved for the default record.
pub const DEFAULT_PORT: Port = 0;

/// One of the three fields of a credential entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Binding,
    Username,
    Password,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binding => "binding",
            Self::Username => "username",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Connection credentials for one port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialEntry {
    /// Listening port, or [`DEFAULT_PORT`] for the default record.
    pub port: Port,

    /// Host or address the server is bound to.
    pub binding: String,

    /// Login name.
    pub username: String,

    /// Plaintext password.
    pub password: Secret,
}

impl CredentialEntry {
    /// Create an entry from its parts.
    pub fn new(
        port: Port,
        binding: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<Secret>,
    ) -> Self {
        Self {
            port,
            binding: binding.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Create an entry with every field empty.
    pub fn empty(port: Port) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    /// Whether this is the default record.
    pub fn is_default(&self) -> bool {
        self.port == DEFAULT_PORT
    }

    /// Whether binding, username and password are all empty.
    pub fn is_empty(&self) -> bool {
        self.binding.is_empty() && self.username.is_empty() && self.password.is_empty()
    }

    /// Reset every field to empty, keeping the port.
    pub fn clear(&mut self) {
        self.binding.clear();
        self.username.clear();
        self.password = Secret::default();
    }

    /// Fill each empty field from `default`.
    pub fn merge_with_default(&self, default: &CredentialEntry) -> CredentialEntry {
        let pick = |own: &str, fallback: &str| {
            if own.is_empty() {
                fallback.to_string()
            } else {
                own.to_string()
            }
        };

        CredentialEntry {
            port: self.port,
            binding: pick(&self.binding, &default.binding),
            username: pick(&self.username, &default.username),
            password: Secret::new(pick(self.password.expose(), default.password.expose())),
        }
    }

    /// Fields that are still empty.
    pub fn missing_fields(&self) -> Vec<Field> {
        let mut missing = Vec::new();
        if self.binding.is_empty() {
            missing.push(Field::Binding);
        }
        if self.username.is_empty() {
            missing.push(Field::Username);
        }
        if self.password.is_empty() {
            missing.push(Field::Password);
        }
        missing
    }

    /// Whether this entry needs `default` to supply at least one field.
    pub fn depends_on(&self, default: &CredentialEntry) -> bool {
        (self.binding.is_empty() && !default.binding.is_empty())
            || (self.username.is_empty() && !default.username.is_empty())
            || (self.password.is_empty() && !default.password.is_empty())
    }
}

/// Enforce that username and password are either both present or both absent.
pub fn validate_pairing(username: &str, password: &str) -> Result<(), AuthError> {
    if !username.is_empty() && password.is_empty() {
        return Err(AuthError::invalid_argument(
            "user",
            "no password specified with a username",
        ));
    }

    if username.is_empty() && !password.is_empty() {
        return Err(AuthError::invalid_argument(
            "password",
            "no username specified with a password",
        ));
    }

    Ok(())
}
