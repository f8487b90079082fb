//! Stored record format.
//!
//! Each record is a single line of text:
//!
//! ```text
//! <binding>, <username>, <encoded password>
//! ```
//!
//! The default record and port records share this format. The password is
//! passed through a [`PasswordCodec`], base64 by default. Base64 only keeps
//! passwords from being read at a glance; anyone who can read the file can
//! recover them. Swap in a different codec if real at-rest protection is
//! needed.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Reversible byte-to-text transformation applied to stored passwords.
pub trait PasswordCodec {
    /// Encode raw password bytes for storage.
    fn encode(&self, plain: &[u8]) -> String;

    /// Decode a stored password. Returns `None` if `encoded` is malformed.
    fn decode(&self, encoded: &str) -> Option<Vec<u8>>;
}

/// Standard-alphabet, padded base64.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl PasswordCodec for Base64Codec {
    fn encode(&self, plain: &[u8]) -> String {
        STANDARD.encode(plain)
    }

    fn decode(&self, encoded: &str) -> Option<Vec<u8>> {
        STANDARD.decode(encoded).ok()
    }
}

/// The three raw components of a stored record.
///
/// `password` is still encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub binding: String,
    pub username: String,
    pub password: String,
}

/// Serialize a credential tuple into its stored form.
pub fn format_record<C: PasswordCodec + ?Sized>(
    codec: &C,
    binding: &str,
    username: &str,
    password: &str,
) -> String {
    format!(
        "{}, {}, {}",
        binding,
        username,
        codec.encode(password.as_bytes())
    )
}

/// Split a stored value into its components.
///
/// Empty components are kept and surrounding whitespace is trimmed. Returns
/// `None` unless there are exactly three components.
pub fn split_record(raw: &str) -> Option<RecordFields> {
    let mut parts = raw.split(',').map(str::trim);
    let binding = parts.next()?;
    let username = parts.next()?;
    let password = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    Some(RecordFields {
        binding: binding.to_string(),
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Decode a stored password component into plaintext.
///
/// An empty component is an empty password and is not passed to the codec.
/// Returns `None` if the codec rejects the input or the bytes are not UTF-8.
pub fn decode_password<C: PasswordCodec + ?Sized>(codec: &C, encoded: &str) -> Option<String> {
    if encoded.is_empty() {
        return Some(String::new());
    }

    codec
        .decode(encoded)
        .and_then(|bytes| String::from_utf8(bytes).ok())
}
