//! Stored credential format: `<hex derived key>.<hex salt>`.
//! Both components are hex byte strings, so the `.` delimiter can never occur
//! inside a component and a well-formed record contains it exactly once.

use std::fmt;

use thiserror::Error;

/// Upper bound on a rendered record. The user document stores the password
/// field in a 64-character column; records produced by this crate are 57
/// characters (32 hex chars of key, the delimiter, 24 hex chars of salt).
pub const MAX_RECORD_LEN: usize = 64;

/// Separator between the derived-key and salt components.
const DELIMITER: char = '.';

/// Errors produced while parsing a stored record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("expected exactly one '.' between derived key and salt")]
    InvalidShape,
    #[error("derived key and salt must both be non-empty")]
    EmptyComponent,
    #[error("record component is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// A credential record: the derived key and the salt it was derived with.
/// The rendered form is what callers persist in the user document's password
/// field; it is replaced wholesale on password change, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    derived_key: Vec<u8>,
    salt: Vec<u8>,
}

impl CredentialRecord {
    /// Assembles a record from freshly derived components. Stored data goes
    /// through [`CredentialRecord::parse`] instead.
    pub(crate) fn from_parts(derived_key: Vec<u8>, salt: Vec<u8>) -> Self {
        Self { derived_key, salt }
    }

    /// Parses a stored record, enforcing the format invariants: exactly one
    /// delimiter, two non-empty components, both valid hex. Component byte
    /// lengths are not checked here; the store is untrusted input, and
    /// verification treats an unexpected key length as a non-match rather
    /// than a malformed record.
    pub fn parse(stored: &str) -> Result<Self, RecordError> {
        let mut parts = stored.split(DELIMITER);
        let (key_hex, salt_hex) = match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(salt), None) => (key, salt),
            _ => return Err(RecordError::InvalidShape),
        };
        if key_hex.is_empty() || salt_hex.is_empty() {
            return Err(RecordError::EmptyComponent);
        }

        Ok(Self {
            derived_key: hex::decode(key_hex)?,
            salt: hex::decode(salt_hex)?,
        })
    }

    pub fn derived_key(&self) -> &[u8] {
        &self.derived_key
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }
}

impl fmt::Display for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            hex::encode(&self.derived_key),
            DELIMITER,
            hex::encode(&self.salt)
        )
    }
}
