//! Account-side credential flows: the password policy applied before hashing
//! and the login check that collapses every failure into a plain rejection.
//!
//! Routing, session issuance, and the user document store live outside this
//! crate; they hand plaintext in and persist or look up the record string.

use log::{debug, warn};
use thiserror::Error;

use crate::crypto::passwords::{hash_password, verify_password, PasswordError};
use crate::crypto::record::CredentialRecord;

/// Shortest password accepted at enrollment.
pub const MIN_PASSWORD_LEN: usize = 8;
/// Longest password accepted at enrollment; keeps pathological inputs out of
/// the key-derivation path.
pub const MAX_PASSWORD_LEN: usize = 128;

/// Errors produced while enrolling a password.
#[derive(Debug, Error)]
pub enum EnrollError {
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
    #[error("password must be at most {MAX_PASSWORD_LEN} characters")]
    PasswordTooLong,
    #[error(transparent)]
    Hash(#[from] PasswordError),
}

/// Validates and hashes a password for a new account or a password change.
/// The returned record replaces any stored one wholesale.
pub fn enroll_password(plaintext: &str) -> Result<CredentialRecord, EnrollError> {
    let length = plaintext.chars().count();
    if length < MIN_PASSWORD_LEN {
        return Err(EnrollError::PasswordTooShort);
    }
    if length > MAX_PASSWORD_LEN {
        return Err(EnrollError::PasswordTooLong);
    }

    let record = hash_password(plaintext)?;
    debug!("enrolled new credential record");
    Ok(record)
}

/// Checks a login attempt against the stored record string.
///
/// Every failure collapses to `false`, whether the password was wrong or the
/// stored record was unusable, so callers can only ever answer a login with a
/// generic "invalid credentials". Operators get the error kind in the log;
/// credential material is never written anywhere.
pub fn login_check(candidate: &str, stored: &str) -> bool {
    match verify_password(candidate, stored) {
        Ok(matched) => matched,
        Err(err) => {
            warn!("login rejected before comparison: {}", error_kind(&err));
            false
        }
    }
}

/// Stable operator-facing label for a verification failure. Labels carry no
/// error payload; hex failures would quote fragments of the stored record.
fn error_kind(err: &PasswordError) -> &'static str {
    match err {
        PasswordError::InvalidInput => "invalid input",
        PasswordError::CryptoUnavailable(_) => "crypto primitive unavailable",
        PasswordError::MalformedRecord(_) => "malformed stored record",
    }
}
