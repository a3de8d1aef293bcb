//! Password hashing and verification built around scrypt.
//! Cost parameters are build-time constants so every credential record in the
//! store carries the same work factor and nothing in stored data can lower it.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use scrypt::Params;
use subtle::ConstantTimeEq;
use thiserror::Error;
use zeroize::Zeroize;

use crate::crypto::record::{CredentialRecord, RecordError};

/// scrypt cost profile shared by hashing and verification.
/// - log_n 14 (N = 16384) with r = 8 costs 16 MiB of memory per derivation,
///   enough to hurt GPU crackers without straining a small API host
/// - p = 1 keeps worst-case latency a single sequential derivation
const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// Byte length of the derived key stored in a credential record.
pub const DERIVED_KEY_LEN: usize = 16;
/// Byte length of the random salt generated for every hash operation.
pub const SALT_LEN: usize = 12;

/// Errors produced while hashing or verifying a password.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must not be empty")]
    InvalidInput,
    #[error("crypto primitive unavailable: {0}")]
    CryptoUnavailable(String),
    #[error("stored credential record is malformed: {0}")]
    MalformedRecord(#[from] RecordError),
}

fn scrypt_params() -> Result<Params, PasswordError> {
    Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, DERIVED_KEY_LEN)
        .map_err(|err| PasswordError::CryptoUnavailable(err.to_string()))
}

/// Derives the fixed-size key for (plaintext, salt). Hashing and verification
/// both come through here so the two can never disagree on parameters.
fn derive_key(plaintext: &str, salt: &[u8]) -> Result<[u8; DERIVED_KEY_LEN], PasswordError> {
    let mut output = [0u8; DERIVED_KEY_LEN];
    scrypt::scrypt(plaintext.as_bytes(), salt, &scrypt_params()?, &mut output)
        .map_err(|err| PasswordError::CryptoUnavailable(err.to_string()))?;
    Ok(output)
}

/// Hashes a password with a salt drawn from the supplied randomness source
/// and returns the record to persist.
///
/// Empty plaintext is rejected before any entropy is consumed; length and
/// charset policy beyond that belongs to the caller. The salt is fresh per
/// call, so equal plaintexts still produce distinct records.
pub fn hash_password_with_rng<R>(
    plaintext: &str,
    rng: &mut R,
) -> Result<CredentialRecord, PasswordError>
where
    R: RngCore + CryptoRng,
{
    if plaintext.is_empty() {
        return Err(PasswordError::InvalidInput);
    }

    let mut salt = [0u8; SALT_LEN];
    rng.try_fill_bytes(&mut salt)
        .map_err(|err| PasswordError::CryptoUnavailable(err.to_string()))?;

    let derived = derive_key(plaintext, &salt)?;
    Ok(CredentialRecord::from_parts(derived.to_vec(), salt.to_vec()))
}

/// Hashes a password with the operating system's secure random source.
pub fn hash_password(plaintext: &str) -> Result<CredentialRecord, PasswordError> {
    hash_password_with_rng(plaintext, &mut OsRng)
}

/// Verifies a candidate password against a stored record string.
///
/// The record is parsed (bad data surfaces as
/// [`PasswordError::MalformedRecord`]), the key is re-derived from the
/// candidate and the stored salt, and the keys are compared without
/// short-circuiting on the first differing byte. A stored key of unexpected
/// length is reported as a plain non-match, not an error, so the shape of
/// stored data never leaks through the error channel.
pub fn verify_password(candidate: &str, stored: &str) -> Result<bool, PasswordError> {
    let record = CredentialRecord::parse(stored)?;
    let mut candidate_key = derive_key(candidate, record.salt())?;

    let stored_key = record.derived_key();
    let matched = if stored_key.len() == DERIVED_KEY_LEN {
        bool::from(candidate_key.as_slice().ct_eq(stored_key))
    } else {
        false
    };
    candidate_key.zeroize();

    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::{hash_password, hash_password_with_rng, verify_password, PasswordError};
    use crate::crypto::record::MAX_RECORD_LEN;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Instant;

    #[test]
    fn hashes_and_verifies_passwords() {
        let stored = hash_password("folio-test-password")
            .expect("hashing should succeed")
            .to_string();
        assert!(verify_password("folio-test-password", &stored).expect("verify should run"));
        assert!(!verify_password("wrong-password", &stored).expect("verify should run"));
    }

    #[test]
    fn rejects_empty_plaintext() {
        let err = hash_password("").unwrap_err();
        assert!(matches!(err, PasswordError::InvalidInput));
    }

    #[test]
    fn fresh_salt_per_hash() {
        let first = hash_password("repeated-password").expect("hashing should succeed");
        let second = hash_password("repeated-password").expect("hashing should succeed");
        assert_ne!(first.salt(), second.salt());
        assert_ne!(first.to_string(), second.to_string());
    }

    #[test]
    fn record_fits_the_password_column() {
        let rendered = hash_password("column-width-check")
            .expect("hashing should succeed")
            .to_string();
        assert_eq!(rendered.len(), 57);
        assert!(rendered.len() <= MAX_RECORD_LEN);
        assert!(rendered
            .chars()
            .all(|c| c == '.' || (c.is_ascii_hexdigit() && !c.is_ascii_uppercase())));
    }

    #[test]
    fn seeded_rng_reproduces_records() {
        let mut first_rng = StdRng::seed_from_u64(7);
        let mut second_rng = StdRng::seed_from_u64(7);
        let first = hash_password_with_rng("deterministic-check", &mut first_rng)
            .expect("hashing should succeed");
        let second = hash_password_with_rng("deterministic-check", &mut second_rng)
            .expect("hashing should succeed");
        assert_eq!(first, second);

        let mut other_rng = StdRng::seed_from_u64(8);
        let other = hash_password_with_rng("deterministic-check", &mut other_rng)
            .expect("hashing should succeed");
        assert_ne!(first, other);
    }

    // Vectors computed with the reference scrypt implementation at
    // log_n = 14, r = 8, p = 1, 16-byte output, raw salt bytes.
    #[test]
    fn reproduces_known_derivations() {
        let stored = "322625e7a0f47401bb1f8f679cec60aa.000000000000000000000000";
        assert!(verify_password("password123", stored).expect("verify should run"));

        let stored = "b61d74b21ce97efec14a764f0044bc40.8b5fd32b49f2a4e1c07d6a93";
        assert!(verify_password("correct horse battery staple", stored).expect("verify should run"));
    }

    #[test]
    fn malformed_records_are_errors() {
        for stored in ["not-a-valid-record", "", "aa.bb.cc", "zz.00ff", "aabb."] {
            let err = verify_password("anything", stored).unwrap_err();
            assert!(
                matches!(err, PasswordError::MalformedRecord(_)),
                "input: {stored:?}"
            );
        }
    }

    #[test]
    fn unexpected_key_length_is_a_non_match() {
        // Valid hex, but a 4-byte stored key instead of 16.
        let stored = "aabbccdd.000000000000000000000000";
        assert!(!verify_password("anything", stored).expect("verify should run"));
    }

    #[test]
    fn empty_candidate_is_a_non_match() {
        let stored = hash_password("present-password")
            .expect("hashing should succeed")
            .to_string();
        assert!(!verify_password("", &stored).expect("verify should run"));
    }

    #[test]
    #[ignore = "timing measurement needs a quiet host; run with --ignored"]
    fn verification_time_is_independent_of_match() {
        let stored = hash_password("timing-probe-password")
            .expect("hashing should succeed")
            .to_string();

        let rounds = 24;
        let mean_secs = |candidate: &str| {
            let start = Instant::now();
            for _ in 0..rounds {
                verify_password(candidate, &stored).expect("verify should run");
            }
            start.elapsed().as_secs_f64() / rounds as f64
        };

        let matching = mean_secs("timing-probe-password");
        let differing = mean_secs("timing-probe-passwore");
        let spread = (matching - differing).abs() / matching.max(differing);
        assert!(spread < 0.2, "timing spread {spread:.3} exceeds tolerance");
    }
}
