//! Credential handling for the Folio book service. Passwords never reach
//! storage or comparison in plaintext: registration derives a salted scrypt
//! key and login re-derives it and compares in constant time.

pub mod accounts;
pub mod crypto;
