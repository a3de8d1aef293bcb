//! Cryptographic core of the crate: the stored credential format and the
//! password hashing built on it. Each submodule keeps a single responsibility
//! so the security-relevant code stays short and auditable.

pub mod passwords;
pub mod record;
