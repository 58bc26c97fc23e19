//! Password Digests
//!
//! Passwords are stored as the lowercase hex SHA-256 digest of the plaintext.
//! Comparison re-hashes the candidate and compares digests exactly; it is not
//! constant-time and carries no salt.
// TODO: move to a salted KDF (argon2) together with a rehash-on-login path for existing rows.

use sha2::{Digest, Sha256};

/// One-way digest of `plain`.
#[must_use]
pub fn hash_password(plain: &str) -> String {
    let digest = Sha256::digest(plain.as_bytes());
    format!("{digest:x}")
}

/// Whether `plain` hashes to `hash`.
#[must_use]
pub fn verify_password(plain: &str, hash: &str) -> bool {
    hash_password(plain) == hash
}
