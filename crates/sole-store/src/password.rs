//! Salted password hashing.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SALT_LEN: usize = 16;

/// A freshly generated hex-encoded random salt.
pub(crate) fn generate_salt() -> String {
    rand::random::<[u8; SALT_LEN]>()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Hex-encoded SHA-256 of `salt || password`.
pub(crate) fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compares in constant time with respect to the stored hash.
pub(crate) fn verify_password(salt: &str, password: &str, expected_hash: &str) -> bool {
    let computed = hash_password(salt, password);
    computed.as_bytes().ct_eq(expected_hash.as_bytes()).into()
}
