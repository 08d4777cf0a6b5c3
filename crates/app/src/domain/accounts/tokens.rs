//! Bearer token generation and hashing.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

const TOKEN_PREFIX: &str = "ost_";
const TOKEN_BYTES: usize = 32;

/// Generate a raw bearer token.
pub(crate) fn generate() -> String {
    let mut bytes = [0_u8; TOKEN_BYTES];

    OsRng.fill_bytes(&mut bytes);

    format!("{TOKEN_PREFIX}{}", URL_SAFE_NO_PAD.encode(bytes))
}

/// Hex encoded SHA-256 of a raw token; this is what gets stored.
pub(crate) fn hash(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_prefixed_and_unique() {
        let first = generate();
        let second = generate();

        assert!(first.starts_with(TOKEN_PREFIX));
        assert_ne!(first, second);
    }

    #[test]
    fn hash_is_stable_hex() {
        let hashed = hash("ost_example");

        assert_eq!(hashed.len(), 64);
        assert_eq!(hashed, hash("ost_example"));
        assert_ne!(hashed, hash("ost_other"));
    }
}
