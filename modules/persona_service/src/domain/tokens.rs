//! Random token generation and verification token hashing

use rand::Rng;
use sha2::{Digest, Sha256};

/// Bytes of entropy in a generated token
const TOKEN_BYTES: usize = 32;

/// Fresh random token, hex-encoded
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}

/// Storage form of a verification token: `hex(sha256(token ++ secret))`
pub fn hash_token(token: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_hex_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_depends_on_secret() {
        let plain = hash_token("abc", "");
        assert_eq!(
            plain,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(hash_token("abc", "s3cret"), plain);
        assert_eq!(hash_token("abc", "s3cret"), hash_token("abc", "s3cret"));
    }
}
