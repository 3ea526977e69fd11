//! Bearer and activation token material

use crate::storage::{Scope, Token};
use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};

/// RFC 4648 base32 alphabet
const TOKEN_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Length of every plaintext token
pub const TOKEN_LENGTH: usize = 26;

/// Generate a random plaintext token from the base32 alphabet
pub fn generate_plaintext() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LENGTH)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// SHA-256 of the plaintext, hex encoded; the only form a store keeps
pub fn hash_token(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

/// Build a token for `user_id` valid for `ttl` from now
pub fn generate(user_id: i64, ttl: chrono::Duration, scope: Scope) -> Token {
    let plaintext = generate_plaintext();
    Token {
        hash: hash_token(&plaintext),
        plaintext,
        user_id,
        expiry: Utc::now() + ttl,
        scope,
    }
}

/// Shape check performed before any store lookup
pub fn is_well_formed(plaintext: &str) -> bool {
    plaintext.len() == TOKEN_LENGTH
        && plaintext
            .bytes()
            .all(|b| TOKEN_ALPHABET.contains(&b.to_ascii_uppercase()))
}
