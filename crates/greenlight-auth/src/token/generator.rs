//! Token plaintext generation and hashing.
//!
//! A plaintext is 16 bytes from the OS RNG encoded as unpadded RFC 4648
//! base32, which always yields 26 characters. Only the SHA-256 digest of the
//! plaintext is ever stored.

use chrono::{DateTime, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use greenlight_core::error::AppError;
use greenlight_core::result::AppResult;
use greenlight_entity::{Token, TokenScope};

/// Length of every token plaintext.
pub const TOKEN_LENGTH: usize = 26;

const RANDOM_BYTES: usize = 16;

/// RFC 4648 base32 alphabet.
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Encode bytes as base32 without padding.
fn base32_encode(data: &[u8]) -> String {
    let mut result = String::with_capacity((data.len() * 8).div_ceil(5));
    let mut bits = 0u32;
    let mut bit_count = 0u8;

    for &byte in data {
        bits = (bits << 8) | (byte as u32);
        bit_count += 8;

        while bit_count >= 5 {
            bit_count -= 5;
            let index = ((bits >> bit_count) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[index] as char);
        }
    }

    if bit_count > 0 {
        let index = ((bits << (5 - bit_count)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[index] as char);
    }

    result
}

/// SHA-256 digest of a plaintext.
pub fn hash_plaintext(plaintext: &str) -> [u8; 32] {
    Sha256::digest(plaintext.as_bytes()).into()
}

/// Checks the shape of a client-supplied plaintext.
pub fn validate_plaintext(plaintext: &str) -> AppResult<()> {
    if plaintext.is_empty() {
        return Err(AppError::field("token", "must be provided"));
    }
    if plaintext.len() != TOKEN_LENGTH {
        return Err(AppError::field(
            "token",
            format!("must be {TOKEN_LENGTH} bytes long"),
        ));
    }
    Ok(())
}

/// Builds a new token for `user_id` that expires at `expiry`.
pub(crate) fn new_token(user_id: i64, expiry: DateTime<Utc>, scope: TokenScope) -> Token {
    let mut random = [0u8; RANDOM_BYTES];
    OsRng.fill_bytes(&mut random);

    let plaintext = base32_encode(&random);
    let hash = hash_plaintext(&plaintext);

    Token {
        plaintext,
        hash,
        user_id,
        expiry,
        scope,
    }
}
