//! Hashing and opaque token helpers for session storage.

use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

/// Prefix carried by every refresh token issued by the backend.
pub const REFRESH_TOKEN_PREFIX: &str = "fmr_";

const REFRESH_TOKEN_RANDOM_LEN: usize = 48;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates an opaque refresh token (`fmr_` followed by 48 alphanumerics).
///
/// Only the SHA-256 of the token is persisted; the raw value is returned to
/// the client exactly once.
pub fn generate_refresh_token() -> String {
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REFRESH_TOKEN_RANDOM_LEN)
        .map(char::from)
        .collect();
    format!("{}{}", REFRESH_TOKEN_PREFIX, random)
}

/// Returns true if the value has the shape of a refresh token.
pub fn is_refresh_token_format(token: &str) -> bool {
    token
        .strip_prefix(REFRESH_TOKEN_PREFIX)
        .map(|rest| {
            rest.len() == REFRESH_TOKEN_RANDOM_LEN && rest.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or(false)
}
