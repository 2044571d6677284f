//! Password-reset tokens: 32 random bytes, stored only as a SHA-256 digest.

use rand::{Rng, thread_rng};
use sha2::{Digest, Sha256};

use natours_core::ports::ResetTokenService;

/// Reset tokens as lowercase hex, digests as lowercase hex SHA-256.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256ResetTokenService;

impl Sha256ResetTokenService {
    pub fn new() -> Self {
        Self
    }
}

impl ResetTokenService for Sha256ResetTokenService {
    fn generate(&self) -> String {
        let mut bytes = [0u8; 32];
        thread_rng().fill(&mut bytes);
        hex::encode(bytes)
    }

    fn hash(&self, raw_token: &str) -> String {
        hex::encode(Sha256::digest(raw_token.as_bytes()))
    }
}
