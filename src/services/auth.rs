use sha2::{Digest, Sha256};

/// One-way digest used for stored passwords: SHA-256, lowercase hex.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

pub fn verify_password(password: &str, digest: &str) -> bool {
    hash_password(password) == digest
}
