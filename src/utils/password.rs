//! Password digesting
//!
//! Single-pass unsalted SHA-256, hex-encoded. Existing deployments already
//! hold digests in this form; switching to a salted KDF would invalidate
//! every stored credential, so the scheme stays and the trade-off is
//! documented in DESIGN.md. Comparison is constant-time.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hex SHA-256 digest of a password.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Constant-time comparison of a candidate password against a stored digest.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let candidate = hash_password(password);
    candidate.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}
