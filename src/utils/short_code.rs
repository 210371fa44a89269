//! Short code derivation
//!
//! A code is derived from the target URL itself: SHA-256 digest, hex, first
//! 16 chars, plus a 4-char random alphanumeric suffix, the whole thing
//! base64-encoded and truncated to 8 chars. One generation per encode
//! request; collisions are resolved at the store, not by retrying here.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use sha2::{Digest, Sha256};

use super::generate_random_code;

/// Length of the final short code.
pub const SHORT_CODE_LENGTH: usize = 8;

/// Hex chars of the URL digest kept before the random suffix.
const HASH_PREFIX_LENGTH: usize = 16;

/// Random alphanumeric chars appended to the digest prefix.
const RANDOM_SUFFIX_LENGTH: usize = 4;

/// Derive a short code for `long_url`.
///
/// The 8-char truncation covers only the first 6 bytes of the combined
/// string, so the visible code is driven by the digest prefix; the random
/// suffix only matters to the intermediate encoding. Repeated calls for the
/// same URL are therefore not guaranteed to differ, and callers must not
/// assume they do.
pub fn generate_short_code(long_url: &str) -> String {
    let digest = Sha256::digest(long_url.as_bytes());
    let hash_prefix: String = hex::encode(digest).chars().take(HASH_PREFIX_LENGTH).collect();

    let combined = format!("{}{}", hash_prefix, generate_random_code(RANDOM_SUFFIX_LENGTH));

    URL_SAFE
        .encode(combined.as_bytes())
        .chars()
        .take(SHORT_CODE_LENGTH)
        .collect()
}
