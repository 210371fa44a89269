//! Mapping engine
//!
//! Owns short-code generation, uniqueness resolution and lookups in both
//! directions. Exactly one code generation per encode request; uniqueness
//! races are settled by the store's unique keys, with a losing insert
//! converging to the first writer's code.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::errors::{LinkvaultError, Result};
use crate::storage::{Storage, UrlMapping};
use crate::utils::generate_short_code;
use crate::utils::url_validator::{UrlValidationError, validate_url};

/// Whether encode stored a new pair or resolved to an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeOutcome {
    Created,
    AlreadyMapped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeResult {
    pub short_code: String,
    pub outcome: EncodeOutcome,
}

pub struct MappingService {
    storage: Arc<dyn Storage>,
    /// Legacy lookup that treats the input's last path segment as a
    /// possible existing code. Default off; see DESIGN.md.
    compat_alias_probe: bool,
}

impl MappingService {
    pub fn new(storage: Arc<dyn Storage>, compat_alias_probe: bool) -> Self {
        Self {
            storage,
            compat_alias_probe,
        }
    }

    /// Map a long URL to a short code.
    pub async fn encode(&self, long_url: &str) -> Result<EncodeResult> {
        validate_url(long_url).map_err(|e| match e {
            UrlValidationError::EmptyUrl => LinkvaultError::validation("long_url not provided"),
            UrlValidationError::InvalidProtocol(_) => LinkvaultError::validation(
                "only URLs starting with http:// or https:// are allowed",
            ),
            UrlValidationError::InvalidFormat(msg) => LinkvaultError::validation(msg),
        })?;
        let long_url = long_url.trim();

        // 1. Idempotent re-encode: the URL is already mapped.
        if let Some(existing) = self.storage.find_mapping_by_long_url(long_url).await? {
            info!(
                "MappingService: '{}' already mapped to '{}'",
                long_url, existing.short_code
            );
            return Ok(EncodeResult {
                short_code: existing.short_code,
                outcome: EncodeOutcome::AlreadyMapped,
            });
        }

        // 2. Legacy alias probe: the input's last path segment matches an
        // existing code. The returned code then targets whatever URL that
        // mapping stored, which may not equal the caller's input.
        if self.compat_alias_probe {
            let probe = self
                .storage
                .find_mapping_by_code(last_path_segment(long_url))
                .await?;
            if let Some(existing) = probe {
                warn!(
                    "MappingService: alias probe matched '{}' for input '{}'",
                    existing.short_code, long_url
                );
                return Ok(EncodeResult {
                    short_code: existing.short_code,
                    outcome: EncodeOutcome::AlreadyMapped,
                });
            }
        }

        // 3. Fresh mapping. Single generation, no retry on collision.
        let code = generate_short_code(long_url);
        let mapping = UrlMapping {
            short_code: code.clone(),
            long_url: long_url.to_string(),
            created_at: Utc::now(),
        };

        match self.storage.insert_mapping(mapping).await {
            Ok(()) => {
                info!("MappingService: created '{}' -> '{}'", code, long_url);
                Ok(EncodeResult {
                    short_code: code,
                    outcome: EncodeOutcome::Created,
                })
            }
            Err(LinkvaultError::Conflict(_)) => {
                // Lost a race for this URL: converge on the first writer's
                // code. If the conflict was on the code itself (random
                // collision against a different URL), there is nothing
                // sensible to return.
                match self.storage.find_mapping_by_long_url(long_url).await? {
                    Some(existing) => {
                        info!(
                            "MappingService: concurrent encode of '{}', converged on '{}'",
                            long_url, existing.short_code
                        );
                        Ok(EncodeResult {
                            short_code: existing.short_code,
                            outcome: EncodeOutcome::AlreadyMapped,
                        })
                    }
                    None => {
                        error!("MappingService: short code collision on '{}'", code);
                        Err(LinkvaultError::internal("short code collision"))
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve a short URL (or bare code) back to its long URL.
    pub async fn decode(&self, short_url_or_code: &str) -> Result<String> {
        let input = short_url_or_code.trim();
        let code = last_path_segment(input);

        if code.is_empty() {
            return Err(LinkvaultError::validation("short_url not provided"));
        }

        match self.storage.find_mapping_by_code(code).await? {
            Some(mapping) => Ok(mapping.long_url),
            None => Err(LinkvaultError::not_found(format!(
                "short URL not found: {}",
                code
            ))),
        }
    }
}

/// Final `/`-separated segment of the input; the input itself if it has no
/// slashes. Mirrors how decode extracts the candidate code from a full
/// short URL.
fn last_path_segment(input: &str) -> &str {
    input.rsplit('/').next().unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_path_segment() {
        assert_eq!(last_path_segment("https://short.est/Abc123xY"), "Abc123xY");
        assert_eq!(last_path_segment("Abc123xY"), "Abc123xY");
        assert_eq!(last_path_segment("https://short.est/"), "");
        assert_eq!(last_path_segment(""), "");
    }
}
