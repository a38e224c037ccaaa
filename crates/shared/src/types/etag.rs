//! Write-versioning tags.
//!
//! Every level of the case aggregate carries an `etag` that changes on every
//! successful mutation of that level. The tag is a 56-hex-character
//! SHA-512/224 digest over a process-unique seed, the current time at
//! nanosecond and millisecond resolution, and a random 7-digit tail.

use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use sha2::{Digest, Sha512_224};

use crate::error::AppError;

static PROCESS_SEED: LazyLock<u64> = LazyLock::new(rand::random);

/// Mints a fresh ETag.
///
/// # Errors
///
/// Returns `AppError::Internal` if the system clock is unreadable. Minting
/// must never fail silently: the enclosing mutation fails instead.
pub fn mint_etag() -> Result<String, AppError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(AppError::internal)?;

    let tail: u32 = rand::rng().random_range(1_000_000..10_000_000);

    let mut hasher = Sha512_224::new();
    hasher.update(PROCESS_SEED.to_be_bytes());
    hasher.update(now.as_nanos().to_be_bytes());
    hasher.update(now.as_millis().to_be_bytes());
    hasher.update(tail.to_be_bytes());

    let digest = hasher.finalize();
    Ok(digest.iter().fold(
        String::with_capacity(digest.len() * 2),
        |mut out, byte| {
            use std::fmt::Write;
            let _ = write!(out, "{byte:02x}");
            out
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_is_56_hex_chars() {
        let etag = mint_etag().unwrap();
        assert_eq!(etag.len(), 56);
        assert!(etag.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_etag_changes_between_mints() {
        let a = mint_etag().unwrap();
        let b = mint_etag().unwrap();
        assert_ne!(a, b);
    }
}
