//! Practitioner identifier minting.
//!
//! Practitioner ids are two uppercase ASCII letters followed by eight
//! decimal digits. Uniqueness within a case is not guaranteed here; the
//! store enforces it with a unique index and the caller retries on
//! collision.

use rand::Rng;

/// Mints a new practitioner id matching `^[A-Z]{2}[0-9]{8}$`.
#[must_use]
pub fn mint_practitioner_id() -> String {
    let mut rng = rand::rng();
    let mut id = String::with_capacity(10);
    for _ in 0..2 {
        id.push(char::from(rng.random_range(b'A'..=b'Z')));
    }
    for _ in 0..8 {
        id.push(char::from(b'0' + rng.random_range(0..10u8)));
    }
    id
}

/// Checks that a string has the practitioner id shape.
#[must_use]
pub fn is_valid_practitioner_id(id: &str) -> bool {
    let bytes = id.as_bytes();
    bytes.len() == 10
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_id_shape() {
        for _ in 0..100 {
            let id = mint_practitioner_id();
            assert!(is_valid_practitioner_id(&id), "bad id: {id}");
        }
    }

    #[test]
    fn test_format_check_rejects_wrong_shapes() {
        assert!(is_valid_practitioner_id("AB12345678"));
        assert!(!is_valid_practitioner_id("ab12345678"));
        assert!(!is_valid_practitioner_id("A123456789"));
        assert!(!is_valid_practitioner_id("AB1234567"));
        assert!(!is_valid_practitioner_id("AB123456789"));
        assert!(!is_valid_practitioner_id("ABCDEFGHIJ"));
        assert!(!is_valid_practitioner_id(""));
    }
}
