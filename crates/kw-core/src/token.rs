//! Random secrets: access codes, verification tokens and numeric codes.

use rand::{Rng, RngCore};
use subtle::ConstantTimeEq;

/// Verification tokens carry the owner-action authority; 32 random bytes
/// rendered as lowercase hex.
const VERIFICATION_TOKEN_BYTES: usize = 32;

/// Auto-provisioned access codes are 4 random bytes as uppercase hex.
const ACCESS_CODE_BYTES: usize = 4;

const VERIFICATION_CODE_DIGITS: usize = 6;

/// Generate the opaque bearer token embedded in owner-action links.
pub fn generate_verification_token() -> String {
    let mut bytes = [0u8; VERIFICATION_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generate an access code value (uppercase hex by convention).
pub fn generate_access_code() -> String {
    let mut bytes = [0u8; ACCESS_CODE_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode_upper(bytes)
}

/// Generate a 6-digit verification code, zero-padded. Leading zeros are
/// legal: the code is uniform over 000000–999999.
pub fn generate_verification_code() -> String {
    let mut rng = rand::rng();
    (0..VERIFICATION_CODE_DIGITS)
        .map(|_| rng.random_range(0..10u8).to_string())
        .collect()
}

/// Constant-time comparison for bearer tokens. Length differences return
/// false without leaking where the mismatch is.
pub fn token_matches(expected: &str, candidate: &str) -> bool {
    if expected.len() != candidate.len() {
        return false;
    }
    expected.as_bytes().ct_eq(candidate.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_token_is_64_hex_chars() {
        let token = generate_verification_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_verification_token());
    }

    #[test]
    fn access_code_is_8_uppercase_hex_chars() {
        let code = generate_access_code();
        assert_eq!(code.len(), 8);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn verification_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_verification_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn token_matches_is_exact() {
        assert!(token_matches("abc123", "abc123"));
        assert!(!token_matches("abc123", "ABC123"));
        assert!(!token_matches("abc123", "abc12"));
        assert!(!token_matches("abc123", "abc124"));
    }
}
