//! Coupon code generation.
//!
//! Codes take the form `PREFIX-TOKEN` where the token is drawn from the OS
//! cryptographic RNG over an uppercase alphanumeric alphabet. Codes are meant
//! to be shared by hand, so the alphabet avoids lowercase entirely.
//!
//! Uniqueness is not this module's concern: the storage layer's unique
//! constraint on the code column is the sole arbiter, and the issuing service
//! retries generation when an insert collides.

use rand::Rng;
use rand::rngs::OsRng;

/// Alphabet the token is drawn from.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Token length used for issued coupons.
pub const TOKEN_LENGTH: usize = 10;

/// Prefix used when a restaurant name yields no usable characters.
pub const DEFAULT_PREFIX: &str = "COUP";

/// Generate a `PREFIX-TOKEN` code with a token of exactly `token_len`
/// characters from [`CODE_ALPHABET`].
pub fn generate(prefix: &str, token_len: usize) -> String {
    let mut rng = OsRng;
    let token: String = (0..token_len)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect();
    format!("{prefix}-{token}")
}

/// Derive a code prefix from a restaurant name: the first four ASCII
/// alphanumeric characters, uppercased, falling back to [`DEFAULT_PREFIX`].
pub fn prefix_for(restaurant: &str) -> String {
    let prefix: String = restaurant
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(4)
        .collect::<String>()
        .to_uppercase();
    if prefix.is_empty() {
        DEFAULT_PREFIX.to_owned()
    } else {
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn generated_code_has_prefix_and_token_length() {
        let code = generate("CHIP", TOKEN_LENGTH);
        let (prefix, token) = code.split_once('-').expect("code contains separator");
        assert_eq!(prefix, "CHIP");
        assert_eq!(token.len(), TOKEN_LENGTH);
    }

    #[rstest]
    fn token_stays_within_alphabet() {
        let code = generate("CHIP", 64);
        let (_, token) = code.split_once('-').expect("code contains separator");
        assert!(token.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[rstest]
    fn consecutive_codes_differ() {
        // A 10-character token over a 36-symbol alphabet colliding twice in a
        // row would point at a broken RNG.
        assert_ne!(generate("CHIP", TOKEN_LENGTH), generate("CHIP", TOKEN_LENGTH));
    }

    #[rstest]
    #[case("Chipotle", "CHIP")]
    #[case("Five Guys", "FIVE")]
    #[case("KFC", "KFC")]
    #[case("Café 47", "CAF4")]
    #[case("", "COUP")]
    #[case("火锅店", "COUP")]
    fn prefix_derivation(#[case] restaurant: &str, #[case] expected: &str) {
        assert_eq!(prefix_for(restaurant), expected);
    }
}
