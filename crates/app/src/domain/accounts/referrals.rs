//! Referral codes.

use rand::{Rng, distributions::Alphanumeric};

const REFERRAL_PREFIX: &str = "REF-";
const REFERRAL_LENGTH: usize = 6;

/// Generate a `REF-XXXXXX` referral code.
pub(crate) fn generate<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = rng
        .sample_iter(&Alphanumeric)
        .take(REFERRAL_LENGTH)
        .map(|byte| char::from(byte).to_ascii_uppercase())
        .collect();

    format!("{REFERRAL_PREFIX}{suffix}")
}

/// Referral codes are compared trimmed and upper-cased.
pub(crate) fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}
