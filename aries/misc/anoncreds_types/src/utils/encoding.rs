//! Canonical forms used when comparing attribute names and values across a request, a
//! proposal and a presentation.

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

/// Encodes a raw attribute value the way credentials are signed: values that fit a 32 bit
/// signed integer are kept as their decimal form, anything else becomes the decimal form of
/// its SHA-256 digest read as a big-endian integer.
pub fn encode(raw: &str) -> String {
    if let Ok(value) = raw.parse::<i32>() {
        return value.to_string();
    }
    let digest = Sha256::digest(raw.as_bytes());
    BigUint::from_bytes_be(&digest).to_str_radix(10)
}

/// Attribute name with every space removed, lowercased.
pub fn canon(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ' ')
        .collect::<String>()
        .to_lowercase()
}
