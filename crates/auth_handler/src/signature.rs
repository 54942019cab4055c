//! Webhook signature computation and verification.
//!
//! GitHub signs every delivery with HMAC-SHA256 over the raw request body and
//! sends the result as `sha256=<hex>` in the `x-hub-signature-256` header.
//! The digest must be computed over the exact wire bytes; re-serializing the
//! JSON produces a different digest.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Prefix of every signature value.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Computes the signature GitHub would send for `body`.
///
/// # Example
///
/// ```rust
/// let signature = auth_handler::sign("It's a Secret to Everybody", b"Hello, World!");
/// assert_eq!(
///     signature,
///     "sha256=757107ea0eb2509fc211221cce984b8a37570b6d7586c22c46f4379c8b043e17"
/// );
/// ```
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(body);
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}

/// Checks a received signature header against the body.
///
/// Returns `true` only when `header` is exactly [`sign`]`(secret, body)`.
/// A missing header never verifies. The comparison time does not depend on
/// where the values differ.
pub fn verify(secret: &str, body: &[u8], header: Option<&str>) -> bool {
    let Some(received) = header else {
        return false;
    };

    let expected = sign(secret, body);
    expected.as_bytes().ct_eq(received.as_bytes()).into()
}
