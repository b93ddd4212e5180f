//! Bitbucket webhook signature verification.
//!
//! Bitbucket signs the request body with HMAC-SHA256 and sends the hex digest in
//! the `X-Hub-Signature` header as `sha256=<hex>`.
//! Reference: https://support.atlassian.com/bitbucket-cloud/docs/manage-webhooks/#Secure-webhooks

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Algorithm tag in front of the hex digest.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Compute the `sha256=<hex>` signature of `body` under `secret`.
///
/// Returns `None` only if the key is rejected by the HMAC implementation.
pub fn sign_body(body: &[u8], secret: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(format!(
        "{}{}",
        SIGNATURE_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Verify a Bitbucket webhook signature.
///
/// # Arguments
///
/// * `body` - The request body exactly as received
/// * `signature` - The `X-Hub-Signature` header value
/// * `secret` - The webhook secret shared with Bitbucket
///
/// # Returns
///
/// `true` if the signature matches, `false` otherwise (including malformed input).
pub fn verify_signature(body: &[u8], signature: &str, secret: &str) -> bool {
    if secret.is_empty() || signature.is_empty() {
        warn!(
            has_secret = !secret.is_empty(),
            has_signature = !signature.is_empty(),
            "bitbucket_signature_missing_fields"
        );
        return false;
    }

    let digest = match signature.strip_prefix(SIGNATURE_PREFIX) {
        Some(d) => d,
        None => {
            warn!(actual_length = signature.len(), "bitbucket_signature_missing_prefix");
            return false;
        }
    };

    // Bitbucket sends lowercase hex; anything else is not a signature we produced.
    if digest.bytes().any(|b| b.is_ascii_uppercase()) {
        warn!("bitbucket_signature_not_lowercase");
        return false;
    }

    let expected = match hex::decode(digest) {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!(actual_length = signature.len(), "bitbucket_signature_invalid_hex");
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("bitbucket_signature_invalid_key");
            return false;
        }
    };
    mac.update(body);

    // Constant-time comparison; a wrong tag length fails without comparing bytes.
    let valid = mac.verify_slice(&expected).is_ok();

    if !valid {
        warn!(decoded_length = expected.len(), "bitbucket_signature_mismatch");
    }

    valid
}
