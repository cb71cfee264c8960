//! Cryptographic utilities for API signing

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::{CcxtError, CcxtResult};

type HmacSha256 = Hmac<Sha256>;

pub fn hmac_sha256(secret: &[u8], message: &[u8]) -> CcxtResult<Vec<u8>> {
    let mut mac =
        HmacSha256::new_from_slice(secret).map_err(|e| CcxtError::AuthenticationError {
            message: format!("invalid HMAC key: {e}"),
        })?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// HMAC-SHA256 digest, standard base64 encoded
pub fn hmac_sha256_base64(secret: &str, message: &str) -> CcxtResult<String> {
    hmac_sha256(secret.as_bytes(), message.as_bytes()).map(|digest| base64_encode(&digest))
}

pub fn base64_encode(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}
