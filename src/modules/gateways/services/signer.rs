use crate::core::{AppError, ParamSet, Result};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;

pub use crate::core::options::{SignType, SIGN_TYPE_FIELD};

type HmacSha256 = Hmac<Sha256>;

/// Reserved field holding the signature; never part of the signed string
pub const SIGN_FIELD: &str = "sign";

/// Build the string that gets hashed: `k1=v1&k2=v2...&key=<secret>`.
///
/// The `sign` field and empty values are skipped.
pub fn string_to_sign(params: &ParamSet, secret_key: &str) -> String {
    let mut out = String::new();
    for (k, v) in params {
        if k == SIGN_FIELD || v.is_empty() {
            continue;
        }
        out.push_str(k);
        out.push('=');
        out.push_str(&v.to_string());
        out.push('&');
    }
    out.push_str("key=");
    out.push_str(secret_key);
    out
}

/// MD5 signature, uppercase hex
pub fn sign(params: &ParamSet, secret_key: &str) -> String {
    let digest = Md5::digest(string_to_sign(params, secret_key).as_bytes());
    hex::encode_upper(digest)
}

/// Signature using the given algorithm, uppercase hex
pub fn sign_with(params: &ParamSet, secret_key: &str, sign_type: SignType) -> Result<String> {
    match sign_type {
        SignType::Md5 => Ok(sign(params, secret_key)),
        SignType::HmacSha256 => {
            let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
                .map_err(|e| AppError::internal(format!("Invalid HMAC key: {}", e)))?;
            mac.update(string_to_sign(params, secret_key).as_bytes());
            Ok(hex::encode_upper(mac.finalize().into_bytes()))
        }
    }
}

/// Check the payload's own `sign` field against an MD5 recomputation
pub fn verify(params: &ParamSet, secret_key: &str) -> bool {
    verify_with(params, secret_key, SignType::Md5)
}

/// Check the payload's own `sign` field. A missing signature does not verify.
pub fn verify_with(params: &ParamSet, secret_key: &str, sign_type: SignType) -> bool {
    let Some(provided) = params.text(SIGN_FIELD).filter(|s| !s.is_empty()) else {
        return false;
    };

    match sign_with(params, secret_key, sign_type) {
        Ok(expected) => provided == expected,
        Err(_) => false,
    }
}
