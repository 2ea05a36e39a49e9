//! Twilio request signature (`X-Twilio-Signature`) verification.

use std::collections::BTreeMap;

use base64::Engine;
use ring::hmac;

/// The string Twilio signs: the full URL, then every POST param as `key` + `value`, keys sorted.
pub fn signing_payload(url: &str, params: &BTreeMap<String, String>) -> String {
    let mut payload = String::from(url);
    for (key, value) in params {
        payload.push_str(key);
        payload.push_str(value);
    }
    payload
}

/// Compute the base64 HMAC-SHA1 signature Twilio would send.
pub fn compute_signature(auth_token: &str, url: &str, params: &BTreeMap<String, String>) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, auth_token.as_bytes());
    let tag = hmac::sign(&key, signing_payload(url, params).as_bytes());
    base64::engine::general_purpose::STANDARD.encode(tag.as_ref())
}

/// Constant-time check of `signature` against the request.
pub fn verify_signature(
    auth_token: &str,
    url: &str,
    params: &BTreeMap<String, String>,
    signature: &str,
) -> bool {
    let Ok(expected) = base64::engine::general_purpose::STANDARD.decode(signature.trim()) else {
        return false;
    };
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, auth_token.as_bytes());
    hmac::verify(&key, signing_payload(url, params).as_bytes(), &expected).is_ok()
}
