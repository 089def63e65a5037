//! Request signing.
//!
//! The signature is computed over the sorted, form-encoded query string after
//! lower-casing it and replacing `+` with `%20`, using HMAC-SHA1 keyed with
//! the secret key. The digest is sent base64 encoded.

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::{CloudStackError, CloudStackResult};
use crate::params::ParamSet;

type HmacSha1 = Hmac<Sha1>;

/// Form-encodes a single value (space becomes `+`).
pub fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Serializes parameters as `key=value` pairs sorted by key, encoding only
/// the values.
pub fn encode_values(params: &ParamSet) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Computes the base64 signature for an encoded query string.
pub fn sign(query: &str, secret_key: &str) -> CloudStackResult<String> {
    let canonical = query.to_lowercase().replace('+', "%20");

    let mut mac = HmacSha1::new_from_slice(secret_key.as_bytes())
        .map_err(|err| CloudStackError::ConfigError(format!("Invalid secret key: {}", err)))?;
    mac.update(canonical.as_bytes());

    Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}
