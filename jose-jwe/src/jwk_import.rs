//! Flexible normalization of RSA JWK parameters, and the import calls that
//! turn a normalized JWK into a [`Key`](crate::provider::Key).
//!
//! A parameter may arrive in any of three shapes: an already-base64url
//! string, a decimal/native integer (`e` only), or colon-delimited hex
//! (`01:00:01`).
//! All three normalize to the same raw bytes before anything touches the
//! RSA primitive.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::Value;

use crate::provider::Key;
use crate::Error;

const PUBLIC_PARAMS: &[&str] = &["n", "e"];
const PRIVATE_PARAMS: &[&str] = &["n", "e", "d", "p", "q", "dp", "dq", "qi"];

/// Normalize one RSA JWK parameter to raw bytes.
///
/// `allow_integer` gates the native-integer shape, which the specification
/// permits only for `e`.
fn normalize_param(name: &str, value: &Value, allow_integer: bool) -> Result<Vec<u8>, Error> {
    match value {
        Value::String(s) if s.contains(':') => parse_colon_hex(s),
        Value::String(s) => jose_b64::decode(s.as_bytes())
            .map_err(|_| Error::MalformedKey(format!("parameter `{name}` is not valid base64url"))),
        Value::Number(n) if allow_integer => {
            let i = n
                .as_u64()
                .ok_or_else(|| Error::MalformedKey(format!("parameter `{name}` is not a non-negative integer")))?;
            Ok(strip_leading_zeros(&i.to_be_bytes()).to_vec())
        }
        _ => Err(Error::MalformedKey(format!(
            "parameter `{name}` has an unsupported shape"
        ))),
    }
}

/// Parse `01:00:01`-style colon-delimited hex into raw bytes.
fn parse_colon_hex(s: &str) -> Result<Vec<u8>, Error> {
    s.split(':')
        .map(|byte| {
            u8::from_str_radix(byte, 16)
                .map_err(|_| Error::MalformedKey(format!("invalid hex byte `{byte}`")))
        })
        .collect()
}

/// Drop leading `0x00` bytes, keeping at least one byte.
fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first_nonzero = bytes.iter().position(|&b| b != 0);
    match first_nonzero {
        Some(i) => &bytes[i..],
        None => &bytes[bytes.len().saturating_sub(1)..],
    }
}

fn check_kty_and_alg(jwk: &Value) -> Result<(), Error> {
    if let Some(kty) = jwk.get("kty").and_then(Value::as_str) {
        if kty != "RSA" {
            return Err(Error::MalformedKey(format!("expected kty \"RSA\", got {kty:?}")));
        }
    }
    if let Some(alg) = jwk.get("alg").and_then(Value::as_str) {
        if alg != "RSA-OAEP" {
            return Err(Error::MalformedKey(format!(
                "expected alg \"RSA-OAEP\", got {alg:?}"
            )));
        }
    }
    Ok(())
}

fn required_param(jwk: &Value, name: &str) -> Result<Value, Error> {
    jwk.get(name)
        .cloned()
        .ok_or_else(|| Error::MalformedKey(format!("missing required parameter `{name}`")))
}

/// Import an RSA public key from a JWK, normalizing `n`/`e` from any of the
/// three accepted shapes.
pub fn import_rsa_public_key(jwk: &Value) -> Result<Key, Error> {
    check_kty_and_alg(jwk)?;
    let mut params = Vec::with_capacity(PUBLIC_PARAMS.len());
    for name in PUBLIC_PARAMS {
        let value = required_param(jwk, name)?;
        params.push(normalize_param(name, &value, *name == "e")?);
    }
    let mut iter = params.into_iter();
    let n = iter.next().expect("n present");
    let e = iter.next().expect("e present");
    Ok(Key::new_rsa_public(n, e))
}

/// Import an RSA private key from a JWK, normalizing every parameter from
/// any of the three accepted shapes.
pub fn import_rsa_private_key(jwk: &Value) -> Result<Key, Error> {
    check_kty_and_alg(jwk)?;
    let mut params = Vec::with_capacity(PRIVATE_PARAMS.len());
    for name in PRIVATE_PARAMS {
        let value = required_param(jwk, name)?;
        params.push(normalize_param(name, &value, *name == "e")?);
    }
    let mut iter = params.into_iter();
    let n = iter.next().expect("n present");
    let e = iter.next().expect("e present");
    let d = iter.next().expect("d present");
    let p = iter.next().expect("p present");
    let q = iter.next().expect("q present");
    let dp = iter.next().expect("dp present");
    let dq = iter.next().expect("dq present");
    let qi = iter.next().expect("qi present");
    Ok(Key::new_rsa_private(n, e, d, p, q, dp, dq, qi))
}

/// Re-encode raw RSA parameter bytes as the base64url strings a JWK uses on
/// the wire. Exposed for callers building a JWK from key material obtained
/// elsewhere (e.g. parsed from PEM/DER, which is outside this crate's
/// scope).
pub fn to_base64url(bytes: &[u8]) -> String {
    jose_b64::encode(strip_leading_zeros(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn e_normalizes_identically_from_all_three_shapes() {
        let as_int = normalize_param("e", &json!(65537), true).unwrap();
        let as_b64 = normalize_param("e", &json!("AQAB"), true).unwrap();
        let as_hex = normalize_param("e", &json!("01:00:01"), true).unwrap();
        assert_eq!(as_int, as_b64);
        assert_eq!(as_b64, as_hex);
        assert_eq!(as_int, [0x01, 0x00, 0x01]);
    }

    #[test]
    fn rejects_wrong_kty() {
        let jwk = json!({"kty": "EC", "n": "AQAB", "e": "AQAB"});
        assert!(matches!(
            import_rsa_public_key(&jwk),
            Err(Error::MalformedKey(_))
        ));
    }

    #[test]
    fn rejects_wrong_alg() {
        let jwk = json!({"kty": "RSA", "alg": "RSA-OAEP-256", "n": "AQAB", "e": "AQAB"});
        assert!(matches!(
            import_rsa_public_key(&jwk),
            Err(Error::MalformedKey(_))
        ));
    }

    #[test]
    fn rejects_missing_param() {
        let jwk = json!({"kty": "RSA", "n": "AQAB"});
        assert!(matches!(
            import_rsa_public_key(&jwk),
            Err(Error::MalformedKey(_))
        ));
    }

    #[test]
    fn strip_leading_zeros_keeps_one_byte_for_zero() {
        assert_eq!(strip_leading_zeros(&[0, 0, 0]), &[0]);
        assert_eq!(strip_leading_zeros(&[0, 0, 5]), &[5]);
        assert_eq!(strip_leading_zeros(&[5, 0]), &[5, 0]);
    }
}
