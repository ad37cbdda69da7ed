//! The JWE protected header: the only header type this crate emits or
//! accepts (compact serialization has no shared or per-recipient headers).

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use jose_b64::Json;

/// The protected header of a compact JWE.
///
/// The encoder populates only `alg` and `enc`; it never sets `typ`, `kid`,
/// `cty`, or `zip`. The decoder accepts and ignores any other member it does
/// not recognize, except `crit`, whose presence is always rejected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Header {
    /// Key-encryption algorithm, e.g. `"RSA-OAEP"`.
    pub alg: String,
    /// Content-encryption algorithm, e.g. `"A256GCM"`.
    pub enc: String,
    /// Present only so decoding can detect and reject it; the encoder never
    /// sets this field.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub crit: Option<Vec<String>>,
}

impl Header {
    /// Build the protected header for an `encrypt` call.
    pub fn new(key_alg_name: &'static str, content_alg_name: &'static str) -> Self {
        Self {
            alg: key_alg_name.into(),
            enc: content_alg_name.into(),
            crit: None,
        }
    }

    /// Base64url-encode this header, producing the exact bytes that become
    /// both the first compact segment and the AAD.
    pub fn encode(&self) -> Result<Json<Self>, serde_json::Error> {
        Json::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_only_alg_and_enc() {
        let header = Header::new("RSA-OAEP", "A256GCM");
        let encoded = header.encode().unwrap();
        let (_, parsed) = Json::<serde_json::Value>::parse(encoded.encoded()).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!({"alg": "RSA-OAEP", "enc": "A256GCM"})
        );
    }

    #[test]
    fn rejects_crit_on_parse() {
        let raw = Json::<serde_json::Value>::parse(
            &jose_b64::encode(br#"{"alg":"RSA-OAEP","enc":"A256GCM","crit":["exp"]}"#),
        );
        let (_, value) = raw.unwrap();
        let header: Header = serde_json::from_value(value).unwrap();
        assert!(header.crit.is_some());
    }
}
