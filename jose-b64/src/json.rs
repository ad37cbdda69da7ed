//! Base64url-encoded JSON, used for JOSE protected headers.

use alloc::string::String;
use alloc::vec::Vec;
use core::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};

use crate::{decode, encode, Error};

/// A value that serializes as base64url(JSON(value)) and deserializes the
/// same way.
///
/// This is the shape of a JWE protected header segment: the bytes that
/// actually get hashed as AAD are the base64url *text*, not the decoded
/// JSON, so [`Json::encoded`] exposes that text directly rather than forcing
/// callers to re-derive it.
#[derive(Clone, Debug)]
pub struct Json<T> {
    encoded: String,
    _marker: PhantomData<T>,
}

impl<T: Serialize> Json<T> {
    /// Serialize `value` to JSON and base64url-encode the result.
    pub fn new(value: &T) -> serde_json::Result<Self> {
        let json = serde_json::to_vec(value)?;
        Ok(Self {
            encoded: encode(json),
            _marker: PhantomData,
        })
    }
}

impl<T> Json<T> {
    /// The base64url text, i.e. exactly the bytes that appear in the
    /// compact serialization and that must be used as AAD.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

impl<T: DeserializeOwned> Json<T> {
    /// Parse a base64url-encoded JSON segment.
    pub fn parse(encoded: &str) -> Result<(Self, T), JsonError> {
        let raw = decode(encoded.as_bytes())?;
        let value = serde_json::from_slice(&raw)?;
        Ok((
            Self {
                encoded: String::from(encoded),
                _marker: PhantomData,
            },
            value,
        ))
    }
}

impl<T> AsRef<[u8]> for Json<T> {
    fn as_ref(&self) -> &[u8] {
        self.encoded.as_bytes()
    }
}

/// Errors parsing a [`Json`] segment.
#[derive(Debug)]
#[non_exhaustive]
pub enum JsonError {
    /// The segment was not valid base64url.
    Encoding(Error),
    /// The decoded bytes were not valid JSON for the target type.
    Json(serde_json::Error),
}

impl From<Error> for JsonError {
    fn from(value: Error) -> Self {
        Self::Encoding(value)
    }
}

impl From<serde_json::Error> for JsonError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Header {
        alg: String,
        enc: String,
    }

    #[test]
    fn roundtrip() {
        let header = Header {
            alg: "RSA-OAEP".to_string(),
            enc: "A256GCM".to_string(),
        };
        let encoded = Json::new(&header).unwrap();
        let (reparsed, value) = Json::<Header>::parse(encoded.encoded()).unwrap();
        assert_eq!(value, header);
        assert_eq!(reparsed.encoded(), encoded.encoded());
    }
}
