// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/6ee8e381/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/6ee8e381/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//! Base64url encoding primitives shared by the JOSE crates.
//!
//! This crate owns exactly one concern: turning bytes into the unpadded,
//! URL-safe base64 alphabet RFC 7515/7516 use everywhere, and back. It does
//! not know about JSON, JWTs, or any particular JOSE object.

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use base64ct::{Base64UrlUnpadded, Encoding};

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "json")]
pub use json::Json;

pub use base64ct;

/// Errors produced while decoding base64url text.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The input contained a byte outside the base64url alphabet (including
    /// stray `=` padding, which this codec never emits and never accepts).
    InvalidEncoding,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEncoding => f.write_str("invalid base64url encoding"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Encode `bytes` as base64url with no padding.
///
/// The output alphabet never contains `=`, `+`, or `/`.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    Base64UrlUnpadded::encode_string(bytes.as_ref())
}

/// Decode a base64url string, tolerating missing padding.
///
/// Per RFC 4648 §5 this alphabet substitutes `-` for `+` and `_` for `/`;
/// inputs using the standard alphabet's characters are rejected rather than
/// silently accepted, since a JOSE segment that round-trips through both
/// alphabets is not the one that was signed or encrypted.
pub fn decode(input: impl AsRef<[u8]>) -> Result<Vec<u8>, Error> {
    Base64UrlUnpadded::decode_vec(
        core::str::from_utf8(input.as_ref()).map_err(|_| Error::InvalidEncoding)?,
    )
    .map_err(|_| Error::InvalidEncoding)
}

/// A byte buffer that (de)serializes as a base64url string.
///
/// Used for JWK fields and JWE segments that are base64url text on the wire
/// but plain bytes once decoded: `n`, `e`, the `x`/`y` EC coordinates, the
/// compact serialization's `iv`/`ciphertext`/`tag` segments, and so on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct B64Bytes<T = Vec<u8>>(pub T);

impl<T> B64Bytes<T> {
    /// Unwrap into the inner byte container.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: AsRef<[u8]>> AsRef<[u8]> for B64Bytes<T> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<T> From<T> for B64Bytes<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

#[cfg(feature = "serde")]
impl<T: AsRef<[u8]>> serde::Serialize for B64Bytes<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&encode(&self.0))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for B64Bytes<Vec<u8>> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = alloc::string::String::deserialize(deserializer)?;
        decode(s.as_bytes())
            .map(B64Bytes)
            .map_err(serde::de::Error::custom)
    }
}

/// Like [`B64Bytes`], but the inner buffer is zeroized on drop.
///
/// Used for private key material (`d`, `p`, `q`, ...) and symmetric key
/// bytes (`k`), where leaving copies of decoded secrets lying around in
/// memory after use is the kind of thing that turns into a CVE.
#[cfg(feature = "secret")]
#[derive(Clone, Debug, zeroize::Zeroize, zeroize::ZeroizeOnDrop)]
pub struct B64Secret(Vec<u8>);

#[cfg(feature = "secret")]
impl B64Secret {
    /// Wrap raw secret bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "secret")]
impl AsRef<[u8]> for B64Secret {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "secret")]
impl PartialEq for B64Secret {
    fn eq(&self, other: &Self) -> bool {
        ct_eq(&self.0, &other.0)
    }
}

#[cfg(feature = "secret")]
impl Eq for B64Secret {}

#[cfg(feature = "secret")]
impl serde::Serialize for B64Secret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&encode(&self.0))
    }
}

#[cfg(feature = "secret")]
impl<'de> serde::Deserialize<'de> for B64Secret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = alloc::string::String::deserialize(deserializer)?;
        decode(s.as_bytes())
            .map(B64Secret)
            .map_err(serde::de::Error::custom)
    }
}

/// Constant-time byte equality.
///
/// Returns `false` immediately if the lengths differ (length is not secret
/// for any of the comparisons this crate exists to support: JWK fields and
/// JWE tags are fixed-size per algorithm). When lengths match, every byte is
/// compared and the accumulated difference folded with bitwise OR, so the
/// number of loop iterations, and thus the timing, depends only on length
/// and never on where the first mismatch falls.
#[cfg(feature = "secret")]
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    use subtle::ConstantTimeEq;
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec;

    #[test]
    fn roundtrip() {
        for input in [
            vec![],
            vec![0u8],
            vec![0xff; 33],
            (0..=255u8).collect::<Vec<_>>(),
        ] {
            let encoded = encode(&input);
            assert!(!encoded.contains('='));
            assert!(!encoded.contains('+'));
            assert!(!encoded.contains('/'));
            assert_eq!(decode(encoded.as_bytes()).unwrap(), input);
        }
    }

    #[test]
    fn decode_tolerates_missing_padding() {
        // "f" encodes to "Zg==" in standard base64; unpadded base64url is "Zg"
        assert_eq!(decode("Zg").unwrap(), b"f");
    }

    #[test]
    fn decode_rejects_illegal_chars() {
        assert!(decode("not base64!").is_err());
    }

    #[test]
    fn ct_eq_matches_equality() {
        assert!(ct_eq(b"hello", b"hello"));
        assert!(!ct_eq(b"hello", b"hellp"));
        assert!(!ct_eq(b"hello", b"hell"));
        assert!(!ct_eq(b"", b"a"));
        assert!(ct_eq(b"", b""));
    }
}
