// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![doc = include_str!("../README.md")]
#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
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

use core::fmt;

use serde::{Deserialize, Serialize};

/// The `kty` values a JWK may declare.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyType {
    /// Elliptic curve.
    Ec,
    /// RSA.
    Rsa,
    /// Octet sequence (symmetric key).
    #[serde(rename = "oct")]
    Oct,
}

/// Key-encryption algorithms, i.e. how the CEK is wrapped for the recipient.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAlgorithmId {
    /// RSAES-OAEP using default parameters (SHA-1, MGF1 with SHA-1).
    #[serde(rename = "RSA-OAEP")]
    RsaOaep,
    /// RSAES-OAEP using SHA-256 and MGF1 with SHA-256.
    #[serde(rename = "RSA-OAEP-256")]
    RsaOaep256,
    /// AES Key Wrap with a 128-bit key.
    A128KW,
    /// AES Key Wrap with a 256-bit key.
    A256KW,
}

/// Content-encryption algorithms, i.e. how the plaintext itself is protected
/// under the CEK.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentAlgorithmId {
    /// AES-128-CBC with HMAC-SHA-256, truncated to 16 bytes.
    #[serde(rename = "A128CBC-HS256")]
    A128CbcHs256,
    /// AES-256-CBC with HMAC-SHA-512, truncated to 32 bytes.
    #[serde(rename = "A256CBC-HS512")]
    A256CbcHs512,
    /// AES-128-GCM.
    A128GCM,
    /// AES-256-GCM.
    A256GCM,
}

/// Either family of [RFC 7518] algorithm identifier a JWE header may carry.
///
/// [RFC 7518]: https://www.rfc-editor.org/rfc/rfc7518
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AlgorithmId {
    /// A key-encryption (`alg`) identifier.
    Key(KeyAlgorithmId),
    /// A content-encryption (`enc`) identifier.
    Content(ContentAlgorithmId),
}

/// The underlying cryptographic primitive an [`AlgorithmId`] is implemented
/// with.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Primitive {
    /// RSAES-OAEP with the given digest.
    RsaOaep {
        /// Digest used for both the OAEP hash and MGF1.
        digest: Digest,
    },
    /// AES Key Wrap (RFC 3394).
    AesKw,
    /// AES-CBC with PKCS#7 padding.
    AesCbc,
    /// AES-GCM.
    AesGcm,
    /// HMAC over the given digest.
    Hmac(Digest),
}

/// A digest algorithm referenced by a [`Primitive`].
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Digest {
    /// SHA-1 (only used by the legacy `RSA-OAEP` default parameters).
    Sha1,
    /// SHA-256.
    Sha256,
    /// SHA-512.
    Sha512,
}

/// MAC parameters for a composite (`*CBC-HS*`) content algorithm.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MacSpec {
    /// Length of the MAC key half of the CEK, in bytes.
    pub key_bytes: usize,
    /// Hash function underlying the HMAC.
    pub hmac_hash: Digest,
    /// Number of leading MAC output bytes used as the JWE authentication tag.
    pub truncated_bytes: usize,
}

/// The mode-specific parameters of a content-encryption algorithm.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContentMode {
    /// Encrypt-then-MAC over AES-CBC and a truncated HMAC.
    Composite(MacSpec),
    /// Authenticated encryption with an integrated tag (AES-GCM).
    Aead {
        /// Authentication tag length, in bytes.
        tag_bytes: usize,
    },
}

/// Static parameters for an [`AlgorithmId`], as tabulated in [RFC 7518].
///
/// [RFC 7518]: https://www.rfc-editor.org/rfc/rfc7518
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AlgorithmSpec {
    /// The canonical string used in the `alg`/`enc` JWE header fields.
    pub jwe_name: &'static str,
    /// The underlying primitive this algorithm is implemented with.
    pub primitive: Primitive,
    /// Symmetric key length in bits. Only meaningful for content algorithms.
    pub key_bits: usize,
    /// IV length in bytes. Only meaningful for content algorithms.
    pub iv_bytes: usize,
    /// Total CEK length in bytes for content algorithms; `0` for key
    /// algorithms, which operate over an already-generated CEK.
    pub cek_bytes: usize,
    /// Mode-specific parameters; `None` for key-encryption algorithms.
    pub mode: Option<ContentMode>,
}

impl AlgorithmSpec {
    /// `cek_bytes` split into `(mac_key_bytes, enc_key_bytes)` for a
    /// composite algorithm, or `None` for an AEAD or key algorithm.
    pub fn composite_split(&self) -> Option<(usize, usize)> {
        match self.mode {
            Some(ContentMode::Composite(mac)) => Some((mac.key_bytes, self.key_bits / 8)),
            _ => None,
        }
    }
}

/// An [`AlgorithmId`] that has no entry in the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnsupportedAlgorithm;

impl fmt::Display for UnsupportedAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unsupported algorithm identifier")
    }
}

/// Look up the static parameters for an algorithm identifier.
///
/// This is the single source of truth for every byte-length relationship
/// the content-encryption pipeline relies on: for composite algorithms,
/// `cek_bytes == mac.key_bytes + key_bits / 8` and
/// `mac.truncated_bytes == mac.key_bytes`; for AEAD algorithms,
/// `cek_bytes == key_bits / 8`.
pub fn spec(id: AlgorithmId) -> Result<AlgorithmSpec, UnsupportedAlgorithm> {
    Ok(match id {
        AlgorithmId::Key(KeyAlgorithmId::RsaOaep) => AlgorithmSpec {
            jwe_name: "RSA-OAEP",
            primitive: Primitive::RsaOaep { digest: Digest::Sha1 },
            key_bits: 0,
            iv_bytes: 0,
            cek_bytes: 0,
            mode: None,
        },
        AlgorithmId::Key(KeyAlgorithmId::RsaOaep256) => AlgorithmSpec {
            jwe_name: "RSA-OAEP-256",
            primitive: Primitive::RsaOaep { digest: Digest::Sha256 },
            key_bits: 0,
            iv_bytes: 0,
            cek_bytes: 0,
            mode: None,
        },
        AlgorithmId::Key(KeyAlgorithmId::A128KW) => AlgorithmSpec {
            jwe_name: "A128KW",
            primitive: Primitive::AesKw,
            key_bits: 128,
            iv_bytes: 0,
            cek_bytes: 0,
            mode: None,
        },
        AlgorithmId::Key(KeyAlgorithmId::A256KW) => AlgorithmSpec {
            jwe_name: "A256KW",
            primitive: Primitive::AesKw,
            key_bits: 256,
            iv_bytes: 0,
            cek_bytes: 0,
            mode: None,
        },
        AlgorithmId::Content(ContentAlgorithmId::A128CbcHs256) => AlgorithmSpec {
            jwe_name: "A128CBC-HS256",
            primitive: Primitive::AesCbc,
            key_bits: 128,
            iv_bytes: 16,
            cek_bytes: 32,
            mode: Some(ContentMode::Composite(MacSpec {
                key_bytes: 16,
                hmac_hash: Digest::Sha256,
                truncated_bytes: 16,
            })),
        },
        AlgorithmId::Content(ContentAlgorithmId::A256CbcHs512) => AlgorithmSpec {
            // The source registry this was distilled from omits `jwe_name`
            // for this entry; RFC 7518 §5.2.5 requires it.
            jwe_name: "A256CBC-HS512",
            primitive: Primitive::AesCbc,
            key_bits: 256,
            iv_bytes: 16,
            cek_bytes: 64,
            mode: Some(ContentMode::Composite(MacSpec {
                key_bytes: 32,
                hmac_hash: Digest::Sha512,
                truncated_bytes: 32,
            })),
        },
        AlgorithmId::Content(ContentAlgorithmId::A128GCM) => AlgorithmSpec {
            jwe_name: "A128GCM",
            primitive: Primitive::AesGcm,
            key_bits: 128,
            iv_bytes: 12,
            cek_bytes: 16,
            mode: Some(ContentMode::Aead { tag_bytes: 16 }),
        },
        AlgorithmId::Content(ContentAlgorithmId::A256GCM) => AlgorithmSpec {
            jwe_name: "A256GCM",
            primitive: Primitive::AesGcm,
            key_bits: 256,
            iv_bytes: 12,
            cek_bytes: 32,
            mode: Some(ContentMode::Aead { tag_bytes: 16 }),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a256cbc_hs512_jwe_name_is_populated() {
        let spec = spec(AlgorithmId::Content(ContentAlgorithmId::A256CbcHs512)).unwrap();
        assert_eq!(spec.jwe_name, "A256CBC-HS512");
    }

    #[test]
    fn composite_invariants_hold() {
        for id in [
            ContentAlgorithmId::A128CbcHs256,
            ContentAlgorithmId::A256CbcHs512,
        ] {
            let s = spec(AlgorithmId::Content(id)).unwrap();
            let (mac_bytes, enc_bytes) = s.composite_split().unwrap();
            assert_eq!(s.cek_bytes, mac_bytes + enc_bytes);
            match s.mode {
                Some(ContentMode::Composite(mac)) => {
                    assert_eq!(mac.truncated_bytes, mac.key_bytes);
                }
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn aead_invariants_hold() {
        for id in [ContentAlgorithmId::A128GCM, ContentAlgorithmId::A256GCM] {
            let s = spec(AlgorithmId::Content(id)).unwrap();
            assert_eq!(s.cek_bytes, s.key_bits / 8);
            assert_eq!(s.iv_bytes, 12);
            match s.mode {
                Some(ContentMode::Aead { tag_bytes }) => assert_eq!(tag_bytes, 16),
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn key_algorithm_jwe_names() {
        assert_eq!(
            spec(AlgorithmId::Key(KeyAlgorithmId::RsaOaep)).unwrap().jwe_name,
            "RSA-OAEP"
        );
        assert_eq!(
            spec(AlgorithmId::Key(KeyAlgorithmId::RsaOaep256)).unwrap().jwe_name,
            "RSA-OAEP-256"
        );
        assert_eq!(
            spec(AlgorithmId::Key(KeyAlgorithmId::A128KW)).unwrap().jwe_name,
            "A128KW"
        );
        assert_eq!(
            spec(AlgorithmId::Key(KeyAlgorithmId::A256KW)).unwrap().jwe_name,
            "A256KW"
        );
    }
}
