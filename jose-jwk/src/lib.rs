#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
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

mod algorithm;
mod key;

use alloc::{collections::BTreeSet, string::String, vec::Vec};
use serde::{Deserialize, Serialize};


pub use algorithm::{Algorithm, EncryptionAlg, KeyMgmtAlg, SigningAlg};
pub use key::{Key, Oct, RsaOtherPrimes, RsaPrivate, RsaPublic};

extern crate alloc;

/// Strongly typed JWK
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Jwk {
    /// The key itself. This field contains the important information, all other
    /// top-level fields are
    #[serde(flatten)]
    pub key: Key,

    #[serde(flatten)]
    pub params: Parameters,
}

impl Jwk {
    /// Create a new JWK from a key, using default parameters
    pub fn new(key: Key) -> Self {
        Self {
            key,
            params: Default::default(),
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// The algorithm used with this key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alg: Option<Algorithm>,

    /// Identifier of this key
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kid: Option<String>,

    /// Intended use of this public key (named `use` in the rfc)
    #[serde(rename = "use")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub use_for: Option<UseFor>,

    /// Intended operations for this key; optional
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub key_ops: BTreeSet<Operations>,
}

/// A set of JSON Web Keys.
///
/// This type is defined in [RFC7517 Section 5].
///
/// [RFC7517 Section 5]: https://datatracker.ietf.org/doc/html/rfc7517#section-5
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JwkSet {
    /// The keys in the set.
    pub keys: Vec<Jwk>,
}

/// Intended use of this key
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum UseFor {
    /// The key should be used for encryption
    #[serde(rename = "enc")]
    Encryption,
    /// The key should be used for signing
    #[serde(rename = "sig")]
    Signing,
}

/// Possible values for `key_ops`, specified in RFC7517 section 4.3.
// NOTE: Keep in lexicographical order for BTreeSet
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operations {
    /// Decrypt content and validate decryption, if applicable
    Decrypt,
    /// Derive bits not to be used as a key
    DeriveBits,
    /// Derive key
    DeriveKey,
    /// Encrypt key
    Encrypt,
    /// Compute digital signature or MAC
    Sign,
    /// Decrypt key and validate decryption, if applicable
    UnwrapKey,
    /// Verify digital signature or MAC
    Verify,
    /// Encrypt content
    WrapKey,
}
