use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use jose_b64::{B64Bytes, B64Secret};

/// A key type suitable for a JEK
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", tag = "kty")]
pub enum Key {
    /// An RSA key
    Rsa(RsaPublic),
    /// A symmetric key
    #[serde(rename = "oct")]
    Oct(Oct),
}

impl Default for Key {
    fn default() -> Self {
        unimplemented!("There is no default for `Key`; it must always be set")
    }
}

/// An RSA key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPublic {
    /// RSA modulus parameter
    pub n: B64Bytes,

    /// RSA exponent parameter
    pub e: B64Bytes,
}

/// RSA key private material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPrivate {
    /// The public key associated with this private key
    #[serde(flatten)]
    pub public: RsaPublic,
    
    /// Private key exponent.
    pub d: B64Secret,

    /// Private first prime factor.
    pub p: Option<B64Secret>,

    /// Private second prime factor.
    pub q: Option<B64Secret>,

    /// Private first factor CRT exponent.
    pub dp: Option<B64Secret>,

    /// Private second factor CRT exponent.
    pub dq: Option<B64Secret>,

    /// Private first CRT coefficient.
    pub qi: Option<B64Secret>,

    /// Additional RSA private primes.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub oth: Vec<RsaOtherPrimes>,
}

/// Additional RSA private primes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaOtherPrimes {
    /// A private prime factor
    pub r: B64Secret,

    /// A private factor CRT exponent
    pub d: B64Secret,

    /// A private factor CRT coefficient
    pub t: B64Secret,
}

/// A symmetric octet key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oct {
    /// The symmetric key.
    pub k: B64Secret,
}

impl From<RsaPublic> for Key {
    fn from(key: RsaPublic) -> Self {
        Self::Rsa(key)
    }
}

impl From<Oct> for Key {
    fn from(key: Oct) -> Self {
        Self::Oct(key)
    }
}
