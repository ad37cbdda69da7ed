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

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod header;
mod jwk_import;
mod key;
mod pipeline;
pub mod provider;

#[cfg(feature = "rust-crypto")]
pub mod rust_crypto;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use jose_jwa::{AlgorithmId, ContentAlgorithmId, KeyAlgorithmId, Primitive};

pub use header::Header;
pub use jwk_import::{import_rsa_private_key, import_rsa_public_key, to_base64url};
pub use provider::{CryptoProvider, Key, KeyUsage};
#[cfg(feature = "rust-crypto")]
pub use rust_crypto::RustCryptoProvider;

/// Errors produced while encrypting or decrypting a compact JWE.
///
/// These are kinds, not a fixed set of messages: every variant but
/// [`Error::IntegrityFailure`] carries a human-readable detail string, and
/// new detail text may be added across versions without it being a breaking
/// change.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An `alg`/`enc` identifier outside the supported set.
    UnsupportedAlgorithm(String),
    /// Malformed compact serialization: wrong segment count, invalid
    /// base64url, unparseable header JSON, a `crit` header, a missing
    /// `alg`/`enc`, or an IV/tag whose length doesn't match its algorithm.
    MalformedInput(String),
    /// A JWK missing required parameters or declaring the wrong
    /// `kty`/`alg`.
    MalformedKey(String),
    /// The composite MAC, or the AEAD tag, did not verify. No plaintext is
    /// ever returned alongside this variant.
    IntegrityFailure,
    /// The underlying `CryptoProvider` reported a primitive-level failure
    /// (e.g. an RSA-OAEP padding error).
    CryptoPrimitiveFailure(String),
    /// A length relationship the registry guarantees was violated. This
    /// should be unreachable; seeing it means either the `CryptoProvider`
    /// implementation or this crate's own bookkeeping is broken.
    InternalInvariant(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedAlgorithm(detail) => write!(f, "unsupported algorithm: {detail}"),
            Self::MalformedInput(detail) => write!(f, "malformed input: {detail}"),
            Self::MalformedKey(detail) => write!(f, "malformed key: {detail}"),
            Self::IntegrityFailure => f.write_str("integrity check failed"),
            Self::CryptoPrimitiveFailure(detail) => write!(f, "crypto primitive failure: {detail}"),
            Self::InternalInvariant(detail) => write!(f, "internal invariant violated: {detail}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

fn parse_key_alg(name: &str) -> Result<KeyAlgorithmId, Error> {
    match name {
        "RSA-OAEP" => Ok(KeyAlgorithmId::RsaOaep),
        "RSA-OAEP-256" => Ok(KeyAlgorithmId::RsaOaep256),
        "A128KW" => Ok(KeyAlgorithmId::A128KW),
        "A256KW" => Ok(KeyAlgorithmId::A256KW),
        other => Err(Error::UnsupportedAlgorithm(format!("alg {other:?}"))),
    }
}

fn parse_content_alg(name: &str) -> Result<ContentAlgorithmId, Error> {
    match name {
        "A128CBC-HS256" => Ok(ContentAlgorithmId::A128CbcHs256),
        "A256CBC-HS512" => Ok(ContentAlgorithmId::A256CbcHs512),
        "A128GCM" => Ok(ContentAlgorithmId::A128GCM),
        "A256GCM" => Ok(ContentAlgorithmId::A256GCM),
        other => Err(Error::UnsupportedAlgorithm(format!("enc {other:?}"))),
    }
}

/// A JWE compact-serialization codec instance.
///
/// A `Jwe` carries the currently selected key- and content-encryption
/// algorithms. [`Jwe::new`] selects them for an [`encrypt`](Jwe::encrypt)
/// call; [`Jwe::decrypt`] instead reconfigures them from the parsed header
/// of the string it is given, so this instance's algorithm selection after
/// a `decrypt` reflects whatever the input actually used. Keys and CEKs
/// live only for the duration of a single `encrypt`/`decrypt` call.
/// Nothing is retained or reused across operations.
pub struct Jwe<P> {
    provider: P,
    key_alg: KeyAlgorithmId,
    content_alg: ContentAlgorithmId,
}

impl<P: CryptoProvider> Jwe<P> {
    /// Create a codec configured for `key_alg`/`content_alg`, backed by
    /// `provider`.
    pub fn new(provider: P, key_alg: KeyAlgorithmId, content_alg: ContentAlgorithmId) -> Self {
        Self {
            provider,
            key_alg,
            content_alg,
        }
    }

    /// The key-encryption algorithm currently selected.
    pub fn key_alg(&self) -> KeyAlgorithmId {
        self.key_alg
    }

    /// The content-encryption algorithm currently selected.
    pub fn content_alg(&self) -> ContentAlgorithmId {
        self.content_alg
    }

    /// Encrypt `plaintext` to a recipient identified by `wrapping_key`,
    /// producing a five-segment compact JWE.
    ///
    /// `wrapping_key` must be an RSA public key
    /// ([`import_rsa_public_key`]) for `RSA-OAEP[-256]`, or a raw AES key
    /// ([`Key::new_symmetric`]) for `A128KW`/`A256KW`.
    pub fn encrypt(&self, wrapping_key: &Key, plaintext: &str) -> Result<String, Error> {
        let key_spec = jose_jwa::spec(AlgorithmId::Key(self.key_alg)).expect("closed registry");
        let content_spec = jose_jwa::spec(AlgorithmId::Content(self.content_alg)).expect("closed registry");

        let cek = key::create_cek(&self.provider, self.content_alg)?;
        let iv = key::create_iv(&self.provider, self.content_alg)?;

        let header = Header::new(key_spec.jwe_name, content_spec.jwe_name);
        let header_encoded = header
            .encode()
            .map_err(|_| Error::InternalInvariant("protected header failed to serialize"))?;
        let aad = header_encoded.encoded().as_bytes();

        let encrypted_cek = self
            .provider
            .wrap_cek(AlgorithmId::Key(self.key_alg), wrapping_key, &cek)
            .map_err(|e| Error::CryptoPrimitiveFailure(format!("{e:?}")))?;

        let sealed = pipeline::encrypt(&self.provider, self.content_alg, &cek, &iv, aad, plaintext.as_bytes())?;

        Ok(format!(
            "{}.{}.{}.{}.{}",
            header_encoded.encoded(),
            jose_b64::encode(&encrypted_cek),
            jose_b64::encode(&iv),
            jose_b64::encode(&sealed.ciphertext),
            jose_b64::encode(&sealed.tag),
        ))
    }

    /// Decrypt a compact JWE with `unwrapping_key`, returning the UTF-8
    /// plaintext.
    ///
    /// Reconfigures this codec's selected `key_alg`/`content_alg` from the
    /// parsed header before doing anything else; a later
    /// [`Jwe::key_alg`]/[`Jwe::content_alg`] call reflects the input, not
    /// whatever was passed to [`Jwe::new`].
    ///
    /// `unwrapping_key` must be an RSA private key
    /// ([`import_rsa_private_key`]) for `RSA-OAEP[-256]`, or a raw AES key
    /// for `A128KW`/`A256KW`.
    pub fn decrypt(&mut self, unwrapping_key: &Key, compact: &str) -> Result<String, Error> {
        let segments: Vec<&str> = compact.split('.').collect();
        if segments.len() != 5 || segments.iter().any(|s| s.is_empty()) {
            return Err(Error::MalformedInput(format!(
                "expected 5 non-empty segments, got {}",
                segments.len()
            )));
        }
        let header_b64 = segments[0];
        let encrypted_cek_b64 = segments[1];
        let iv_b64 = segments[2];
        let ciphertext_b64 = segments[3];
        let tag_b64 = segments[4];

        let (_, header): (_, Header) = jose_b64::Json::parse(header_b64)
            .map_err(|e| Error::MalformedInput(format!("protected header: {e:?}")))?;
        if header.crit.is_some() {
            return Err(Error::MalformedInput("crit is not supported".to_string()));
        }
        let key_alg = parse_key_alg(&header.alg)?;
        let content_alg = parse_content_alg(&header.enc)?;
        self.key_alg = key_alg;
        self.content_alg = content_alg;

        let content_spec = jose_jwa::spec(AlgorithmId::Content(content_alg)).expect("closed registry");

        let encrypted_cek = jose_b64::decode(encrypted_cek_b64)
            .map_err(|e| Error::MalformedInput(format!("encrypted_key: {e}")))?;
        let iv = jose_b64::decode(iv_b64).map_err(|e| Error::MalformedInput(format!("iv: {e}")))?;
        let ciphertext =
            jose_b64::decode(ciphertext_b64).map_err(|e| Error::MalformedInput(format!("ciphertext: {e}")))?;
        let tag = jose_b64::decode(tag_b64).map_err(|e| Error::MalformedInput(format!("tag: {e}")))?;

        if iv.len() != content_spec.iv_bytes {
            return Err(Error::MalformedInput(format!(
                "expected a {}-byte iv, got {}",
                content_spec.iv_bytes,
                iv.len()
            )));
        }

        let cek = self
            .provider
            .unwrap_cek(
                AlgorithmId::Key(key_alg),
                unwrapping_key,
                &encrypted_cek,
                AlgorithmId::Content(content_alg),
            )
            .map_err(|e| Error::CryptoPrimitiveFailure(format!("{e:?}")))?;

        let aad = header_b64.as_bytes();
        let plaintext = pipeline::decrypt(&self.provider, content_alg, &cek, &iv, aad, &ciphertext, &tag)?;

        String::from_utf8(plaintext).map_err(|_| Error::MalformedInput("plaintext was not valid UTF-8".to_string()))
    }
}

/// Whether `key_alg`'s underlying primitive is RSA-OAEP, i.e. whether a
/// wrapping key for it must be an RSA key rather than a raw AES key.
/// Exposed so callers building their own key-selection logic don't need to
/// duplicate the registry's primitive tags.
pub fn is_rsa_key_alg(key_alg: KeyAlgorithmId) -> bool {
    matches!(
        jose_jwa::spec(AlgorithmId::Key(key_alg)).expect("closed registry").primitive,
        Primitive::RsaOaep { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rust_crypto::RustCryptoProvider;

    fn aes_key(bytes: usize) -> Key {
        let material: Vec<u8> = (0..bytes as u8).collect();
        Key::new_symmetric(material, KeyUsage::WRAP | KeyUsage::UNWRAP, false)
    }

    #[test]
    fn segment_count_4_is_rejected() {
        let mut jwe = Jwe::new(RustCryptoProvider::new(), KeyAlgorithmId::A256KW, ContentAlgorithmId::A256GCM);
        let key = aes_key(32);
        assert!(matches!(jwe.decrypt(&key, "a.b.c.d"), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn segment_count_6_is_rejected() {
        let mut jwe = Jwe::new(RustCryptoProvider::new(), KeyAlgorithmId::A256KW, ContentAlgorithmId::A256GCM);
        let key = aes_key(32);
        assert!(matches!(jwe.decrypt(&key, "a.b.c.d.e.f"), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn a256kw_a256gcm_round_trip() {
        let jwe = Jwe::new(RustCryptoProvider::new(), KeyAlgorithmId::A256KW, ContentAlgorithmId::A256GCM);
        let key = aes_key(32);
        let compact = jwe.encrypt(&key, "Hello, World!").unwrap();
        assert_eq!(compact.split('.').count(), 5);

        let mut decoder = Jwe::new(RustCryptoProvider::new(), KeyAlgorithmId::A256KW, ContentAlgorithmId::A256GCM);
        let plaintext = decoder.decrypt(&key, &compact).unwrap();
        assert_eq!(plaintext, "Hello, World!");
        assert_eq!(decoder.key_alg(), KeyAlgorithmId::A256KW);
        assert_eq!(decoder.content_alg(), ContentAlgorithmId::A256GCM);
    }

    #[test]
    fn a128kw_a128cbc_hs256_round_trip() {
        let jwe = Jwe::new(RustCryptoProvider::new(), KeyAlgorithmId::A128KW, ContentAlgorithmId::A128CbcHs256);
        let key = aes_key(16);
        let compact = jwe.encrypt(&key, "composite mode").unwrap();

        let mut decoder = Jwe::new(RustCryptoProvider::new(), KeyAlgorithmId::A128KW, ContentAlgorithmId::A128CbcHs256);
        let plaintext = decoder.decrypt(&key, &compact).unwrap();
        assert_eq!(plaintext, "composite mode");
    }

    #[test]
    fn tampering_any_segment_breaks_decryption() {
        let jwe = Jwe::new(RustCryptoProvider::new(), KeyAlgorithmId::A256KW, ContentAlgorithmId::A128CbcHs256);
        let key = aes_key(32);
        let compact = jwe.encrypt(&key, "tamper me").unwrap();
        let segments: Vec<&str> = compact.split('.').collect();

        for i in 0..5 {
            let mut tampered: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
            let mut bytes = jose_b64::decode(&tampered[i]).unwrap();
            if bytes.is_empty() {
                continue;
            }
            bytes[0] ^= 0xff;
            tampered[i] = jose_b64::encode(&bytes);
            let compact = tampered.join(".");

            let mut decoder =
                Jwe::new(RustCryptoProvider::new(), KeyAlgorithmId::A256KW, ContentAlgorithmId::A128CbcHs256);
            assert!(decoder.decrypt(&key, &compact).is_err(), "segment {i} tampering was not detected");
        }
    }

    #[test]
    fn crit_header_is_rejected() {
        let header = jose_b64::encode(br#"{"alg":"A256KW","enc":"A256GCM","crit":["exp"]}"#);
        let compact = format!("{header}.AA.AA.AA.AA");
        let mut jwe = Jwe::new(RustCryptoProvider::new(), KeyAlgorithmId::A256KW, ContentAlgorithmId::A256GCM);
        let key = aes_key(32);
        assert!(matches!(jwe.decrypt(&key, &compact), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn rsa_oaep_a256gcm_round_trip() {
        use rsa::traits::{PrivateKeyParts, PublicKeyParts};
        use rsa::RsaPrivateKey;

        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new(&mut rng, 2048).unwrap();
        let public = private.to_public_key();

        let n = public.n().to_bytes_be();
        let e = public.e().to_bytes_be();
        let d = private.d().to_bytes_be();
        let primes = private.primes();
        let p = primes[0].to_bytes_be();
        let q = primes[1].to_bytes_be();
        // `RustCryptoProvider` reconstructs the CRT parameters from n/e/d/p/q via
        // `RsaPrivateKey::from_components`, so the JWK's own dp/dq/qi never get read.
        let (dp, dq, qi) = (Vec::new(), Vec::new(), Vec::new());

        let public_key = Key::new_rsa_public(n.clone(), e.clone());
        let private_key = Key::new_rsa_private(n, e, d, p, q, dp, dq, qi);

        let jwe = Jwe::new(RustCryptoProvider::new(), KeyAlgorithmId::RsaOaep, ContentAlgorithmId::A256GCM);
        let compact = jwe.encrypt(&public_key, "Hello, World!").unwrap();

        let header_b64 = compact.split('.').next().unwrap();
        let header_json = jose_b64::decode(header_b64).unwrap();
        let header: serde_json::Value = serde_json::from_slice(&header_json).unwrap();
        assert_eq!(header, serde_json::json!({"alg": "RSA-OAEP", "enc": "A256GCM"}));

        let mut decoder = Jwe::new(RustCryptoProvider::new(), KeyAlgorithmId::RsaOaep, ContentAlgorithmId::A256GCM);
        let plaintext = decoder.decrypt(&private_key, &compact).unwrap();
        assert_eq!(plaintext, "Hello, World!");
    }
}
