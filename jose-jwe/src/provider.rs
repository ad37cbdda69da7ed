//! The external collaborator this crate delegates every primitive operation
//! to.
//!
//! [`CryptoProvider`] is deliberately thin: it knows nothing about JOSE,
//! headers, or compact serialization. It is handed opaque [`Key`] handles
//! and byte buffers, and it performs exactly one primitive per method. The
//! codec in [`crate::pipeline`] and [`crate::Jwe`] is the thing that knows
//! what order to call these in and what the results mean.

use alloc::vec::Vec;

use jose_jwa::{AlgorithmId, Digest};
use zeroize::Zeroize;

/// A key handle produced by a [`CryptoProvider`] or by
/// [`crate::jwk_import`].
///
/// This crate's own [`RustCryptoProvider`](crate::rust_crypto::RustCryptoProvider)
/// represents a `Key` as raw bytes or RSA parameters plus metadata, since
/// there is no hardware key store to keep them separate from; a provider
/// backed by an HSM or a platform keystore would instead hold an opaque
/// handle here and reject [`CryptoProvider::export_raw`] for
/// non-extractable keys.
#[derive(Clone)]
pub struct Key {
    material: KeyMaterial,
    usage: KeyUsage,
    extractable: bool,
}

/// The key material a [`Key`] carries, variant by the family of algorithm it
/// was created for.
#[derive(Clone)]
pub(crate) enum KeyMaterial {
    /// A symmetric key: AES-KW, AES-CBC, AES-GCM, or HMAC.
    Symmetric(Vec<u8>),
    /// An RSA public key, for wrapping (`RSA-OAEP[-256]` encrypt).
    RsaPublic { n: Vec<u8>, e: Vec<u8> },
    /// An RSA private key, for unwrapping (`RSA-OAEP[-256]` decrypt).
    RsaPrivate {
        n: Vec<u8>,
        e: Vec<u8>,
        d: Vec<u8>,
        p: Vec<u8>,
        q: Vec<u8>,
        dp: Vec<u8>,
        dq: Vec<u8>,
        qi: Vec<u8>,
    },
}

impl Key {
    /// Wrap raw symmetric key bytes with the given usage and extractability.
    pub fn new_symmetric(material: Vec<u8>, usage: KeyUsage, extractable: bool) -> Self {
        Self {
            material: KeyMaterial::Symmetric(material),
            usage,
            extractable,
        }
    }

    /// Wrap RSA public key parameters as a `wrap`-only key.
    pub fn new_rsa_public(n: Vec<u8>, e: Vec<u8>) -> Self {
        Self {
            material: KeyMaterial::RsaPublic { n, e },
            usage: KeyUsage::WRAP,
            extractable: false,
        }
    }

    /// Wrap RSA private key parameters as an `unwrap`-only key.
    #[allow(clippy::too_many_arguments)]
    pub fn new_rsa_private(
        n: Vec<u8>,
        e: Vec<u8>,
        d: Vec<u8>,
        p: Vec<u8>,
        q: Vec<u8>,
        dp: Vec<u8>,
        dq: Vec<u8>,
        qi: Vec<u8>,
    ) -> Self {
        Self {
            material: KeyMaterial::RsaPrivate {
                n,
                e,
                d,
                p,
                q,
                dp,
                dq,
                qi,
            },
            usage: KeyUsage::UNWRAP,
            extractable: false,
        }
    }

    /// The usage set this key was imported or generated with.
    pub fn usage(&self) -> KeyUsage {
        self.usage
    }

    /// Whether [`CryptoProvider::export_raw`] is permitted for this key.
    pub fn extractable(&self) -> bool {
        self.extractable
    }

    /// Borrow the raw symmetric key material.
    ///
    /// Bypasses the `extractable` flag, which gates only
    /// [`CryptoProvider::export_raw`], not this crate's own pipeline. Returns
    /// `None` for RSA key material.
    pub(crate) fn symmetric_material(&self) -> Option<&[u8]> {
        match &self.material {
            KeyMaterial::Symmetric(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Borrow this key's RSA public parameters, if it has any.
    pub(crate) fn rsa_public(&self) -> Option<(&[u8], &[u8])> {
        match &self.material {
            KeyMaterial::RsaPublic { n, e } => Some((n, e)),
            _ => None,
        }
    }

    /// Borrow this key's RSA private parameters, if it has any.
    #[allow(clippy::type_complexity)]
    pub(crate) fn rsa_private(
        &self,
    ) -> Option<(&[u8], &[u8], &[u8], &[u8], &[u8], &[u8], &[u8], &[u8])> {
        match &self.material {
            KeyMaterial::RsaPrivate {
                n,
                e,
                d,
                p,
                q,
                dp,
                dq,
                qi,
            } => Some((n, e, d, p, q, dp, dq, qi)),
            _ => None,
        }
    }
}

impl Zeroize for KeyMaterial {
    fn zeroize(&mut self) {
        match self {
            KeyMaterial::Symmetric(bytes) => bytes.zeroize(),
            KeyMaterial::RsaPublic { n, e } => {
                n.zeroize();
                e.zeroize();
            }
            KeyMaterial::RsaPrivate {
                n,
                e,
                d,
                p,
                q,
                dp,
                dq,
                qi,
            } => {
                n.zeroize();
                e.zeroize();
                d.zeroize();
                p.zeroize();
                q.zeroize();
                dp.zeroize();
                dq.zeroize();
                qi.zeroize();
            }
        }
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        self.material.zeroize();
    }
}

/// The operations a [`Key`] may be used for.
///
/// Mirrors the `key_ops` vocabulary of RFC 7517 §4.3, restricted to the
/// subset this crate's pipeline actually calls into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct KeyUsage(u8);

impl KeyUsage {
    /// May be used to wrap another key.
    pub const WRAP: Self = Self(1 << 0);
    /// May be used to unwrap a wrapped key.
    pub const UNWRAP: Self = Self(1 << 1);
    /// May be used to encrypt content.
    pub const ENCRYPT: Self = Self(1 << 2);
    /// May be used to decrypt content.
    pub const DECRYPT: Self = Self(1 << 3);
    /// May be used to compute a MAC.
    pub const SIGN: Self = Self(1 << 4);

    /// Whether this usage set contains `other`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for KeyUsage {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Parameters for an AEAD (AES-GCM) encrypt/decrypt call.
pub struct AeadParams<'a> {
    /// Content-encryption algorithm identifier, e.g. `A256GCM`.
    pub alg: AlgorithmId,
    /// Initialization vector / nonce.
    pub iv: &'a [u8],
    /// Additional authenticated data bound to the ciphertext.
    pub aad: &'a [u8],
}

/// The primitive operations this crate's content-encryption pipeline and
/// compact codec are built from.
///
/// Every method is synchronous. [`crate::pipeline`] calls CEK-wrapping and
/// content encryption without threading one result into the other's
/// arguments, since both depend only on the CEK.
pub trait CryptoProvider {
    /// The error a primitive operation failed with.
    type Error: core::fmt::Debug;

    /// Draw `n` cryptographically random bytes.
    fn random(&self, n: usize) -> Result<Vec<u8>, Self::Error>;

    /// Generate a fresh Content Encryption Key for `content_alg`.
    ///
    /// For an AEAD algorithm this is `key_bits / 8` random bytes; for a
    /// composite algorithm it is the full `cek_bytes`, extractable so it can
    /// later be split with [`Self::export_raw`].
    fn generate_cek(&self, content_alg: AlgorithmId) -> Result<Key, Self::Error>;

    /// Export a key's raw bytes. Callers must only invoke this on keys
    /// created with `extractable = true`: in practice, composite-mode CEKs
    /// produced by [`Self::generate_cek`] or [`Self::unwrap_cek`].
    fn export_raw(&self, key: &Key) -> Result<Vec<u8>, Self::Error>;

    /// Import the MAC half of a split composite CEK as an HMAC key.
    fn import_mac_key(&self, hash: Digest, bytes: &[u8]) -> Result<Key, Self::Error>;

    /// Import the encryption half of a split composite CEK as an AES-CBC
    /// key.
    fn import_enc_key(&self, bytes: &[u8]) -> Result<Key, Self::Error>;

    /// Wrap `cek` under `wrapping_key` using `key_alg` (`RSA-OAEP[-256]` or
    /// `A128KW`/`A256KW`).
    fn wrap_cek(&self, key_alg: AlgorithmId, wrapping_key: &Key, cek: &Key) -> Result<Vec<u8>, Self::Error>;

    /// Unwrap bytes previously produced by [`Self::wrap_cek`], producing a
    /// CEK for `content_alg`.
    fn unwrap_cek(
        &self,
        key_alg: AlgorithmId,
        unwrapping_key: &Key,
        wrapped: &[u8],
        content_alg: AlgorithmId,
    ) -> Result<Key, Self::Error>;

    /// AEAD-encrypt `plaintext`, returning `ciphertext ‖ tag`.
    fn aead_encrypt(&self, params: AeadParams<'_>, key: &Key, plaintext: &[u8]) -> Result<Vec<u8>, Self::Error>;

    /// AEAD-decrypt `ciphertext ‖ tag`, verifying the tag before returning
    /// plaintext.
    fn aead_decrypt(
        &self,
        params: AeadParams<'_>,
        key: &Key,
        ciphertext_and_tag: &[u8],
    ) -> Result<Vec<u8>, Self::Error>;

    /// CBC-encrypt `plaintext` with PKCS#7 padding under `key` (from
    /// [`Self::import_enc_key`]) and `iv`.
    fn cbc_encrypt(&self, key: &Key, iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Self::Error>;

    /// CBC-decrypt `ciphertext`, removing PKCS#7 padding.
    fn cbc_decrypt(&self, key: &Key, iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, Self::Error>;

    /// Compute an HMAC over `data` under `key` (from [`Self::import_mac_key`]).
    fn hmac_sign(&self, key: &Key, data: &[u8]) -> Result<Vec<u8>, Self::Error>;
}
