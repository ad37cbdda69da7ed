//! [`CryptoProvider`] backed by the `rsa`, `aes`, `cbc`, `aes-gcm`,
//! `aes-kw`, `hmac`, `sha1`, and `sha2` crates.
//!
//! Which AES key size (and, for HMAC, which hash) a call uses is read off
//! the length of the key material itself rather than threaded through as a
//! separate tag, since the registry in [`jose_jwa`] ties every one of those
//! lengths to exactly one algorithm.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use aes::{Aes128, Aes256};
use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, KeyInit as _, Nonce};
use aes_kw::Kek;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand_core::{OsRng, RngCore};
use rsa::{BigUint, Oaep, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use jose_jwa::{AlgorithmId, Digest, Primitive};

use crate::provider::{AeadParams, CryptoProvider, Key, KeyUsage};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Errors from [`RustCryptoProvider`], one variant per pipeline stage rather
/// than per underlying crate's own error type.
#[non_exhaustive]
#[derive(Debug)]
pub enum RustCryptoError {
    /// An RSA-OAEP wrap, unwrap, or key construction failed.
    Rsa,
    /// An AES-GCM seal or open failed (including tag mismatch).
    Aead,
    /// CBC unpadding rejected the decrypted block.
    Unpadding,
    /// AES-KW wrap or unwrap failed.
    KeyWrap,
    /// A key or buffer had a length this provider does not support (e.g.
    /// an AES key that is neither 16 nor 32 bytes).
    UnsupportedLength,
    /// The platform RNG failed to fill a buffer.
    Random,
}

impl From<rsa::Error> for RustCryptoError {
    fn from(_: rsa::Error) -> Self {
        Self::Rsa
    }
}

/// A [`CryptoProvider`] built from RustCrypto primitive crates.
#[derive(Default, Clone, Copy)]
pub struct RustCryptoProvider;

impl RustCryptoProvider {
    /// Construct a provider. Stateless: every call draws fresh randomness
    /// from [`OsRng`] and holds no key material between calls.
    pub fn new() -> Self {
        Self
    }
}

fn rsa_public_key(n: &[u8], e: &[u8]) -> Result<RsaPublicKey, RustCryptoError> {
    RsaPublicKey::new(BigUint::from_bytes_be(n), BigUint::from_bytes_be(e)).map_err(RustCryptoError::from)
}

#[allow(clippy::too_many_arguments)]
fn rsa_private_key(
    n: &[u8],
    e: &[u8],
    d: &[u8],
    p: &[u8],
    q: &[u8],
    _dp: &[u8],
    _dq: &[u8],
    _qi: &[u8],
) -> Result<RsaPrivateKey, RustCryptoError> {
    let primes = vec![BigUint::from_bytes_be(p), BigUint::from_bytes_be(q)];
    let mut key = RsaPrivateKey::from_components(
        BigUint::from_bytes_be(n),
        BigUint::from_bytes_be(e),
        BigUint::from_bytes_be(d),
        primes,
    )
    .map_err(RustCryptoError::from)?;
    key.validate().map_err(RustCryptoError::from)?;
    Ok(key)
}

fn oaep_padding(digest: Digest) -> Oaep {
    match digest {
        Digest::Sha1 => Oaep {
            digest: Box::<Sha1>::default(),
            mgf_digest: Box::<Sha1>::default(),
            label: None,
        },
        Digest::Sha256 => Oaep {
            digest: Box::<Sha256>::default(),
            mgf_digest: Box::<Sha256>::default(),
            label: None,
        },
        Digest::Sha512 => Oaep {
            digest: Box::<Sha512>::default(),
            mgf_digest: Box::<Sha512>::default(),
            label: None,
        },
    }
}

fn wrap_aes_kw(kek_bytes: &[u8], cek_bytes: &[u8]) -> Result<Vec<u8>, RustCryptoError> {
    let mut wrapped = vec![0u8; cek_bytes.len() + 8];
    match kek_bytes.len() {
        16 => {
            let array: [u8; 16] = kek_bytes.try_into().map_err(|_| RustCryptoError::UnsupportedLength)?;
            Kek::from(array)
                .wrap(cek_bytes, &mut wrapped)
                .map_err(|_| RustCryptoError::KeyWrap)?;
        }
        32 => {
            let array: [u8; 32] = kek_bytes.try_into().map_err(|_| RustCryptoError::UnsupportedLength)?;
            Kek::from(array)
                .wrap(cek_bytes, &mut wrapped)
                .map_err(|_| RustCryptoError::KeyWrap)?;
        }
        _ => return Err(RustCryptoError::UnsupportedLength),
    }
    Ok(wrapped)
}

fn unwrap_aes_kw(kek_bytes: &[u8], wrapped: &[u8]) -> Result<Vec<u8>, RustCryptoError> {
    if wrapped.len() < 8 {
        return Err(RustCryptoError::UnsupportedLength);
    }
    let mut out = vec![0u8; wrapped.len() - 8];
    match kek_bytes.len() {
        16 => {
            let array: [u8; 16] = kek_bytes.try_into().map_err(|_| RustCryptoError::UnsupportedLength)?;
            Kek::from(array)
                .unwrap(wrapped, &mut out)
                .map_err(|_| RustCryptoError::KeyWrap)?;
        }
        32 => {
            let array: [u8; 32] = kek_bytes.try_into().map_err(|_| RustCryptoError::UnsupportedLength)?;
            Kek::from(array)
                .unwrap(wrapped, &mut out)
                .map_err(|_| RustCryptoError::KeyWrap)?;
        }
        _ => return Err(RustCryptoError::UnsupportedLength),
    }
    Ok(out)
}

impl CryptoProvider for RustCryptoProvider {
    type Error = RustCryptoError;

    fn random(&self, n: usize) -> Result<Vec<u8>, Self::Error> {
        let mut buf = vec![0u8; n];
        OsRng.try_fill_bytes(&mut buf).map_err(|_| RustCryptoError::Random)?;
        Ok(buf)
    }

    fn generate_cek(&self, content_alg: AlgorithmId) -> Result<Key, Self::Error> {
        let spec = jose_jwa::spec(content_alg).expect("closed registry");
        let bytes = self.random(spec.cek_bytes)?;
        Ok(Key::new_symmetric(bytes, KeyUsage::ENCRYPT | KeyUsage::DECRYPT, true))
    }

    fn export_raw(&self, key: &Key) -> Result<Vec<u8>, Self::Error> {
        key.symmetric_material()
            .map(<[u8]>::to_vec)
            .ok_or(RustCryptoError::UnsupportedLength)
    }

    fn import_mac_key(&self, _hash: Digest, bytes: &[u8]) -> Result<Key, Self::Error> {
        Ok(Key::new_symmetric(bytes.to_vec(), KeyUsage::SIGN, true))
    }

    fn import_enc_key(&self, bytes: &[u8]) -> Result<Key, Self::Error> {
        Ok(Key::new_symmetric(bytes.to_vec(), KeyUsage::ENCRYPT | KeyUsage::DECRYPT, true))
    }

    fn wrap_cek(&self, key_alg: AlgorithmId, wrapping_key: &Key, cek: &Key) -> Result<Vec<u8>, Self::Error> {
        let spec = jose_jwa::spec(key_alg).expect("closed registry");
        let cek_bytes = cek.symmetric_material().ok_or(RustCryptoError::UnsupportedLength)?;
        match spec.primitive {
            Primitive::RsaOaep { digest } => {
                let (n, e) = wrapping_key.rsa_public().ok_or(RustCryptoError::UnsupportedLength)?;
                let public = rsa_public_key(n, e)?;
                public
                    .encrypt(&mut OsRng, oaep_padding(digest), cek_bytes)
                    .map_err(|_| RustCryptoError::Rsa)
            }
            Primitive::AesKw => {
                let kek_bytes = wrapping_key.symmetric_material().ok_or(RustCryptoError::UnsupportedLength)?;
                wrap_aes_kw(kek_bytes, cek_bytes)
            }
            _ => Err(RustCryptoError::UnsupportedLength),
        }
    }

    fn unwrap_cek(
        &self,
        key_alg: AlgorithmId,
        unwrapping_key: &Key,
        wrapped: &[u8],
        content_alg: AlgorithmId,
    ) -> Result<Key, Self::Error> {
        let key_spec = jose_jwa::spec(key_alg).expect("closed registry");
        let raw = match key_spec.primitive {
            Primitive::RsaOaep { digest } => {
                let (n, e, d, p, q, dp, dq, qi) =
                    unwrapping_key.rsa_private().ok_or(RustCryptoError::UnsupportedLength)?;
                let private = rsa_private_key(n, e, d, p, q, dp, dq, qi)?;
                private.decrypt(oaep_padding(digest), wrapped).map_err(|_| RustCryptoError::Rsa)?
            }
            Primitive::AesKw => {
                let kek_bytes = unwrapping_key.symmetric_material().ok_or(RustCryptoError::UnsupportedLength)?;
                unwrap_aes_kw(kek_bytes, wrapped)?
            }
            _ => return Err(RustCryptoError::UnsupportedLength),
        };
        let content_spec = jose_jwa::spec(content_alg).expect("closed registry");
        if raw.len() != content_spec.cek_bytes {
            return Err(RustCryptoError::UnsupportedLength);
        }
        Ok(Key::new_symmetric(raw, KeyUsage::ENCRYPT | KeyUsage::DECRYPT, true))
    }

    fn aead_encrypt(&self, params: AeadParams<'_>, key: &Key, plaintext: &[u8]) -> Result<Vec<u8>, Self::Error> {
        let key_bytes = key.symmetric_material().ok_or(RustCryptoError::UnsupportedLength)?;
        let nonce = Nonce::from_slice(params.iv);
        let payload = Payload {
            msg: plaintext,
            aad: params.aad,
        };
        match key_bytes.len() {
            16 => {
                let cipher = Aes128Gcm::new_from_slice(key_bytes).map_err(|_| RustCryptoError::UnsupportedLength)?;
                cipher.encrypt(nonce, payload).map_err(|_| RustCryptoError::Aead)
            }
            32 => {
                let cipher = Aes256Gcm::new_from_slice(key_bytes).map_err(|_| RustCryptoError::UnsupportedLength)?;
                cipher.encrypt(nonce, payload).map_err(|_| RustCryptoError::Aead)
            }
            _ => Err(RustCryptoError::UnsupportedLength),
        }
    }

    fn aead_decrypt(
        &self,
        params: AeadParams<'_>,
        key: &Key,
        ciphertext_and_tag: &[u8],
    ) -> Result<Vec<u8>, Self::Error> {
        let key_bytes = key.symmetric_material().ok_or(RustCryptoError::UnsupportedLength)?;
        let nonce = Nonce::from_slice(params.iv);
        let payload = Payload {
            msg: ciphertext_and_tag,
            aad: params.aad,
        };
        match key_bytes.len() {
            16 => {
                let cipher = Aes128Gcm::new_from_slice(key_bytes).map_err(|_| RustCryptoError::UnsupportedLength)?;
                cipher.decrypt(nonce, payload).map_err(|_| RustCryptoError::Aead)
            }
            32 => {
                let cipher = Aes256Gcm::new_from_slice(key_bytes).map_err(|_| RustCryptoError::UnsupportedLength)?;
                cipher.decrypt(nonce, payload).map_err(|_| RustCryptoError::Aead)
            }
            _ => Err(RustCryptoError::UnsupportedLength),
        }
    }

    fn cbc_encrypt(&self, key: &Key, iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Self::Error> {
        let key_bytes = key.symmetric_material().ok_or(RustCryptoError::UnsupportedLength)?;
        match key_bytes.len() {
            16 => {
                let cipher =
                    Aes128CbcEnc::new_from_slices(key_bytes, iv).map_err(|_| RustCryptoError::UnsupportedLength)?;
                Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
            }
            32 => {
                let cipher =
                    Aes256CbcEnc::new_from_slices(key_bytes, iv).map_err(|_| RustCryptoError::UnsupportedLength)?;
                Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
            }
            _ => Err(RustCryptoError::UnsupportedLength),
        }
    }

    fn cbc_decrypt(&self, key: &Key, iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, Self::Error> {
        let key_bytes = key.symmetric_material().ok_or(RustCryptoError::UnsupportedLength)?;
        match key_bytes.len() {
            16 => {
                let cipher =
                    Aes128CbcDec::new_from_slices(key_bytes, iv).map_err(|_| RustCryptoError::UnsupportedLength)?;
                cipher
                    .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                    .map_err(|_| RustCryptoError::Unpadding)
            }
            32 => {
                let cipher =
                    Aes256CbcDec::new_from_slices(key_bytes, iv).map_err(|_| RustCryptoError::UnsupportedLength)?;
                cipher
                    .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                    .map_err(|_| RustCryptoError::Unpadding)
            }
            _ => Err(RustCryptoError::UnsupportedLength),
        }
    }

    fn hmac_sign(&self, key: &Key, data: &[u8]) -> Result<Vec<u8>, Self::Error> {
        let key_bytes = key.symmetric_material().ok_or(RustCryptoError::UnsupportedLength)?;
        match key_bytes.len() {
            16 => {
                let mut mac =
                    Hmac::<Sha256>::new_from_slice(key_bytes).map_err(|_| RustCryptoError::UnsupportedLength)?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }
            32 => {
                let mut mac =
                    Hmac::<Sha512>::new_from_slice(key_bytes).map_err(|_| RustCryptoError::UnsupportedLength)?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }
            _ => Err(RustCryptoError::UnsupportedLength),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aes_kw_round_trip_128() {
        let kek = [0x11u8; 16];
        let cek = [0x22u8; 16];
        let wrapped = wrap_aes_kw(&kek, &cek).unwrap();
        assert_eq!(wrapped.len(), cek.len() + 8);
        let unwrapped = unwrap_aes_kw(&kek, &wrapped).unwrap();
        assert_eq!(unwrapped, cek);
    }

    #[test]
    fn aes_kw_round_trip_256() {
        let kek = [0x33u8; 32];
        let cek = [0x44u8; 32];
        let wrapped = wrap_aes_kw(&kek, &cek).unwrap();
        let unwrapped = unwrap_aes_kw(&kek, &wrapped).unwrap();
        assert_eq!(unwrapped, cek);
    }

    #[test]
    fn gcm_round_trip_via_provider() {
        let provider = RustCryptoProvider::new();
        let key = Key::new_symmetric(vec![0x55u8; 32], KeyUsage::ENCRYPT | KeyUsage::DECRYPT, true);
        let iv = provider.random(12).unwrap();
        let params = AeadParams {
            alg: AlgorithmId::Content(jose_jwa::ContentAlgorithmId::A256GCM),
            iv: &iv,
            aad: b"header",
        };
        let sealed = provider.aead_encrypt(
            AeadParams {
                alg: params.alg,
                iv: &iv,
                aad: b"header",
            },
            &key,
            b"plaintext",
        ).unwrap();
        let opened = provider
            .aead_decrypt(
                AeadParams {
                    alg: params.alg,
                    iv: &iv,
                    aad: b"header",
                },
                &key,
                &sealed,
            )
            .unwrap();
        assert_eq!(opened, b"plaintext");
    }
}
