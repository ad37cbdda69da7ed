//! CEK and IV generation, and the CEK split used by the composite
//! (`*CBC-HS*`) content algorithms.

use alloc::vec::Vec;

use jose_jwa::{AlgorithmId, ContentAlgorithmId, ContentMode};

use crate::provider::{CryptoProvider, Key};
use crate::Error;

/// Draw a fresh IV of the length `content_alg` requires.
pub fn create_iv<P: CryptoProvider>(provider: &P, content_alg: ContentAlgorithmId) -> Result<Vec<u8>, Error> {
    let spec = jose_jwa::spec(AlgorithmId::Content(content_alg)).expect("closed registry");
    provider
        .random(spec.iv_bytes)
        .map_err(|e| Error::CryptoPrimitiveFailure(alloc::format!("{e:?}")))
}

/// Generate a fresh Content Encryption Key for `content_alg`.
pub fn create_cek<P: CryptoProvider>(provider: &P, content_alg: ContentAlgorithmId) -> Result<Key, Error> {
    provider
        .generate_cek(AlgorithmId::Content(content_alg))
        .map_err(|e| Error::CryptoPrimitiveFailure(alloc::format!("{e:?}")))
}

/// A CEK split into its MAC and encryption halves, for a composite content
/// algorithm.
pub struct SplitCek {
    /// The MAC key, imported as HMAC under the algorithm's hash.
    pub mac_key: Key,
    /// The encryption key, imported as AES-CBC.
    pub enc_key: Key,
}

/// Split a composite-mode CEK into its MAC and ENC halves.
///
/// Per RFC 7518 §5.2.2.1, the **first** `mac.key_bytes` bytes of the CEK
/// become the MAC key and the **remaining** bytes become the ENC key; this
/// ordering must never be reversed. `cek` must be extractable (true for
/// every CEK [`create_cek`] produces in composite mode, and for every CEK
/// [`crate::provider::CryptoProvider::unwrap_cek`] produces for a composite
/// `content_alg`).
pub fn split_cek<P: CryptoProvider>(
    provider: &P,
    content_alg: ContentAlgorithmId,
    cek: &Key,
) -> Result<SplitCek, Error> {
    let spec = jose_jwa::spec(AlgorithmId::Content(content_alg)).expect("closed registry");
    let mac = match spec.mode {
        Some(ContentMode::Composite(mac)) => mac,
        _ => {
            return Err(Error::InternalInvariant(
                "split_cek called for a non-composite content algorithm",
            ))
        }
    };

    let raw = provider
        .export_raw(cek)
        .map_err(|e| Error::CryptoPrimitiveFailure(alloc::format!("{e:?}")))?;
    if raw.len() != spec.cek_bytes {
        return Err(Error::InternalInvariant("CEK length did not match its algorithm's cek_bytes"));
    }

    let (mac_bytes, enc_bytes) = raw.split_at(mac.key_bytes);
    let mac_key = provider
        .import_mac_key(mac.hmac_hash, mac_bytes)
        .map_err(|e| Error::CryptoPrimitiveFailure(alloc::format!("{e:?}")))?;
    let enc_key = provider
        .import_enc_key(enc_bytes)
        .map_err(|e| Error::CryptoPrimitiveFailure(alloc::format!("{e:?}")))?;

    Ok(SplitCek { mac_key, enc_key })
}
