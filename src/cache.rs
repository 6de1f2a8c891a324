
use zeroize::Zeroizing;

use crate::algorithm::CryptAlgorithm;
use crate::cipher::{self, Cipher};
use crate::error::{Error, Result};
use crate::rng;
use crate::{DATA_MAC_LEN, IV_LEN};

/// Catalog entry used for second-level cache buffers.
pub const DEFAULT_CACHE_ALGORITHM: CryptAlgorithm = CryptAlgorithm::Aes256Ccm;

/// Process-lifetime key for the second-level cache.
///
/// Drawn from the pseudo-random source at initialisation and never
/// persisted: after a reboot the cached ciphertext is unreadable and
/// the cache is simply rebuilt. There is no salt rotation here; the
/// IV derivation over cache-buffer header fields is unique for the
/// lifetime of the key. Zeroised on drop.
pub struct CacheKey {
    algorithm: CryptAlgorithm,
    key: Zeroizing<Vec<u8>>,
    /// Best-effort precomputed cipher; rebuilt from `key` per call
    /// when absent.
    ctx: Option<Box<dyn Cipher>>,
}

impl CacheKey {
    pub fn new() -> Result<CacheKey> {
        CacheKey::with_algorithm(DEFAULT_CACHE_ALGORITHM)
    }

    pub fn with_algorithm(algorithm: CryptAlgorithm) -> Result<CacheKey> {
        if !algorithm.is_encrypting() {
            return Err(Error::NotAnEncryptingAlgorithm(algorithm.name()));
        }

        let mut key = Zeroizing::new(vec![0u8; algorithm.key_len()]);
        rng::pseudo_bytes(&mut key)?;
        let ctx = cipher::new_cipher(algorithm, &key, DATA_MAC_LEN).ok();

        Ok(CacheKey {
            algorithm,
            key,
            ctx,
        })
    }

    pub fn algorithm(&self) -> CryptAlgorithm {
        self.algorithm
    }

    fn with_cipher<T>(&self, f: impl FnOnce(&dyn Cipher) -> Result<T>) -> Result<T> {
        match &self.ctx {
            Some(cipher) => f(cipher.as_ref()),
            None => {
                let cipher = cipher::new_cipher(self.algorithm, &self.key, DATA_MAC_LEN)?;
                f(cipher.as_ref())
            }
        }
    }

    /// Encrypts one cache line; `iv` comes from
    /// [`crate::iv::generate_cache_iv`].
    pub fn encrypt_block(
        &self,
        iv: &[u8; IV_LEN],
        plaintext: &[u8],
        ciphertext: &mut [u8],
        mac: &mut [u8],
    ) -> Result<()> {
        check_buffers(plaintext, ciphertext, mac)?;

        let sealed = self.with_cipher(|cipher| cipher.encrypt(iv, plaintext))?;
        ciphertext.copy_from_slice(&sealed[..plaintext.len()]);
        mac.copy_from_slice(&sealed[plaintext.len()..]);
        Ok(())
    }

    pub fn decrypt_block(
        &self,
        iv: &[u8; IV_LEN],
        ciphertext: &[u8],
        plaintext: &mut [u8],
        mac: &[u8],
    ) -> Result<()> {
        check_buffers(ciphertext, plaintext, mac)?;

        let mut sealed = Vec::with_capacity(ciphertext.len() + mac.len());
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(mac);
        let opened = Zeroizing::new(self.with_cipher(|cipher| cipher.decrypt(iv, &sealed))?);

        plaintext.copy_from_slice(&opened);
        Ok(())
    }
}

#[cfg(test)]
impl std::fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheKey").finish()
    }
}

fn check_buffers(src: &[u8], dst: &[u8], mac: &[u8]) -> Result<()> {
    if src.len() != dst.len() {
        return Err(Error::BufferLengthMismatch(src.len(), dst.len()));
    }
    if mac.len() != DATA_MAC_LEN {
        return Err(Error::MacLength(DATA_MAC_LEN, mac.len()));
    }
    Ok(())
}
