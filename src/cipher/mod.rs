pub(crate) mod cipher_aes_ccm;
pub(crate) mod cipher_aes_gcm;

use aead::{Aead, KeyInit, Nonce};
use log::warn;

use crate::algorithm::{CipherFamily, CryptAlgorithm};
use crate::error::{Error, Result};
use crate::{DATA_MAC_LEN, IV_LEN, ZIL_MAC_LEN};

/// One keyed AEAD instance with a fixed tag length.
///
/// Both supported families run with a 96-bit IV and no associated
/// data; the tag is carried postfix, appended to the ciphertext on
/// encrypt and expected after it on decrypt.
pub(crate) trait Cipher: Send + Sync {
    /// Returns ciphertext with the tag appended.
    fn encrypt(&self, iv: &[u8; IV_LEN], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Verifies the trailing tag and returns the plaintext.
    fn decrypt(&self, iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// Adapter from any RustCrypto AEAD to [`Cipher`].
pub(crate) struct AeadCipher<A> {
    aead: A,
    tag_len: usize,
}

impl<A: Aead + KeyInit> AeadCipher<A> {
    pub(crate) fn new(key: &[u8], tag_len: usize) -> Result<AeadCipher<A>> {
        let aead = A::new_from_slice(key).map_err(|_| Error::CryptoFailure)?;
        Ok(AeadCipher { aead, tag_len })
    }
}

impl<A: Aead + Send + Sync> Cipher for AeadCipher<A> {
    fn encrypt(&self, iv: &[u8; IV_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
        self.aead
            .encrypt(Nonce::<A>::from_slice(iv), plaintext)
            .map_err(|_| Error::CryptoFailure)
    }

    fn decrypt(&self, iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() < self.tag_len {
            return Err(Error::AuthenticationFailed);
        }
        self.aead
            .decrypt(Nonce::<A>::from_slice(iv), ciphertext)
            .map_err(|_| Error::AuthenticationFailed)
    }
}

/// Builds a keyed cipher for the given catalog entry and tag length.
pub(crate) fn new_cipher(
    algorithm: CryptAlgorithm,
    key: &[u8],
    tag_len: usize,
) -> Result<Box<dyn Cipher>> {
    match algorithm.family() {
        CipherFamily::Ccm => cipher_aes_ccm::new_cipher_aes_ccm(key, tag_len),
        CipherFamily::Gcm => cipher_aes_gcm::new_cipher_aes_gcm(key, tag_len),
        CipherFamily::None => Err(Error::NotAnEncryptingAlgorithm(algorithm.name())),
    }
}

/// Precomputed ciphers for the current subkey, one per tag length the
/// data path uses. Purely an optimisation: when absent, the block
/// path keys a fresh cipher per call.
pub(crate) struct CipherCtx {
    pub(crate) data: Box<dyn Cipher>,
    pub(crate) log: Box<dyn Cipher>,
}

impl CipherCtx {
    pub(crate) fn new(algorithm: CryptAlgorithm, key: &[u8]) -> Option<CipherCtx> {
        match (
            new_cipher(algorithm, key, DATA_MAC_LEN),
            new_cipher(algorithm, key, ZIL_MAC_LEN),
        ) {
            (Ok(data), Ok(log)) => Some(CipherCtx { data, log }),
            _ => {
                warn!("unable to cache cipher contexts for {algorithm}");
                None
            }
        }
    }
}
