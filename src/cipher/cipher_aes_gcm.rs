use aes::{Aes128, Aes192, Aes256};
use aes_gcm::aead::consts::{U12, U16};
use aes_gcm::aead::{AeadInPlace, KeyInit, Nonce};
use aes_gcm::AesGcm;
use subtle::ConstantTimeEq;

use super::{AeadCipher, Cipher};
use crate::error::{Error, Result};
use crate::{DATA_MAC_LEN, IV_LEN, ZIL_MAC_LEN};

/// AES-GCM with the requested key and tag size.
///
/// The provider's tag-size parameter is sealed to 12..=16 bytes, so
/// the 8-byte intent-log tag runs through the detached construction
/// in [`CipherAesGcmTruncated`] instead.
pub(crate) fn new_cipher_aes_gcm(key: &[u8], tag_len: usize) -> Result<Box<dyn Cipher>> {
    let cipher: Box<dyn Cipher> = match (key.len(), tag_len) {
        (16, DATA_MAC_LEN) => {
            Box::new(AeadCipher::<AesGcm<Aes128, U12, U16>>::new(key, tag_len)?)
        }
        (24, DATA_MAC_LEN) => {
            Box::new(AeadCipher::<AesGcm<Aes192, U12, U16>>::new(key, tag_len)?)
        }
        (32, DATA_MAC_LEN) => {
            Box::new(AeadCipher::<AesGcm<Aes256, U12, U16>>::new(key, tag_len)?)
        }
        (16, ZIL_MAC_LEN) => Box::new(CipherAesGcmTruncated::<AesGcm<Aes128, U12, U16>>::new(
            key, tag_len,
        )?),
        (24, ZIL_MAC_LEN) => Box::new(CipherAesGcmTruncated::<AesGcm<Aes192, U12, U16>>::new(
            key, tag_len,
        )?),
        (32, ZIL_MAC_LEN) => Box::new(CipherAesGcmTruncated::<AesGcm<Aes256, U12, U16>>::new(
            key, tag_len,
        )?),
        _ => return Err(Error::CryptoFailure),
    };

    Ok(cipher)
}

/// GCM with a tag truncated below what the provider's sealed tag-size
/// parameter allows. Runs the detached API with a full 16-byte tag
/// and stores only the leading `tag_len` bytes.
pub(crate) struct CipherAesGcmTruncated<A> {
    aead: A,
    tag_len: usize,
}

impl<A: AeadInPlace + KeyInit> CipherAesGcmTruncated<A> {
    pub(crate) fn new(key: &[u8], tag_len: usize) -> Result<CipherAesGcmTruncated<A>> {
        let aead = A::new_from_slice(key).map_err(|_| Error::CryptoFailure)?;
        Ok(CipherAesGcmTruncated { aead, tag_len })
    }
}

impl<A: AeadInPlace + Send + Sync> Cipher for CipherAesGcmTruncated<A> {
    fn encrypt(&self, iv: &[u8; IV_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut buf = plaintext.to_vec();
        let tag = self
            .aead
            .encrypt_in_place_detached(Nonce::<A>::from_slice(iv), &[], &mut buf)
            .map_err(|_| Error::CryptoFailure)?;
        buf.extend_from_slice(&tag[..self.tag_len]);
        Ok(buf)
    }

    fn decrypt(&self, iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() < self.tag_len {
            return Err(Error::AuthenticationFailed);
        }
        let (body, stored) = ciphertext.split_at(ciphertext.len() - self.tag_len);
        let nonce = Nonce::<A>::from_slice(iv);

        // The counter-mode layer is its own inverse: running the
        // encrypt direction over the ciphertext recovers the
        // plaintext, and a second pass over that plaintext recomputes
        // the full tag over the original ciphertext.
        let mut plaintext = body.to_vec();
        self.aead
            .encrypt_in_place_detached(nonce, &[], &mut plaintext)
            .map_err(|_| Error::CryptoFailure)?;
        let mut check = plaintext.clone();
        let tag = self
            .aead
            .encrypt_in_place_detached(nonce, &[], &mut check)
            .map_err(|_| Error::CryptoFailure)?;

        if bool::from(tag[..self.tag_len].ct_eq(stored)) {
            Ok(plaintext)
        } else {
            Err(Error::AuthenticationFailed)
        }
    }
}
