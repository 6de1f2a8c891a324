use zeroize::Zeroizing;

use super::DatasetKey;
use crate::algorithm::CryptAlgorithm;
use crate::cipher;
use crate::error::{Error, Result};
use crate::rng;
use crate::{HMAC_KEY_LEN, MAX_SALT_USES, SALT_LEN, WRAPPING_IV_LEN, WRAPPING_MAC_LEN};

/// At-rest form of a dataset key: the master and HMAC keys encrypted
/// under a user-supplied wrapping key, plus the IV and tag of that
/// encryption. The rolling salt is deliberately absent; unwrapping
/// starts a fresh one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrappedKey {
    pub iv: [u8; WRAPPING_IV_LEN],
    pub master: Vec<u8>,
    pub hmac: [u8; HMAC_KEY_LEN],
    pub mac: [u8; WRAPPING_MAC_LEN],
}

impl DatasetKey {
    /// Encrypts the master and HMAC keys under `wrapping_key` for
    /// at-rest storage. The wrapping key is raw bytes of the
    /// dataset's own key length; the dataset's own AEAD family does
    /// the wrapping, with a full 16-byte tag.
    pub fn wrap(&self, wrapping_key: &[u8]) -> Result<WrappedKey> {
        let mut iv = [0u8; WRAPPING_IV_LEN];
        rng::pseudo_bytes(&mut iv)?;
        self.wrap_with_iv(wrapping_key, iv)
    }

    pub(crate) fn wrap_with_iv(
        &self,
        wrapping_key: &[u8],
        iv: [u8; WRAPPING_IV_LEN],
    ) -> Result<WrappedKey> {
        let key_len = self.algorithm.key_len();
        if wrapping_key.len() != key_len {
            return Err(Error::WrappingKeyLength(key_len, wrapping_key.len()));
        }

        let cipher = cipher::new_cipher(self.algorithm, wrapping_key, WRAPPING_MAC_LEN)?;

        let mut keys = Zeroizing::new(Vec::with_capacity(key_len + HMAC_KEY_LEN));
        keys.extend_from_slice(&self.master_key);
        keys.extend_from_slice(&self.hmac_key[..]);
        let sealed = cipher.encrypt(&iv, &keys)?;

        let master = sealed[..key_len].to_vec();
        let mut hmac = [0u8; HMAC_KEY_LEN];
        hmac.copy_from_slice(&sealed[key_len..key_len + HMAC_KEY_LEN]);
        let mut mac = [0u8; WRAPPING_MAC_LEN];
        mac.copy_from_slice(&sealed[key_len + HMAC_KEY_LEN..]);

        Ok(WrappedKey {
            iv,
            master,
            hmac,
            mac,
        })
    }
}

impl WrappedKey {
    /// Decrypts the wrapped keys and rebuilds a working dataset key
    /// state, exactly as construction would but with the recovered
    /// master and HMAC keys. A fresh salt is drawn, so the unwrapped
    /// state starts a new subkey lineage while still being able to
    /// decrypt every block the original state wrote.
    pub fn unwrap(&self, wrapping_key: &[u8], algorithm: CryptAlgorithm) -> Result<DatasetKey> {
        if !algorithm.is_encrypting() {
            return Err(Error::NotAnEncryptingAlgorithm(algorithm.name()));
        }
        let key_len = algorithm.key_len();
        if wrapping_key.len() != key_len {
            return Err(Error::WrappingKeyLength(key_len, wrapping_key.len()));
        }
        if self.master.len() != key_len {
            return Err(Error::WrappedKeyLength(key_len, self.master.len()));
        }

        let cipher = cipher::new_cipher(algorithm, wrapping_key, WRAPPING_MAC_LEN)?;

        let mut sealed = Vec::with_capacity(key_len + HMAC_KEY_LEN + WRAPPING_MAC_LEN);
        sealed.extend_from_slice(&self.master);
        sealed.extend_from_slice(&self.hmac);
        sealed.extend_from_slice(&self.mac);
        let opened = Zeroizing::new(cipher.decrypt(&self.iv, &sealed)?);

        let master_key = Zeroizing::new(opened[..key_len].to_vec());
        let mut hmac_key = Zeroizing::new([0u8; HMAC_KEY_LEN]);
        hmac_key.copy_from_slice(&opened[key_len..]);

        let mut salt = [0u8; SALT_LEN];
        rng::crypto_bytes(&mut salt)?;

        DatasetKey::assemble(algorithm, MAX_SALT_USES, master_key, hmac_key, salt)
    }
}
