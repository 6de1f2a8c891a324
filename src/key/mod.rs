#[cfg(test)]
mod key_test;

mod block;
mod wrap;

pub use wrap::WrappedKey;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hmac::{Hmac, Mac};
use log::debug;
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use crate::algorithm::CryptAlgorithm;
use crate::cipher::CipherCtx;
use crate::error::{Error, Result};
use crate::hkdf::hkdf_sha256;
use crate::{iv, rng};
use crate::{HMAC_KEY_LEN, IV_LEN, MAX_SALT_USES, SALT_LEN};

type HmacSha256 = Hmac<Sha256>;

/// The salt, the subkey derived from it, and the cached cipher
/// contexts keyed with that subkey. Replaced as a unit on rotation so
/// readers never observe a salt without its matching subkey.
struct RotatingState {
    salt: [u8; SALT_LEN],
    subkey: Zeroizing<Vec<u8>>,
    ctx: Option<CipherCtx>,
}

impl Drop for RotatingState {
    fn drop(&mut self) {
        self.salt.zeroize();
    }
}

#[cfg(test)]
impl std::fmt::Debug for RotatingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingState").finish()
    }
}

#[cfg(test)]
impl std::fmt::Debug for DatasetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetKey").finish()
    }
}

/// Long-lived encryption state of one dataset.
///
/// The master key never touches block data; each block is encrypted
/// under a subkey derived from the master key and a rolling 8-byte
/// salt. [`DatasetKey::get_salt`] hands out the current salt and
/// counts its uses; once [`MAX_SALT_USES`] blocks have consumed it, a
/// fresh salt and subkey are derived. Encrypt and decrypt calls that
/// present an older salt re-derive its subkey on the fly.
///
/// All secret material is zeroised when the state is dropped.
pub struct DatasetKey {
    algorithm: CryptAlgorithm,
    master_key: Zeroizing<Vec<u8>>,
    hmac_key: Zeroizing<[u8; HMAC_KEY_LEN]>,
    /// Keyed HMAC template for the dedup derivation, cloned per use.
    hmac_ctx: HmacSha256,
    rotating: RwLock<RotatingState>,
    /// Post-increment use count of the current salt. Updated with a
    /// lock-free fetch-add under the read lock so concurrent writers
    /// of different blocks never serialise on each other.
    salt_count: AtomicU64,
    rotation_threshold: u64,
}

impl DatasetKey {
    /// Creates a fresh key state with random master key, HMAC key and
    /// salt.
    pub fn new(algorithm: CryptAlgorithm) -> Result<DatasetKey> {
        DatasetKey::with_rotation_threshold(algorithm, MAX_SALT_USES)
    }

    /// As [`DatasetKey::new`], with a caller-chosen salt rotation
    /// threshold.
    pub fn with_rotation_threshold(
        algorithm: CryptAlgorithm,
        rotation_threshold: u64,
    ) -> Result<DatasetKey> {
        if !algorithm.is_encrypting() {
            return Err(Error::NotAnEncryptingAlgorithm(algorithm.name()));
        }

        let mut master_key = Zeroizing::new(vec![0u8; algorithm.key_len()]);
        rng::crypto_bytes(&mut master_key)?;
        let mut hmac_key = Zeroizing::new([0u8; HMAC_KEY_LEN]);
        rng::crypto_bytes(&mut hmac_key[..])?;
        let mut salt = [0u8; SALT_LEN];
        rng::crypto_bytes(&mut salt)?;

        DatasetKey::assemble(algorithm, rotation_threshold, master_key, hmac_key, salt)
    }

    /// Builds the derived state around a master/HMAC key pair. Shared
    /// by construction and unwrap so the two are indistinguishable
    /// afterwards.
    pub(crate) fn assemble(
        algorithm: CryptAlgorithm,
        rotation_threshold: u64,
        master_key: Zeroizing<Vec<u8>>,
        hmac_key: Zeroizing<[u8; HMAC_KEY_LEN]>,
        salt: [u8; SALT_LEN],
    ) -> Result<DatasetKey> {
        let subkey = hkdf_sha256(&master_key, &[], &salt, algorithm.key_len())?;
        let ctx = CipherCtx::new(algorithm, &subkey);
        let hmac_ctx =
            HmacSha256::new_from_slice(&hmac_key[..]).map_err(|_| Error::CryptoFailure)?;

        Ok(DatasetKey {
            algorithm,
            master_key,
            hmac_key,
            hmac_ctx,
            rotating: RwLock::new(RotatingState { salt, subkey, ctx }),
            salt_count: AtomicU64::new(0),
            rotation_threshold,
        })
    }

    pub fn algorithm(&self) -> CryptAlgorithm {
        self.algorithm
    }

    /// Hands out the current salt for a block about to be encrypted
    /// and charges one use against it. The caller persists the salt
    /// with the block and passes it back on decrypt.
    ///
    /// The use counter is read post-increment; the reader that lands
    /// exactly on the threshold performs the rotation after dropping
    /// the read lock. Racing readers may push the count past the
    /// threshold in the meantime, which at worst costs one extra
    /// rotation.
    pub fn get_salt(&self) -> Result<[u8; SALT_LEN]> {
        let (salt, rotate) = {
            let state = self.read_state();
            let uses = self.salt_count.fetch_add(1, Ordering::SeqCst) + 1;
            (state.salt, uses == self.rotation_threshold)
        };

        if rotate {
            self.rotate_salt()?;
        }

        Ok(salt)
    }

    /// Derives the (salt, IV) pair for a dedup block from an HMAC of
    /// its plaintext. Both values go into block-pointer fields; the
    /// decrypt path consumes them like any other salt and IV.
    pub fn generate_dedup_iv_salt(&self, data: &[u8]) -> ([u8; SALT_LEN], [u8; IV_LEN]) {
        iv::dedup_iv_salt(&self.hmac_ctx, data)
    }

    fn rotate_salt(&self) -> Result<()> {
        let mut salt = [0u8; SALT_LEN];
        rng::crypto_bytes(&mut salt)?;

        let mut state = self.write_state();
        let subkey = hkdf_sha256(&self.master_key, &[], &salt, self.algorithm.key_len())?;
        state.ctx = CipherCtx::new(self.algorithm, &subkey);
        state.subkey = subkey;
        state.salt = salt;
        self.salt_count.store(0, Ordering::SeqCst);

        debug!(
            "rotated data salt for {} key after {} uses",
            self.algorithm, self.rotation_threshold
        );
        Ok(())
    }

    fn read_state(&self) -> RwLockReadGuard<'_, RotatingState> {
        self.rotating.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RotatingState> {
        self.rotating
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
