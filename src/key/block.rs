use zeroize::Zeroizing;

use super::DatasetKey;
use crate::cipher::{self, Cipher};
use crate::error::{Error, Result};
use crate::hkdf::hkdf_sha256;
use crate::layout::ObjectType;
use crate::plan::{self, BlockPlan};
use crate::{DATA_MAC_LEN, IV_LEN, SALT_LEN, ZIL_MAC_LEN};

fn mac_len(object_type: ObjectType) -> usize {
    match object_type {
        ObjectType::IntentLog => ZIL_MAC_LEN,
        ObjectType::Data => DATA_MAC_LEN,
    }
}

impl DatasetKey {
    /// Encrypts one block. `salt` must come from
    /// [`DatasetKey::get_salt`] (or the dedup derivation) and `iv`
    /// from the matching [`crate::iv`] derivation; the caller
    /// persists both along with the tag written to `mac`.
    ///
    /// Intent-log blocks keep their chain header and embedded block
    /// pointers in the clear; a log block with no records needs no
    /// encryption at all and is copied through with a zeroed tag.
    pub fn encrypt_block(
        &self,
        object_type: ObjectType,
        salt: &[u8; SALT_LEN],
        iv: &[u8; IV_LEN],
        plaintext: &[u8],
        ciphertext: &mut [u8],
        mac: &mut [u8],
    ) -> Result<()> {
        check_buffers(plaintext, ciphertext, mac, mac_len(object_type))?;

        let (segments, enc_len) = match plan_block(object_type, plaintext, ciphertext)? {
            BlockPlan::NoEncryption => {
                ciphertext.copy_from_slice(plaintext);
                mac.fill(0);
                return Ok(());
            }
            BlockPlan::Crypt { segments, enc_len } => (segments, enc_len),
        };

        let gathered = plan::gather(&segments, plaintext, 0);
        let sealed = self.with_cipher(object_type, salt, |cipher| cipher.encrypt(iv, &gathered))?;

        plan::scatter(&segments, &sealed[..enc_len], ciphertext);
        mac.copy_from_slice(&sealed[enc_len..]);
        Ok(())
    }

    /// Decrypts one block with the exact (salt, IV, tag) that were
    /// persisted with it. Fails with
    /// [`Error::AuthenticationFailed`] before any payload byte
    /// reaches `plaintext` if anything was tampered with.
    pub fn decrypt_block(
        &self,
        object_type: ObjectType,
        salt: &[u8; SALT_LEN],
        iv: &[u8; IV_LEN],
        ciphertext: &[u8],
        plaintext: &mut [u8],
        mac: &[u8],
    ) -> Result<()> {
        check_buffers(ciphertext, plaintext, mac, mac_len(object_type))?;

        let segments = match plan_block(object_type, ciphertext, plaintext)? {
            BlockPlan::NoEncryption => {
                plaintext.copy_from_slice(ciphertext);
                return Ok(());
            }
            BlockPlan::Crypt { segments, .. } => segments,
        };

        let mut gathered = plan::gather(&segments, ciphertext, mac.len());
        gathered.extend_from_slice(mac);
        let opened = Zeroizing::new(
            self.with_cipher(object_type, salt, |cipher| cipher.decrypt(iv, &gathered))?,
        );

        plan::scatter(&segments, &opened, plaintext);
        Ok(())
    }

    /// Runs `f` with the cipher for `salt`.
    ///
    /// When the caller's salt is the current one, the cached context
    /// is used under the read lock, pinning (salt, subkey) for the
    /// duration of the call. An older salt means a replayed block:
    /// its subkey is re-derived into a stack buffer, used once and
    /// zeroised. Such subkeys are deliberately never cached.
    fn with_cipher<T>(
        &self,
        object_type: ObjectType,
        salt: &[u8; SALT_LEN],
        f: impl FnOnce(&dyn Cipher) -> Result<T>,
    ) -> Result<T> {
        let state = self.read_state();
        if state.salt == *salt {
            if let Some(ctx) = &state.ctx {
                let cipher = match object_type {
                    ObjectType::IntentLog => ctx.log.as_ref(),
                    ObjectType::Data => ctx.data.as_ref(),
                };
                return f(cipher);
            }

            let cipher = cipher::new_cipher(self.algorithm, &state.subkey, mac_len(object_type))?;
            return f(cipher.as_ref());
        }
        drop(state);

        let subkey = hkdf_sha256(&self.master_key, &[], salt, self.algorithm.key_len())?;
        let cipher = cipher::new_cipher(self.algorithm, &subkey, mac_len(object_type))?;
        f(cipher.as_ref())
    }
}

fn plan_block(object_type: ObjectType, src: &[u8], dst: &mut [u8]) -> Result<BlockPlan> {
    match object_type {
        ObjectType::IntentLog => plan::plan_intent_log(src, dst),
        ObjectType::Data => Ok(plan::plan_regular(src.len())),
    }
}

fn check_buffers(src: &[u8], dst: &[u8], mac: &[u8], expected_mac_len: usize) -> Result<()> {
    if src.len() != dst.len() {
        return Err(Error::BufferLengthMismatch(src.len(), dst.len()));
    }
    if mac.len() != expected_mac_len {
        return Err(Error::MacLength(expected_mac_len, mac.len()));
    }
    Ok(())
}
