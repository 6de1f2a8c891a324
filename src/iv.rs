//! IV derivations for the four block classes.
//!
//! Every derivation truncates a SHA-256 output to 96 bits. What goes
//! into the hash differs per class, chosen so that no (subkey, IV)
//! pair can repeat for distinct plaintexts:
//!
//! * regular blocks hash the block identity and birth epoch, which
//!   are unique per live block, plus the rolling salt to cover
//!   identity reuse across pool rollbacks;
//! * intent-log blocks are born at epoch zero and stamped later, so
//!   the bookmark's sequence number stands in for the epoch;
//! * dedup blocks derive both salt and IV from an HMAC of the
//!   plaintext, which deliberately repeats for equal plaintexts;
//! * second-level cache lines hash their buffer-header fields, with
//!   no salt because the cache key never outlives the process.

#[cfg(test)]
mod iv_test;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::layout::{Bookmark, BLOCK_IDENTITY_LEN};
use crate::{IV_LEN, SALT_LEN};

type HmacSha256 = Hmac<Sha256>;

fn truncate_digest(digest: &[u8]) -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    iv.copy_from_slice(&digest[..IV_LEN]);
    iv
}

/// IV for a regular data block.
pub fn generate_iv(
    identity: &[u8; BLOCK_IDENTITY_LEN],
    birth: u64,
    salt: &[u8; SALT_LEN],
) -> [u8; IV_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(identity);
    hasher.update(birth.to_le_bytes());
    hasher.update(salt);
    truncate_digest(&hasher.finalize())
}

/// IV for an intent-log block, which has no usable birth epoch at
/// write time.
pub fn generate_intent_log_iv(
    identity: &[u8; BLOCK_IDENTITY_LEN],
    bookmark: &Bookmark,
    salt: &[u8; SALT_LEN],
) -> [u8; IV_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(identity);
    hasher.update(bookmark.to_bytes());
    hasher.update(salt);
    truncate_digest(&hasher.finalize())
}

/// IV for a second-level cache line, derived entirely from
/// cache-buffer header fields.
pub fn generate_cache_iv(
    pool: u64,
    dva: &[u8; BLOCK_IDENTITY_LEN],
    birth: u64,
    device_addr: u64,
) -> [u8; IV_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(pool.to_le_bytes());
    hasher.update(dva);
    hasher.update(birth.to_le_bytes());
    hasher.update(device_addr.to_le_bytes());
    truncate_digest(&hasher.finalize())
}

/// (salt, IV) for a dedup block: the first 20 bytes of an HMAC of the
/// plaintext. Equal plaintexts get equal parameters, and with them
/// equal ciphertexts, which is what lets dedup match them. The keyed
/// HMAC keeps the digest unrecognisable without the dataset's HMAC
/// key.
pub(crate) fn dedup_iv_salt(
    template: &HmacSha256,
    data: &[u8],
) -> ([u8; SALT_LEN], [u8; IV_LEN]) {
    let mut mac = template.clone();
    mac.update(data);
    let digest = mac.finalize().into_bytes();

    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&digest[..SALT_LEN]);
    let mut iv = [0u8; IV_LEN];
    iv.copy_from_slice(&digest[SALT_LEN..SALT_LEN + IV_LEN]);
    (salt, iv)
}
