use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Error, Result};

/// Fills `buf` from the kernel entropy source. Used for long-lived
/// secrets: master keys, HMAC keys, data salts.
pub(crate) fn crypto_bytes(buf: &mut [u8]) -> Result<()> {
    OsRng.try_fill_bytes(buf).map_err(|_| Error::RngFailure)
}

/// Fills `buf` from the thread-local generator. Sufficient for values
/// that only need uniqueness, not secrecy across reboots: wrap IVs
/// and ephemeral cache keys.
pub(crate) fn pseudo_bytes(buf: &mut [u8]) -> Result<()> {
    rand::thread_rng()
        .try_fill_bytes(buf)
        .map_err(|_| Error::RngFailure)
}
