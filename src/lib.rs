#![warn(rust_2018_idioms)]

//! Per-block authenticated encryption for an encrypted copy-on-write
//! storage pool.
//!
//! The storage stack hands this crate a logical block of plaintext
//! together with the metadata that will be persisted alongside it (a
//! block identity, a birth epoch, an intent-log bookmark). The crate
//! produces a same-length ciphertext, an authentication tag and the
//! encryption parameters (salt, IV) the block pointer stores, and can
//! later recover the plaintext exactly or reject a tampered block.
//!
//! Block data is never encrypted under the dataset's master key
//! directly. A rolling 8-byte salt is fed through HKDF-SHA-256 to
//! derive the working subkey, and the salt is rotated after a bounded
//! number of uses so no single AEAD key ever exceeds its safe reuse
//! bound. See [`DatasetKey`] for the lifecycle.

pub mod algorithm;
pub mod cache;
mod cipher;
mod error;
mod hkdf;
pub mod iv;
pub mod key;
pub mod layout;
mod plan;
mod rng;

pub use algorithm::{CipherFamily, CryptAlgorithm};
pub use cache::CacheKey;
pub use error::{Error, Result};
pub use key::{DatasetKey, WrappedKey};

/// Length of the rolling data salt, as persisted in the block
/// pointer's fill field.
pub const SALT_LEN: usize = 8;

/// All supported AEAD modes run with a 96-bit IV.
pub const IV_LEN: usize = 12;

/// Authentication tag length for regular data blocks, stored in the
/// first half of the block pointer's checksum field.
pub const DATA_MAC_LEN: usize = 16;

/// Authentication tag length for intent-log blocks. The log chain
/// header only has eight spare bytes for it.
pub const ZIL_MAC_LEN: usize = 8;

/// Length of the dedup/HMAC key held next to the master key.
pub const HMAC_KEY_LEN: usize = 32;

/// IV length used when wrapping the master and HMAC keys.
pub const WRAPPING_IV_LEN: usize = 12;

/// Tag length used when wrapping the master and HMAC keys.
pub const WRAPPING_MAC_LEN: usize = 16;

/// How many blocks may consume one (salt, subkey) pair before the
/// salt is rotated.
///
/// NIST SP 800-38D limits the number of invocations of GCM with a
/// single key to 2^32; CCM carries a comparable bound. Rotating the
/// salt well before that point keeps every derived subkey far away
/// from the limit while still amortising the HKDF over hundreds of
/// millions of blocks.
pub const MAX_SALT_USES: u64 = 400_000_000;
