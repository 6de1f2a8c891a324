
use std::fmt;

use crate::error::{Error, Result};

/// AEAD family backing a catalog entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CipherFamily {
    /// Sentinel entries that select no cipher at all.
    None,
    Ccm,
    Gcm,
}

/// One entry of the fixed algorithm catalog.
///
/// The discriminants are written to disk as part of the block format
/// and must never be reordered or reused. The first three entries are
/// the "inherit" / "on" / "off" property sentinels the surrounding
/// layer stores; `On` encrypts as AES-256-CCM wherever a concrete
/// cipher is needed, while `Inherit` and `Off` never reach the data
/// path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CryptAlgorithm {
    Inherit = 0,
    On = 1,
    Off = 2,
    Aes128Ccm = 3,
    Aes192Ccm = 4,
    Aes256Ccm = 5,
    Aes128Gcm = 6,
    Aes192Gcm = 7,
    Aes256Gcm = 8,
}

impl CryptAlgorithm {
    /// Looks up a catalog entry by its on-disk id.
    pub fn from_id(id: u8) -> Result<CryptAlgorithm> {
        match id {
            0 => Ok(CryptAlgorithm::Inherit),
            1 => Ok(CryptAlgorithm::On),
            2 => Ok(CryptAlgorithm::Off),
            3 => Ok(CryptAlgorithm::Aes128Ccm),
            4 => Ok(CryptAlgorithm::Aes192Ccm),
            5 => Ok(CryptAlgorithm::Aes256Ccm),
            6 => Ok(CryptAlgorithm::Aes128Gcm),
            7 => Ok(CryptAlgorithm::Aes192Gcm),
            8 => Ok(CryptAlgorithm::Aes256Gcm),
            id => Err(Error::UnknownAlgorithm(id)),
        }
    }

    /// The on-disk id of this entry.
    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn family(&self) -> CipherFamily {
        match self {
            CryptAlgorithm::Inherit | CryptAlgorithm::Off => CipherFamily::None,
            CryptAlgorithm::On
            | CryptAlgorithm::Aes128Ccm
            | CryptAlgorithm::Aes192Ccm
            | CryptAlgorithm::Aes256Ccm => CipherFamily::Ccm,
            CryptAlgorithm::Aes128Gcm
            | CryptAlgorithm::Aes192Gcm
            | CryptAlgorithm::Aes256Gcm => CipherFamily::Gcm,
        }
    }

    /// Key length in bytes; zero for the sentinel entries.
    pub fn key_len(&self) -> usize {
        match self {
            CryptAlgorithm::Inherit | CryptAlgorithm::Off => 0,
            CryptAlgorithm::Aes128Ccm | CryptAlgorithm::Aes128Gcm => 16,
            CryptAlgorithm::Aes192Ccm | CryptAlgorithm::Aes192Gcm => 24,
            CryptAlgorithm::On | CryptAlgorithm::Aes256Ccm | CryptAlgorithm::Aes256Gcm => 32,
        }
    }

    /// Whether this entry selects a real cipher. Key state cannot be
    /// built over a sentinel.
    pub fn is_encrypting(&self) -> bool {
        self.family() != CipherFamily::None
    }

    pub fn name(&self) -> &'static str {
        match self {
            CryptAlgorithm::Inherit => "inherit",
            CryptAlgorithm::On => "on",
            CryptAlgorithm::Off => "off",
            CryptAlgorithm::Aes128Ccm => "aes-128-ccm",
            CryptAlgorithm::Aes192Ccm => "aes-192-ccm",
            CryptAlgorithm::Aes256Ccm => "aes-256-ccm",
            CryptAlgorithm::Aes128Gcm => "aes-128-gcm",
            CryptAlgorithm::Aes192Gcm => "aes-192-gcm",
            CryptAlgorithm::Aes256Gcm => "aes-256-gcm",
        }
    }

    /// All catalog entries that select a real cipher, in id order.
    pub fn encrypting_algorithms() -> impl Iterator<Item = CryptAlgorithm> {
        [
            CryptAlgorithm::On,
            CryptAlgorithm::Aes128Ccm,
            CryptAlgorithm::Aes192Ccm,
            CryptAlgorithm::Aes256Ccm,
            CryptAlgorithm::Aes128Gcm,
            CryptAlgorithm::Aes192Gcm,
            CryptAlgorithm::Aes256Gcm,
        ]
        .into_iter()
    }
}

impl fmt::Display for CryptAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
