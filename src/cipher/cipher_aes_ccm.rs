use aes::{Aes128, Aes192, Aes256};
use ccm::consts::{U12, U16, U8};
use ccm::Ccm;

use super::{AeadCipher, Cipher};
use crate::error::{Error, Result};
use crate::{DATA_MAC_LEN, ZIL_MAC_LEN};

/// AES-CCM with the requested key and tag size, over the same 96-bit
/// nonce the GCM family uses.
pub(crate) fn new_cipher_aes_ccm(key: &[u8], tag_len: usize) -> Result<Box<dyn Cipher>> {
    let cipher: Box<dyn Cipher> = match (key.len(), tag_len) {
        (16, DATA_MAC_LEN) => Box::new(AeadCipher::<Ccm<Aes128, U16, U12>>::new(key, tag_len)?),
        (24, DATA_MAC_LEN) => Box::new(AeadCipher::<Ccm<Aes192, U16, U12>>::new(key, tag_len)?),
        (32, DATA_MAC_LEN) => Box::new(AeadCipher::<Ccm<Aes256, U16, U12>>::new(key, tag_len)?),
        (16, ZIL_MAC_LEN) => Box::new(AeadCipher::<Ccm<Aes128, U8, U12>>::new(key, tag_len)?),
        (24, ZIL_MAC_LEN) => Box::new(AeadCipher::<Ccm<Aes192, U8, U12>>::new(key, tag_len)?),
        (32, ZIL_MAC_LEN) => Box::new(AeadCipher::<Ccm<Aes256, U8, U12>>::new(key, tag_len)?),
        _ => return Err(Error::CryptoFailure),
    };

    Ok(cipher)
}
