#[cfg(test)]
mod hkdf_test;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

const DIGEST_LEN: usize = 32;

/// Expand iterates a single-octet block counter, which caps the
/// output at 255 digests.
pub(crate) const MAX_OUTPUT_LEN: usize = 255 * DIGEST_LEN;

/// HKDF-SHA-256 (RFC 5869), extract then expand.
///
/// An empty `salt` is permitted and behaves as a digest-length block
/// of zeros. The derived subkeys this crate produces pass the rolling
/// data salt through `info`, per the extract/expand split of the RFC.
pub(crate) fn hkdf_sha256(
    ikm: &[u8],
    salt: &[u8],
    info: &[u8],
    out_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    let prk = extract(salt, ikm)?;
    expand(&prk, info, out_len)
}

fn extract(salt: &[u8], ikm: &[u8]) -> Result<Zeroizing<[u8; DIGEST_LEN]>> {
    let mut mac = HmacSha256::new_from_slice(salt).map_err(|_| Error::CryptoFailure)?;
    mac.update(ikm);

    let mut prk = Zeroizing::new([0u8; DIGEST_LEN]);
    prk.copy_from_slice(&mac.finalize().into_bytes());
    Ok(prk)
}

fn expand(prk: &[u8; DIGEST_LEN], info: &[u8], out_len: usize) -> Result<Zeroizing<Vec<u8>>> {
    if out_len > MAX_OUTPUT_LEN {
        return Err(Error::HkdfOutputTooLong(out_len));
    }

    let mut okm = Zeroizing::new(vec![0u8; out_len]);
    let mut t = Zeroizing::new([0u8; DIGEST_LEN]);
    let mut t_len = 0;
    let mut counter = 1u8;
    let mut pos = 0;

    while pos < out_len {
        let mut mac = HmacSha256::new_from_slice(prk).map_err(|_| Error::CryptoFailure)?;
        mac.update(&t[..t_len]);
        mac.update(info);
        mac.update(&[counter]);
        t.copy_from_slice(&mac.finalize().into_bytes());
        t_len = DIGEST_LEN;

        let take = DIGEST_LEN.min(out_len - pos);
        okm[pos..pos + take].copy_from_slice(&t[..take]);
        pos += take;
        counter = counter.wrapping_add(1);
    }

    Ok(okm)
}
