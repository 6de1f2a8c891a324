use super::*;

#[test]
fn test_regular_iv_is_truncated_sha256() {
    let identity = [0x11u8; BLOCK_IDENTITY_LEN];
    let salt = [0x22u8; SALT_LEN];

    let mut hasher = Sha256::new();
    hasher.update(identity);
    hasher.update(77u64.to_le_bytes());
    hasher.update(salt);
    let digest = hasher.finalize();

    assert_eq!(&generate_iv(&identity, 77, &salt)[..], &digest[..IV_LEN]);
}

#[test]
fn test_regular_iv_sensitivity() {
    let identity = [0x11u8; BLOCK_IDENTITY_LEN];
    let salt = [0x22u8; SALT_LEN];
    let base = generate_iv(&identity, 1, &salt);

    assert_eq!(base, generate_iv(&identity, 1, &salt));
    assert_ne!(base, generate_iv(&identity, 2, &salt));
    assert_ne!(base, generate_iv(&[0x12u8; BLOCK_IDENTITY_LEN], 1, &salt));
    assert_ne!(base, generate_iv(&identity, 1, &[0x23u8; SALT_LEN]));
}

#[test]
fn test_intent_log_iv_uses_bookmark() {
    let identity = [0x33u8; BLOCK_IDENTITY_LEN];
    let salt = [0x44u8; SALT_LEN];
    let zb = Bookmark {
        objset: 1,
        object: 2,
        level: 0,
        blkid: 3,
    };

    let base = generate_intent_log_iv(&identity, &zb, &salt);
    assert_eq!(base, generate_intent_log_iv(&identity, &zb, &salt));

    let other = Bookmark { blkid: 4, ..zb };
    assert_ne!(base, generate_intent_log_iv(&identity, &other, &salt));

    // A log block is born at epoch 0; its IV must not collide with a
    // regular block of the same identity.
    assert_ne!(base, generate_iv(&identity, 0, &salt));
}

#[test]
fn test_cache_iv_sensitivity() {
    let dva = [0x55u8; BLOCK_IDENTITY_LEN];
    let base = generate_cache_iv(1, &dva, 2, 3);

    assert_eq!(base, generate_cache_iv(1, &dva, 2, 3));
    assert_ne!(base, generate_cache_iv(9, &dva, 2, 3));
    assert_ne!(base, generate_cache_iv(1, &dva, 9, 3));
    assert_ne!(base, generate_cache_iv(1, &dva, 2, 9));
    assert_ne!(base, generate_cache_iv(1, &[0u8; BLOCK_IDENTITY_LEN], 2, 3));
}

#[test]
fn test_dedup_splits_hmac_digest() {
    let template = HmacSha256::new_from_slice(&[0x77u8; 32]).unwrap();
    let data = [0xA5u8; 4096];

    let (salt, iv) = dedup_iv_salt(&template, &data);

    let mut mac = template.clone();
    mac.update(&data);
    let digest = mac.finalize().into_bytes();
    assert_eq!(&salt[..], &digest[..SALT_LEN]);
    assert_eq!(&iv[..], &digest[SALT_LEN..SALT_LEN + IV_LEN]);
}

#[test]
fn test_dedup_is_keyed() {
    let data = [0x0Fu8; 512];
    let a = dedup_iv_salt(&HmacSha256::new_from_slice(&[0x01u8; 32]).unwrap(), &data);
    let b = dedup_iv_salt(&HmacSha256::new_from_slice(&[0x02u8; 32]).unwrap(), &data);
    assert_ne!(a, b);
}
