use super::*;
use crate::iv::generate_iv;
use crate::layout::ObjectType;
use crate::{DATA_MAC_LEN, WRAPPING_IV_LEN};

fn wrapping_key(len: usize) -> Vec<u8> {
    (0..len as u8).collect()
}

#[test]
fn test_sentinels_cannot_build_key_state() {
    assert_eq!(
        DatasetKey::new(CryptAlgorithm::Inherit).unwrap_err(),
        Error::NotAnEncryptingAlgorithm("inherit")
    );
    assert_eq!(
        DatasetKey::new(CryptAlgorithm::Off).unwrap_err(),
        Error::NotAnEncryptingAlgorithm("off")
    );
}

#[test]
fn test_subkey_is_hkdf_of_master_and_salt() {
    for algorithm in CryptAlgorithm::encrypting_algorithms() {
        let key = DatasetKey::new(algorithm).unwrap();
        let state = key.read_state();

        let expected = hkdf_sha256(
            &key.master_key,
            &[],
            &state.salt,
            algorithm.key_len(),
        )
        .unwrap();
        assert_eq!(&state.subkey[..], &expected[..]);
    }
}

#[test]
fn test_get_salt_is_stable_until_threshold() {
    let key = DatasetKey::with_rotation_threshold(CryptAlgorithm::Aes256Gcm, 4).unwrap();

    let first = key.get_salt().unwrap();
    for _ in 0..2 {
        assert_eq!(key.get_salt().unwrap(), first);
    }

    // The fourth use hits the threshold; the salt it hands out is
    // still the old one, and the rotation happens on the way out.
    assert_eq!(key.get_salt().unwrap(), first);
    let rotated = key.get_salt().unwrap();
    assert_ne!(rotated, first);
    assert_eq!(key.salt_count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_rotation_replaces_subkey_consistently() {
    let key = DatasetKey::with_rotation_threshold(CryptAlgorithm::Aes128Gcm, 2).unwrap();
    let old_subkey = key.read_state().subkey.clone();

    key.get_salt().unwrap();
    key.get_salt().unwrap();

    let state = key.read_state();
    assert_ne!(&state.subkey[..], &old_subkey[..]);

    // The new subkey still satisfies the derivation invariant.
    let expected = hkdf_sha256(&key.master_key, &[], &state.salt, 16).unwrap();
    assert_eq!(&state.subkey[..], &expected[..]);
}

#[test]
fn test_wrap_round_trip_recovers_keys() {
    for algorithm in CryptAlgorithm::encrypting_algorithms() {
        let key = DatasetKey::new(algorithm).unwrap();
        let cwkey = wrapping_key(algorithm.key_len());

        let wrapped = key.wrap(&cwkey).unwrap();
        assert_eq!(wrapped.master.len(), algorithm.key_len());

        let unwrapped = wrapped.unwrap(&cwkey, algorithm).unwrap();
        assert_eq!(&unwrapped.master_key[..], &key.master_key[..]);
        assert_eq!(&unwrapped.hmac_key[..], &key.hmac_key[..]);
    }
}

#[test]
fn test_wrap_is_deterministic_under_fixed_iv() {
    let key = DatasetKey::new(CryptAlgorithm::Aes256Gcm).unwrap();
    let cwkey = wrapping_key(32);
    let iv: [u8; WRAPPING_IV_LEN] = [
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c,
    ];

    let a = key.wrap_with_iv(&cwkey, iv).unwrap();
    let b = key.wrap_with_iv(&cwkey, iv).unwrap();
    assert_eq!(a, b);

    // The key blob must not leak the raw keys.
    assert_ne!(&a.master[..], &key.master_key[..]);
    assert_ne!(&a.hmac[..], &key.hmac_key[..]);
}

#[test]
fn test_unwrapped_state_is_observationally_equal() {
    let key = DatasetKey::new(CryptAlgorithm::Aes256Ccm).unwrap();
    let cwkey = wrapping_key(32);
    let unwrapped = key.wrap(&cwkey).unwrap().unwrap(&cwkey, CryptAlgorithm::Aes256Ccm).unwrap();

    // A block written by the original state decrypts under the
    // unwrapped one, even though the unwrapped state starts from a
    // fresh salt of its own.
    let salt = key.get_salt().unwrap();
    let iv = generate_iv(&[0xAA; 16], 42, &salt);
    let plaintext = vec![0x5Au8; 1024];
    let mut ciphertext = vec![0u8; 1024];
    let mut mac = [0u8; DATA_MAC_LEN];
    key.encrypt_block(
        ObjectType::Data,
        &salt,
        &iv,
        &plaintext,
        &mut ciphertext,
        &mut mac,
    )
    .unwrap();

    let mut recovered = vec![0u8; 1024];
    unwrapped
        .decrypt_block(
            ObjectType::Data,
            &salt,
            &iv,
            &ciphertext,
            &mut recovered,
            &mac,
        )
        .unwrap();
    assert_eq!(recovered, plaintext);
}

#[test]
fn test_wrapping_key_length_is_checked() {
    let key = DatasetKey::new(CryptAlgorithm::Aes256Gcm).unwrap();
    assert_eq!(
        key.wrap(&wrapping_key(16)).unwrap_err(),
        Error::WrappingKeyLength(32, 16)
    );

    let wrapped = key.wrap(&wrapping_key(32)).unwrap();
    assert_eq!(
        wrapped
            .unwrap(&wrapping_key(16), CryptAlgorithm::Aes256Gcm)
            .unwrap_err(),
        Error::WrappingKeyLength(32, 16)
    );
    assert_eq!(
        wrapped
            .unwrap(&wrapping_key(32), CryptAlgorithm::Inherit)
            .unwrap_err(),
        Error::NotAnEncryptingAlgorithm("inherit")
    );
}

#[test]
fn test_unwrap_detects_tampering() {
    let key = DatasetKey::new(CryptAlgorithm::Aes256Gcm).unwrap();
    let cwkey = wrapping_key(32);
    let wrapped = key.wrap(&cwkey).unwrap();

    let mut bad_mac = wrapped.clone();
    bad_mac.mac[0] ^= 0x01;
    assert_eq!(
        bad_mac.unwrap(&cwkey, CryptAlgorithm::Aes256Gcm).unwrap_err(),
        Error::AuthenticationFailed
    );

    let mut bad_master = wrapped.clone();
    bad_master.master[0] ^= 0x01;
    assert_eq!(
        bad_master
            .unwrap(&cwkey, CryptAlgorithm::Aes256Gcm)
            .unwrap_err(),
        Error::AuthenticationFailed
    );

    // A different wrapping key must not unwrap anything.
    let mut other = cwkey.clone();
    other[0] ^= 0xFF;
    assert_eq!(
        wrapped.unwrap(&other, CryptAlgorithm::Aes256Gcm).unwrap_err(),
        Error::AuthenticationFailed
    );
}

#[test]
fn test_dedup_parameters_are_deterministic_per_key() {
    let key = DatasetKey::new(CryptAlgorithm::Aes256Gcm).unwrap();
    let data = vec![0xC3u8; 4096];

    let a = key.generate_dedup_iv_salt(&data);
    let b = key.generate_dedup_iv_salt(&data);
    assert_eq!(a, b);

    let other = DatasetKey::new(CryptAlgorithm::Aes256Gcm).unwrap();
    assert_ne!(a, other.generate_dedup_iv_salt(&data));
}
