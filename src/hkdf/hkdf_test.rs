use super::*;

// Test vectors from https://tools.ietf.org/html/rfc5869#appendix-A

#[test]
fn test_rfc5869_basic() {
    let ikm = [0x0b; 22];
    let salt = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c,
    ];
    let info = [0xf0, 0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8, 0xf9];
    let expected_okm = [
        0x3c, 0xb2, 0x5f, 0x25, 0xfa, 0xac, 0xd5, 0x7a, 0x90, 0x43, 0x4f, 0x64, 0xd0, 0x36,
        0x2f, 0x2a, 0x2d, 0x2d, 0x0a, 0x90, 0xcf, 0x1a, 0x5a, 0x4c, 0x5d, 0xb0, 0x2d, 0x56,
        0xec, 0xc4, 0xc5, 0xbf, 0x34, 0x00, 0x72, 0x08, 0xd5, 0xb8, 0x87, 0x18, 0x58, 0x65,
    ];

    let okm = hkdf_sha256(&ikm, &salt, &info, expected_okm.len()).unwrap();
    assert_eq!(&okm[..], &expected_okm[..]);
}

#[test]
fn test_rfc5869_extract() {
    let ikm = [0x0b; 22];
    let salt = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c,
    ];
    let expected_prk = [
        0x07, 0x77, 0x09, 0x36, 0x2c, 0x2e, 0x32, 0xdf, 0x0d, 0xdc, 0x3f, 0x0d, 0xc4, 0x7b,
        0xba, 0x63, 0x90, 0xb6, 0xc7, 0x3b, 0xb5, 0x0f, 0x9c, 0x31, 0x22, 0xec, 0x84, 0x4a,
        0xd7, 0xc2, 0xb3, 0xe5,
    ];

    let prk = extract(&salt, &ikm).unwrap();
    assert_eq!(&prk[..], &expected_prk[..]);
}

#[test]
fn test_rfc5869_empty_salt_and_info() {
    let ikm = [0x0b; 22];
    let expected_okm = [
        0x8d, 0xa4, 0xe7, 0x75, 0xa5, 0x63, 0xc1, 0x8f, 0x71, 0x5f, 0x80, 0x2a, 0x06, 0x3c,
        0x5a, 0x31, 0xb8, 0xa1, 0x1f, 0x5c, 0x5e, 0xe1, 0x87, 0x9e, 0xc3, 0x45, 0x4e, 0x5f,
        0x3c, 0x73, 0x8d, 0x2d, 0x9d, 0x20, 0x13, 0x95, 0xfa, 0xa4, 0xb6, 0x1a, 0x96, 0xc8,
    ];

    let okm = hkdf_sha256(&ikm, &[], &[], expected_okm.len()).unwrap();
    assert_eq!(&okm[..], &expected_okm[..]);
}

#[test]
fn test_output_length_limit() {
    let okm = hkdf_sha256(&[0xab; 32], &[], &[0x01], MAX_OUTPUT_LEN).unwrap();
    assert_eq!(okm.len(), MAX_OUTPUT_LEN);

    assert_eq!(
        hkdf_sha256(&[0xab; 32], &[], &[0x01], MAX_OUTPUT_LEN + 1).unwrap_err(),
        Error::HkdfOutputTooLong(MAX_OUTPUT_LEN + 1)
    );
}

#[test]
fn test_deterministic() {
    let a = hkdf_sha256(&[0x11; 32], &[], &[0x22; 8], 32).unwrap();
    let b = hkdf_sha256(&[0x11; 32], &[], &[0x22; 8], 32).unwrap();
    assert_eq!(&a[..], &b[..]);

    // A different info string must change the output.
    let c = hkdf_sha256(&[0x11; 32], &[], &[0x23; 8], 32).unwrap();
    assert_ne!(&a[..], &c[..]);
}
