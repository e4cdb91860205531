// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AES-GCM with 16-byte IVs

use flow_endpoint_node::crypto::{
    decrypt_aes_gcm, encrypt_aes_gcm, AesKey, AesKeySize, CryptoError, InitialVector,
    GCM_TAG_LEN,
};

#[test]
fn test_ciphertext_is_plaintext_plus_tag() {
    for size in [AesKeySize::Aes128, AesKeySize::Aes256] {
        let key = AesKey::generate(size);
        let iv = InitialVector::generate();
        let plaintext = br#"{"screen":"SCHEDULE"}"#;

        let sealed = encrypt_aes_gcm(&key, &iv, plaintext).unwrap();
        assert_eq!(sealed.len(), plaintext.len() + GCM_TAG_LEN);

        let opened = decrypt_aes_gcm(&key, &iv, &sealed).unwrap();
        assert_eq!(opened, plaintext);
    }
}

#[test]
fn test_every_bit_flip_is_detected() {
    let key = AesKey::generate(AesKeySize::Aes128);
    let iv = InitialVector::generate();
    let sealed = encrypt_aes_gcm(&key, &iv, b"appointment").unwrap();

    for byte in 0..sealed.len() {
        for bit in 0..8 {
            let mut tampered = sealed.clone();
            tampered[byte] ^= 1 << bit;
            let result = decrypt_aes_gcm(&key, &iv, &tampered);
            assert!(
                matches!(result, Err(CryptoError::PayloadDecryption { .. })),
                "flip at byte {} bit {} was not detected",
                byte,
                bit
            );
        }
    }
}

#[test]
fn test_flipped_iv_does_not_open_request_ciphertext() {
    let key = AesKey::generate(AesKeySize::Aes256);
    let iv = InitialVector::generate();
    let sealed = encrypt_aes_gcm(&key, &iv, b"request").unwrap();

    assert!(decrypt_aes_gcm(&key, &iv.flipped(), &sealed).is_err());
    assert_eq!(iv.flipped().flipped(), iv);
}

#[test]
fn test_truncated_ciphertext_rejected() {
    let key = AesKey::generate(AesKeySize::Aes128);
    let iv = InitialVector::generate();

    let err = decrypt_aes_gcm(&key, &iv, &[0u8; GCM_TAG_LEN - 1]).unwrap_err();
    assert!(matches!(err, CryptoError::PayloadDecryption { .. }));
}

#[test]
fn test_empty_plaintext() {
    let key = AesKey::generate(AesKeySize::Aes128);
    let iv = InitialVector::generate();

    let sealed = encrypt_aes_gcm(&key, &iv, b"").unwrap();
    assert_eq!(sealed.len(), GCM_TAG_LEN);
    assert!(decrypt_aes_gcm(&key, &iv, &sealed).unwrap().is_empty());
}
