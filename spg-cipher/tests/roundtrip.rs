//! End-to-end envelope + file-crypto round trips, exercising
//! `spg-cipher` the way a caller outside the crate would: generate a
//! key with `spg-core`, serialize it through the envelope codec, then
//! encrypt/decrypt a real file on disk.

use std::io::Write;

use spg_cipher::{decrypt_file, encrypt_file, envelope, SymCipherKind};
use spg_core::{PrivateKey, ScalarMulMethod};

#[test]
fn encrypt_then_decrypt_recovers_plaintext() {
    let key = PrivateKey::generate("secp256r1", ScalarMulMethod::WindowNaf).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let plaintext_path = dir.path().join("plan.txt");
    let mut f = std::fs::File::create(&plaintext_path).unwrap();
    f.write_all(b"attack at dawn").unwrap();
    drop(f);

    let ciphertext_path = encrypt_file(
        &key.public,
        ScalarMulMethod::WindowNaf,
        SymCipherKind::Blowfish,
        &plaintext_path,
    )
    .unwrap();
    assert!(ciphertext_path.exists());
    assert_ne!(
        std::fs::read(&ciphertext_path).unwrap(),
        b"attack at dawn"
    );

    std::fs::remove_file(&plaintext_path).unwrap();
    let recovered_path = decrypt_file(
        &key,
        ScalarMulMethod::WindowNaf,
        &ciphertext_path,
        None,
    )
    .unwrap();
    assert_eq!(std::fs::read(&recovered_path).unwrap(), b"attack at dawn");
}

#[test]
fn key_survives_a_pem_round_trip_before_encrypting() {
    let key = PrivateKey::generate("secp224r1", ScalarMulMethod::BinaryNaf).unwrap();
    let priv_pem = envelope::encode_private_key(&key).unwrap();
    let pub_pem = envelope::encode_public_key(&key.public).unwrap();

    let reloaded_priv = envelope::decode_private_key(&priv_pem).unwrap();
    let reloaded_pub = envelope::decode_public_key(&pub_pem).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let plaintext_path = dir.path().join("note.txt");
    std::fs::write(&plaintext_path, b"meet at the usual place").unwrap();

    let ciphertext_path = encrypt_file(
        &reloaded_pub,
        ScalarMulMethod::BinaryNaf,
        SymCipherKind::Blowfish,
        &plaintext_path,
    )
    .unwrap();
    std::fs::remove_file(&plaintext_path).unwrap();
    let recovered_path = decrypt_file(
        &reloaded_priv,
        ScalarMulMethod::BinaryNaf,
        &ciphertext_path,
        None,
    )
    .unwrap();
    assert_eq!(
        std::fs::read(&recovered_path).unwrap(),
        b"meet at the usual place"
    );
}
