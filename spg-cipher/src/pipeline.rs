//! Streaming file encryption and decryption.
//!
//! Grounded on `encrypt()` / `decrypt()` in `spg_ops.c`. On-disk
//! layout:
//!
//! ```text
//! +--------+--------+-------------------+------------+
//! | len(Rx)| Rx      | len(Ry) | Ry      | ciphertext | HMAC-SHA1 |
//! +--------+--------+-------------------+------------+
//! ```
//!
//! The cipher key `k1` and the HMAC key are the *same* `k1` half of
//! the ECIES-derived digest — the source initializes both
//! `sym_cipher_init` and `HMAC_Init_ex` from `enc_key.k1`, never
//! touching `k2`. `k2` exists in the derivation only as head-room for
//! a future cipher that needs a second key; this pipeline does not
//! use it, matching observed behavior exactly rather than the more
//! conventional split-key design a clean-room implementation might
//! reach for.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use hmac::{Hmac, Mac};
use sha1::Sha1;
use spg_core::{ecies, PrivateKey, PublicKey, ScalarMulMethod};
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use crate::cipher::SymCipherKind;
use crate::envelope::{decode_point, encode_point};
use crate::error::{CipherError, Result};

type HmacSha1 = Hmac<Sha1>;

/// Size of one streamed chunk, matching `SYM_CIPHER_DATA_UNIT_SIZE`.
pub const CHUNK_SIZE: usize = 1024;
/// Length of the trailing HMAC-SHA1 tag, matching `SHA1_LEN`.
pub const TAG_LEN: usize = 20;
/// Suffix appended to an encrypted file's name, matching
/// `ENCRYPTED_FILE_SUFFIX`.
pub const ENCRYPTED_SUFFIX: &str = ".enc";

/// Removes `path` on drop unless [`Guard::disarm`] was called —
/// mirrors the source's `remove(file_name)` on any failure branch of
/// `encrypt()`/`decrypt()`, but expressed as RAII instead of manual
/// cleanup at every error return.
struct Guard<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> Guard<'a> {
    fn new(path: &'a Path) -> Guard<'a> {
        Guard { path, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for Guard<'_> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = fs::remove_file(self.path) {
                debug!(path = %self.path.display(), error = %e, "cleanup of partial output file failed");
            }
        }
    }
}

/// Encrypt `input_path` for `recipient`, writing `input_path.enc`.
/// Returns the path written.
pub fn encrypt_file(
    recipient: &PublicKey,
    method: ScalarMulMethod,
    cipher: SymCipherKind,
    input_path: &Path,
) -> Result<PathBuf> {
    let mut input = File::open(input_path)?;
    let output_path = {
        let mut s = input_path.as_os_str().to_owned();
        s.push(ENCRYPTED_SUFFIX);
        PathBuf::from(s)
    };
    let mut output = File::create(&output_path)?;
    let guard = Guard::new(&output_path);

    let enc_key = ecies::generate_enc_key(recipient, method)?;
    let header = encode_point(&enc_key.r)?;
    output.write_all(&header)?;

    let mut session = cipher.open(&enc_key.k1)?;
    let mut mac =
        HmacSha1::new_from_slice(&enc_key.k1).map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let read = input.read(&mut buf)?;
        if read == 0 {
            break;
        }
        let chunk = &mut buf[..read];
        session.encrypt(chunk);
        output.write_all(chunk)?;
        mac.update(chunk);
    }

    let tag = mac.finalize().into_bytes();
    output.write_all(&tag)?;
    output.flush()?;

    guard.disarm();
    info!(path = %output_path.display(), "file encrypted");
    Ok(output_path)
}

/// Decrypt `input_path`, writing the recovered plaintext to
/// `output_path` if given, or to `input_path` with its `.enc` suffix
/// stripped otherwise.
pub fn decrypt_file(
    owner: &PrivateKey,
    method: ScalarMulMethod,
    input_path: &Path,
    output_path: Option<&Path>,
) -> Result<PathBuf> {
    let output_path = match output_path {
        Some(p) => p.to_path_buf(),
        None => {
            let name = input_path.to_string_lossy();
            match name.strip_suffix(ENCRYPTED_SUFFIX) {
                Some(stripped) => PathBuf::from(stripped),
                None => {
                    return Err(CipherError::DecryptionFailed(
                        "no output file name provided and input file has no .enc suffix".into(),
                    ))
                }
            }
        }
    };
    if input_path == output_path {
        return Err(CipherError::DecryptionFailed(
            "input file and output file have to be different".into(),
        ));
    }

    let mut input = File::open(input_path)?;
    let mut output = File::create(&output_path)?;
    let guard = Guard::new(&output_path);

    let mut header_buf = vec![0u8; 2 * (spg_core::bigint::BYTES + 1)];
    let header_read = read_at_most(&mut input, &mut header_buf)?;
    let (r, consumed) = decode_point(&header_buf[..header_read])?;
    input.seek(SeekFrom::Start(consumed as u64))?;

    let enc_key = ecies::generate_dec_key(&r, owner, method)?;

    let mut session = SymCipherKind::Blowfish.open(&enc_key.k1)?;
    let mut mac =
        HmacSha1::new_from_slice(&enc_key.k1).map_err(|e| CipherError::DecryptionFailed(e.to_string()))?;

    let file_size = input.metadata()?.len();
    let current_pos = consumed as u64;
    if file_size < current_pos + TAG_LEN as u64 {
        return Err(CipherError::DecryptionFailed(
            "file is too short to contain a valid authentication tag".into(),
        ));
    }
    let tag_pos = file_size - TAG_LEN as u64;
    let mut tag_from_file = [0u8; TAG_LEN];
    input.seek(SeekFrom::Start(tag_pos))?;
    input.read_exact(&mut tag_from_file)?;
    input.seek(SeekFrom::Start(current_pos))?;

    let mut bytes_to_decrypt = tag_pos - current_pos;
    let mut buf = [0u8; CHUNK_SIZE];
    while bytes_to_decrypt > 0 {
        let want = bytes_to_decrypt.min(CHUNK_SIZE as u64) as usize;
        let read = input.read(&mut buf[..want])?;
        if read == 0 {
            break;
        }
        let chunk = &mut buf[..read];
        mac.update(chunk);
        session.decrypt(chunk);
        output.write_all(chunk)?;
        bytes_to_decrypt -= read as u64;
    }
    output.flush()?;

    let computed_tag = mac.finalize().into_bytes();
    if computed_tag.as_slice().ct_eq(&tag_from_file).unwrap_u8() != 1 {
        return Err(CipherError::TagMismatch);
    }

    guard.disarm();
    info!(path = %output_path.display(), "file decrypted successfully");
    Ok(output_path)
}

fn read_at_most(f: &mut File, buf: &mut [u8]) -> Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        let n = f.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spg_core::PrivateKey;
    use std::io::Write as _;
    use tempfile::tempdir;

    #[test]
    fn encrypt_then_decrypt_round_trips() {
        let key = PrivateKey::generate("secp256r1", ScalarMulMethod::WindowNaf).unwrap();
        let dir = tempdir().unwrap();
        let plain_path = dir.path().join("message.txt");
        let plaintext = b"the night train leaves at nine".repeat(50);
        {
            let mut f = File::create(&plain_path).unwrap();
            f.write_all(&plaintext).unwrap();
        }

        let enc_path = encrypt_file(
            key.public_key(),
            ScalarMulMethod::WindowNaf,
            SymCipherKind::Blowfish,
            &plain_path,
        )
        .unwrap();
        assert!(enc_path.exists());

        let recovered_path = dir.path().join("recovered.txt");
        let out = decrypt_file(
            &key,
            ScalarMulMethod::WindowNaf,
            &enc_path,
            Some(&recovered_path),
        )
        .unwrap();
        let recovered = fs::read(out).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn default_output_path_strips_enc_suffix() {
        let key = PrivateKey::generate("secp192r1", ScalarMulMethod::WindowNaf).unwrap();
        let dir = tempdir().unwrap();
        let plain_path = dir.path().join("notes.txt");
        fs::write(&plain_path, b"short note").unwrap();

        let enc_path = encrypt_file(
            key.public_key(),
            ScalarMulMethod::WindowNaf,
            SymCipherKind::Blowfish,
            &plain_path,
        )
        .unwrap();

        fs::remove_file(&plain_path).unwrap();
        let out = decrypt_file(&key, ScalarMulMethod::WindowNaf, &enc_path, None).unwrap();
        assert_eq!(out, plain_path);
        assert_eq!(fs::read(out).unwrap(), b"short note");
    }

    #[test]
    fn tampered_ciphertext_fails_tag_check() {
        let key = PrivateKey::generate("secp224r1", ScalarMulMethod::WindowNaf).unwrap();
        let dir = tempdir().unwrap();
        let plain_path = dir.path().join("data.bin");
        fs::write(&plain_path, vec![0x42u8; 4096]).unwrap();

        let enc_path = encrypt_file(
            key.public_key(),
            ScalarMulMethod::WindowNaf,
            SymCipherKind::Blowfish,
            &plain_path,
        )
        .unwrap();

        let mut bytes = fs::read(&enc_path).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;
        fs::write(&enc_path, &bytes).unwrap();

        let out_path = dir.path().join("tampered_out.bin");
        let result = decrypt_file(&key, ScalarMulMethod::WindowNaf, &enc_path, Some(&out_path));
        assert!(result.is_err());
        assert!(!out_path.exists(), "partial output must be cleaned up on failure");
    }

    #[test]
    fn wrong_recipient_key_fails_to_decrypt() {
        let key = PrivateKey::generate("secp256r1", ScalarMulMethod::WindowNaf).unwrap();
        let other = PrivateKey::generate("secp256r1", ScalarMulMethod::WindowNaf).unwrap();
        let dir = tempdir().unwrap();
        let plain_path = dir.path().join("secret.txt");
        fs::write(&plain_path, b"only for the right recipient").unwrap();

        let enc_path = encrypt_file(
            key.public_key(),
            ScalarMulMethod::WindowNaf,
            SymCipherKind::Blowfish,
            &plain_path,
        )
        .unwrap();

        let out_path = dir.path().join("wrong_out.txt");
        let result = decrypt_file(&other, ScalarMulMethod::WindowNaf, &enc_path, Some(&out_path));
        assert!(result.is_err());
    }
}
