//! Operation implementations, one per [`crate::cli::Command`] variant.
//!
//! Grounded on `do_operation()` in `spg.c`: each function here mirrors
//! one `case op_*:` arm, delegating the crypto to `spg-core` and
//! `spg-cipher` instead of a monolithic C translation unit.

use std::fs;
use std::path::{Path, PathBuf};

use spg_cipher::{envelope, SymCipherKind};
use spg_core::{ecdsa, PrivateKey, ScalarMulMethod};
use tracing::info;

use crate::error::{AppError, Result};
use crate::home;

fn confirm_overwrite(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    eprint!(
        "The file {} already exists. Do you want to overwrite it? [y/n] ",
        path.display()
    );
    use std::io::Write;
    std::io::stderr().flush().ok();
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    if answer.trim() != "y" {
        return Err(AppError::Aborted);
    }
    Ok(())
}

pub fn gen_key(curve: Option<String>, output: Option<PathBuf>, method: ScalarMulMethod) -> Result<()> {
    home::ensure_home_dir()?;
    let curve_name = curve.unwrap_or_else(|| spg_core::DEFAULT_CURVE.to_string());
    let output = match output {
        Some(p) => p,
        None => home::default_private_key_path()?,
    };
    confirm_overwrite(&output)?;

    let key = PrivateKey::generate(&curve_name, method)?;
    let pem = envelope::encode_private_key(&key)?;
    fs::write(&output, pem)?;
    restrict_private_key_permissions(&output)?;
    info!(path = %output.display(), curve = %curve_name, "private key generated");
    println!("Private key written to {}", output.display());
    Ok(())
}

/// Mask off group/other read-write bits on a freshly written private
/// key file, rather than leaving it at whatever the process umask left.
#[cfg(unix)]
fn restrict_private_key_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_private_key_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

pub fn export_public_key(key: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let key_path = match key {
        Some(p) => p,
        None => home::default_private_key_path()?,
    };
    let output = match output {
        Some(p) => p,
        None => home::default_public_key_path()?,
    };
    confirm_overwrite(&output)?;

    let pem = fs::read_to_string(&key_path)?;
    let private_key = envelope::decode_private_key(&pem)?;
    let pub_pem = envelope::encode_public_key(&private_key.public)?;
    fs::write(&output, pub_pem)?;
    println!("Public key written to {}", output.display());
    Ok(())
}

pub fn sign(
    key: Option<PathBuf>,
    output: Option<PathBuf>,
    message: PathBuf,
    method: ScalarMulMethod,
) -> Result<()> {
    let key_path = match key {
        Some(p) => p,
        None => home::default_private_key_path()?,
    };
    let signature_path = match output {
        Some(p) => p,
        None => {
            let mut s = message.as_os_str().to_owned();
            s.push(".sig");
            PathBuf::from(s)
        }
    };

    check_message_file_size(&message)?;
    let pem = fs::read_to_string(&key_path)?;
    let private_key = envelope::decode_private_key(&pem)?;
    let data = fs::read(&message)?;
    let sig = ecdsa::sign(&private_key, &data, method)?;
    let sig_pem = envelope::encode_signature(&sig)?;
    fs::write(&signature_path, sig_pem)?;
    println!("Signature written to {}", signature_path.display());
    Ok(())
}

/// Reject an over-size message file before reading it into memory,
/// matching `MAX_MSG_SIZE` enforced again (on the actual byte count)
/// by `ecdsa::sign`/`ecdsa::verify` themselves.
fn check_message_file_size(path: &Path) -> Result<()> {
    let len = fs::metadata(path)?.len();
    if len > spg_core::MAX_MSG_SIZE as u64 {
        return Err(AppError::Core(spg_core::SpgError::BadParams(format!(
            "message file of {len} bytes exceeds the {}-byte limit for signing",
            spg_core::MAX_MSG_SIZE
        ))));
    }
    Ok(())
}

pub fn verify(
    key: Option<PathBuf>,
    signature: PathBuf,
    message: PathBuf,
    method: ScalarMulMethod,
) -> Result<()> {
    let key_path = match key {
        Some(p) => p,
        None => home::default_public_key_path()?,
    };
    check_message_file_size(&message)?;
    let pub_pem = fs::read_to_string(&key_path)?;
    let public_key = envelope::decode_public_key(&pub_pem)?;
    let sig_pem = fs::read_to_string(&signature)?;
    let sig = envelope::decode_signature(&sig_pem)?;
    let data = fs::read(&message)?;

    match ecdsa::verify(&public_key, &sig, &data, method) {
        Ok(()) => {
            println!("Signature is valid");
            Ok(())
        }
        Err(spg_core::SpgError::SignatureInvalid) => {
            println!("Signature is NOT valid");
            Err(AppError::SignatureInvalid)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn encrypt(
    key: Option<PathBuf>,
    file: PathBuf,
    cipher: SymCipherKind,
    method: ScalarMulMethod,
) -> Result<()> {
    let key_path = match key {
        Some(p) => p,
        None => home::default_public_key_path()?,
    };
    let pub_pem = fs::read_to_string(&key_path)?;
    let public_key = envelope::decode_public_key(&pub_pem)?;
    let out = spg_cipher::encrypt_file(&public_key, method, cipher, &file)?;
    println!("File encrypted: {}", out.display());
    Ok(())
}

pub fn decrypt(
    key: Option<PathBuf>,
    output: Option<PathBuf>,
    file: PathBuf,
    method: ScalarMulMethod,
) -> Result<()> {
    let key_path = match key {
        Some(p) => p,
        None => home::default_private_key_path()?,
    };
    let pem = fs::read_to_string(&key_path)?;
    let private_key = envelope::decode_private_key(&pem)?;
    let out = spg_cipher::decrypt_file(&private_key, method, &file, output.as_deref())?;
    println!("File decrypted: {}", out.display());
    Ok(())
}

pub fn list_curves() {
    for (i, name) in spg_core::list_curves().iter().enumerate() {
        println!("{:2}. {}", i + 1, name);
    }
}

pub fn list_sym_ciphers() {
    for (i, name) in spg_cipher::CIPHER_NAMES.iter().enumerate() {
        println!("{:2}. {}", i, name);
    }
}
