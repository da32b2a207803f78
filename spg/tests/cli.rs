//! End-to-end CLI smoke tests, driving the built binary the way a user
//! would from a shell rather than calling `commands::*` in-process.

use std::process::Command;

fn spg() -> Command {
    Command::new(env!("CARGO_BIN_EXE_spg"))
}

fn run(cmd: &mut Command) -> String {
    let output = cmd.output().expect("failed to run spg");
    assert!(
        output.status.success(),
        "spg exited with {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn gen_key_xport_sign_verify_round_trip() {
    let home = tempfile::tempdir().unwrap();
    let priv_key = home.path().join("id.priv");
    let pub_key = home.path().join("id.pub");
    let message = home.path().join("message.txt");
    let signature = home.path().join("message.txt.sig");
    std::fs::write(&message, b"the quick brown fox").unwrap();

    run(spg()
        .env("HOME", home.path())
        .args(["gen-key", "--curve", "secp224r1", "--output"])
        .arg(&priv_key));
    assert!(priv_key.exists());

    run(spg()
        .env("HOME", home.path())
        .args(["xport", "--key"])
        .arg(&priv_key)
        .arg("--output")
        .arg(&pub_key));
    assert!(pub_key.exists());

    run(spg()
        .env("HOME", home.path())
        .args(["sign", "--key"])
        .arg(&priv_key)
        .arg(&message));
    assert!(signature.exists());

    let out = run(spg()
        .env("HOME", home.path())
        .args(["verify", "--key"])
        .arg(&pub_key)
        .arg("--input")
        .arg(&signature)
        .arg(&message));
    assert!(out.contains("Signature is valid"));
}

#[test]
fn tampered_message_fails_verification() {
    let home = tempfile::tempdir().unwrap();
    let priv_key = home.path().join("id.priv");
    let pub_key = home.path().join("id.pub");
    let message = home.path().join("message.txt");
    let signature = home.path().join("message.txt.sig");
    std::fs::write(&message, b"original contents").unwrap();

    run(spg()
        .env("HOME", home.path())
        .args(["gen-key", "--output"])
        .arg(&priv_key));
    run(spg()
        .env("HOME", home.path())
        .args(["xport", "--key"])
        .arg(&priv_key)
        .arg("--output")
        .arg(&pub_key));
    run(spg()
        .env("HOME", home.path())
        .args(["sign", "--key"])
        .arg(&priv_key)
        .arg(&message));

    std::fs::write(&message, b"tampered contents").unwrap();

    let status = spg()
        .env("HOME", home.path())
        .args(["verify", "--key"])
        .arg(&pub_key)
        .arg("--input")
        .arg(&signature)
        .arg(&message)
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn encrypt_decrypt_round_trip() {
    let home = tempfile::tempdir().unwrap();
    let priv_key = home.path().join("id.priv");
    let pub_key = home.path().join("id.pub");
    let plaintext = home.path().join("secret.txt");
    let ciphertext = home.path().join("secret.txt.enc");
    let recovered = home.path().join("secret.txt");
    std::fs::write(&plaintext, b"for your eyes only").unwrap();

    run(spg()
        .env("HOME", home.path())
        .args(["gen-key", "--curve", "secp256r1", "--output"])
        .arg(&priv_key));
    run(spg()
        .env("HOME", home.path())
        .args(["xport", "--key"])
        .arg(&priv_key)
        .arg("--output")
        .arg(&pub_key));

    run(spg()
        .env("HOME", home.path())
        .args(["encrypt", "--key"])
        .arg(&pub_key)
        .arg(&plaintext));
    assert!(ciphertext.exists());

    std::fs::remove_file(&plaintext).unwrap();
    run(spg()
        .env("HOME", home.path())
        .args(["decrypt", "--key"])
        .arg(&priv_key)
        .arg(&ciphertext));
    assert_eq!(std::fs::read(&recovered).unwrap(), b"for your eyes only");
}

#[test]
fn list_curves_includes_default() {
    let home = tempfile::tempdir().unwrap();
    let out = run(spg().env("HOME", home.path()).arg("list-curves"));
    assert!(out.contains("secp160r2"));
}

#[test]
fn list_sym_ciphers_includes_blowfish() {
    let home = tempfile::tempdir().unwrap();
    let out = run(spg().env("HOME", home.path()).arg("list-sym-ciphers"));
    assert!(out.contains("Blowfish"));
}
