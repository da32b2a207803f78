//! Command line surface.
//!
//! Grounded on the `getopt_long` table in `spg.c`: one subcommand per
//! `operation` variant, plus `-V`/`-t` style global flags re-expressed
//! as `clap` derive options.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "spg", version, about = "Small Privacy Guard")]
pub struct Cli {
    /// Print verbose progress messages.
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// Print operation timing.
    #[arg(short = 't', long, global = true)]
    pub timing: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum CliScalarMul {
    LeftToRight,
    BinaryNaf,
    #[default]
    WindowNaf,
}

impl From<CliScalarMul> for spg_core::ScalarMulMethod {
    fn from(m: CliScalarMul) -> Self {
        match m {
            CliScalarMul::LeftToRight => spg_core::ScalarMulMethod::LeftToRight,
            CliScalarMul::BinaryNaf => spg_core::ScalarMulMethod::BinaryNaf,
            CliScalarMul::WindowNaf => spg_core::ScalarMulMethod::WindowNaf,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum CliSymCipher {
    #[default]
    Blowfish,
    Aes,
}

impl From<CliSymCipher> for spg_cipher::SymCipherKind {
    fn from(c: CliSymCipher) -> Self {
        match c {
            CliSymCipher::Blowfish => spg_cipher::SymCipherKind::Blowfish,
            CliSymCipher::Aes => spg_cipher::SymCipherKind::Aes,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a new private key and write it to a file.
    GenKey {
        /// SEC 2 curve name (e.g. secp256r1). Defaults to secp160r2.
        #[arg(short, long)]
        curve: Option<String>,
        /// Where to write the private key. Defaults to `~/.spg/.spg_priv.key`.
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = CliScalarMul::WindowNaf)]
        scalar_mul: CliScalarMul,
    },
    /// Export the public key from a private key file.
    Xport {
        /// Private key file. Defaults to `~/.spg/.spg_priv.key`.
        #[arg(short, long)]
        key: Option<PathBuf>,
        /// Where to write the public key. Defaults to `~/.spg/spg_pub.key`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sign a message file with a private key.
    Sign {
        /// Private key file. Defaults to `~/.spg/.spg_priv.key`.
        #[arg(short, long)]
        key: Option<PathBuf>,
        /// Where to write the signature. Defaults to `<message>.sig`.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Message file to sign.
        message: PathBuf,
        #[arg(long, value_enum, default_value_t = CliScalarMul::WindowNaf)]
        scalar_mul: CliScalarMul,
    },
    /// Verify a message signature against a public key.
    Verify {
        /// Public key file. Defaults to `~/.spg/spg_pub.key`.
        #[arg(short, long)]
        key: Option<PathBuf>,
        /// Signature file.
        #[arg(short, long)]
        input: PathBuf,
        /// Message file the signature was made over.
        message: PathBuf,
        #[arg(long, value_enum, default_value_t = CliScalarMul::WindowNaf)]
        scalar_mul: CliScalarMul,
    },
    /// Encrypt a file for the holder of a private key.
    Encrypt {
        /// Public key of the recipient. Defaults to `~/.spg/spg_pub.key`.
        #[arg(short, long)]
        key: Option<PathBuf>,
        /// File to encrypt. Output is written as `<file>.enc`.
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = CliSymCipher::Blowfish)]
        cipher: CliSymCipher,
        #[arg(long, value_enum, default_value_t = CliScalarMul::WindowNaf)]
        scalar_mul: CliScalarMul,
    },
    /// Decrypt a file with a private key.
    Decrypt {
        /// Private key file. Defaults to `~/.spg/.spg_priv.key`.
        #[arg(short, long)]
        key: Option<PathBuf>,
        /// Where to write the recovered plaintext. Defaults to the
        /// input name with its `.enc` suffix stripped.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// File to decrypt.
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = CliScalarMul::WindowNaf)]
        scalar_mul: CliScalarMul,
    },
    /// List the supported SEC 2 curves.
    ListCurves,
    /// List the supported symmetric ciphers.
    ListSymCiphers,
}
