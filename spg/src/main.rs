//! Small Privacy Guard command line entry point.
//!
//! Grounded on `main()` in `spg.c`: validate `$HOME`, bootstrap the
//! `~/.spg` directory, dispatch to one operation, and report a
//! process exit code derived from the result (`status` in the
//! source).

mod cli;
mod commands;
mod error;
mod home;

use clap::Parser;

use cli::{Cli, Command};
use error::AppError;

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let start = cli.timing.then(std::time::Instant::now);
    let result = run(cli.command);
    if let Some(start) = start {
        eprintln!("Operation time: {:.6} s", start.elapsed().as_secs_f64());
    }

    match result {
        Ok(()) => {}
        Err(AppError::Aborted) => std::process::exit(0),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}

fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::GenKey {
            curve,
            output,
            scalar_mul,
        } => commands::gen_key(curve, output, scalar_mul.into()),
        Command::Xport { key, output } => commands::export_public_key(key, output),
        Command::Sign {
            key,
            output,
            message,
            scalar_mul,
        } => commands::sign(key, output, message, scalar_mul.into()),
        Command::Verify {
            key,
            input,
            message,
            scalar_mul,
        } => commands::verify(key, input, message, scalar_mul.into()),
        Command::Encrypt {
            key,
            file,
            cipher,
            scalar_mul,
        } => commands::encrypt(key, file, cipher.into(), scalar_mul.into()),
        Command::Decrypt {
            key,
            output,
            file,
            scalar_mul,
        } => commands::decrypt(key, output, file, scalar_mul.into()),
        Command::ListCurves => {
            commands::list_curves();
            Ok(())
        }
        Command::ListSymCiphers => {
            commands::list_sym_ciphers();
            Ok(())
        }
    }
}
