//! Randomness strength and the entropy-gathering progress indicator.
//!
//! Grounded on `utils.c`'s `inform_gather_random_data` /
//! `inform_gather_random_data_done` pair, which spawns a background
//! thread that prints dots to the terminal while libgcrypt blocks
//! collecting entropy for a "very strong" random draw. The source's
//! `done` flag is a plain `int` read and written from two threads with
//! no synchronization at all — undefined behavior in C, and not a
//! pattern to carry over. Here it is an [`AtomicBool`] with
//! release/acquire ordering.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use rand_core::{CryptoRng, OsRng, RngCore};

/// How much randomness a caller is asking for, mirroring libgcrypt's
/// `GCRY_WEAK_RANDOM` / `GCRY_STRONG_RANDOM` / `GCRY_VERY_STRONG_RANDOM`
/// distinction. `OsRng` satisfies all three in this implementation —
/// the distinction is preserved so call sites document, at the type
/// level, which operations the original source reserved its strongest
/// (slowest) pool for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    /// Ephemeral, non-key material (nonces during hashing, padding).
    Weak,
    /// Per-signature nonces (`k` in ECDSA).
    Strong,
    /// Long-term private key material.
    VeryStrong,
}

/// A [`rand_core`] source tagged with the strength it was drawn at.
/// Key generation uses [`Strength::VeryStrong`] and shows a progress
/// indicator; signing uses [`Strength::Strong`] silently, matching the
/// source (only `ec_generate_key`'s call site is wrapped with
/// `inform_gather_random_data`).
pub struct EntropySource {
    strength: Strength,
}

impl EntropySource {
    pub fn new(strength: Strength) -> EntropySource {
        EntropySource { strength }
    }

    pub fn strength(&self) -> Strength {
        self.strength
    }

    /// Run `f` with a live RNG, showing a "working..." progress
    /// indicator on stderr for [`Strength::VeryStrong`] draws (key
    /// generation) only, matching the source's single call site for
    /// `inform_gather_random_data`.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut dyn RngProvider) -> T) -> T {
        match self.strength {
            Strength::VeryStrong => {
                let indicator = ProgressIndicator::start();
                let mut rng = OsRng;
                let result = f(&mut rng);
                indicator.finish();
                result
            }
            _ => {
                let mut rng = OsRng;
                f(&mut rng)
            }
        }
    }
}

/// Object-safe alias so [`EntropySource::with_rng`] can hand out a
/// trait object regardless of the concrete RNG type.
pub trait RngProvider: RngCore + CryptoRng {}
impl<T: RngCore + CryptoRng> RngProvider for T {}

/// Background "working..." dot-printer, live for the duration of a
/// slow entropy draw.
pub struct ProgressIndicator {
    done: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressIndicator {
    /// Print the banner and start the dot-printing thread.
    pub fn start() -> ProgressIndicator {
        eprintln!("Going to gather random data. It can take a few seconds.");
        eprintln!(
            "It is recommended that you perform some other work e.g. move mouse and type on keyboard."
        );
        eprint!("working");
        let done = Arc::new(AtomicBool::new(false));
        let done_thread = Arc::clone(&done);
        let handle = std::thread::spawn(move || {
            while !done_thread.load(Ordering::Acquire) {
                eprint!(".");
                std::thread::sleep(Duration::from_secs(1));
            }
        });
        ProgressIndicator {
            done,
            handle: Some(handle),
        }
    }

    /// Signal the dot-printer to stop and join it.
    pub fn finish(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.done.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        eprintln!("done");
    }
}

impl Drop for ProgressIndicator {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_and_strong_draws_skip_the_indicator() {
        let src = EntropySource::new(Strength::Strong);
        let n = src.with_rng(|rng| {
            let mut buf = [0u8; 4];
            rng.fill_bytes(&mut buf);
            buf
        });
        assert_eq!(n.len(), 4);
    }

    #[test]
    fn progress_indicator_stops_promptly() {
        let indicator = ProgressIndicator::start();
        indicator.finish();
    }
}
