//! `$HOME/.spg` bootstrap and default key paths.
//!
//! Grounded on `create_key_path` / `check_home_dir` / `create_home_dir`
//! in `spg.c`.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

pub const SPG_DIR_NAME: &str = ".spg";
const DEFAULT_PRIVATE_KEY_FILE: &str = ".spg_priv.key";
const DEFAULT_PUBLIC_KEY_FILE: &str = "spg_pub.key";

/// `$HOME` validated to a sane, boring length (the source rejects
/// anything over 230 characters so its fixed 256-byte path buffers
/// never overflow; a `PathBuf` has no such limit, but an absurdly long
/// `$HOME` is still almost certainly a misconfiguration worth
/// flagging rather than silently accepting).
pub fn home_dir() -> io::Result<PathBuf> {
    let home = env::var_os("HOME").ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "HOME environment variable is not set")
    })?;
    if home.len() > 230 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "HOME environment variable is too long",
        ));
    }
    Ok(PathBuf::from(home))
}

pub fn spg_dir() -> io::Result<PathBuf> {
    Ok(home_dir()?.join(SPG_DIR_NAME))
}

pub fn default_private_key_path() -> io::Result<PathBuf> {
    Ok(spg_dir()?.join(DEFAULT_PRIVATE_KEY_FILE))
}

pub fn default_public_key_path() -> io::Result<PathBuf> {
    Ok(spg_dir()?.join(DEFAULT_PUBLIC_KEY_FILE))
}

/// Ensure `~/.spg` exists, creating it (owner-only permissions) if
/// this is the first run.
pub fn ensure_home_dir() -> io::Result<()> {
    let dir = spg_dir()?;
    if dir.is_dir() {
        return Ok(());
    }
    tracing::info!(path = %dir.display(), "creating SPG home directory");
    fs::create_dir(&dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}
