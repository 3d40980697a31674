//! Application directory resolution for the Driftbox client.
//! Thin wrappers over the `dirs` crate plus the Windows short-path
//! workaround for non-ASCII home directories.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::debug;

use crate::errors::DriftboxError;
use crate::platform;

/// Product name; also the name of the synchronized folder under the home dir.
pub const APP_NAME: &str = "Driftbox";

static HOME_DIR: OnceLock<PathBuf> = OnceLock::new();

/// The current user's home directory.
///
/// On Windows a home path containing non-ASCII characters is converted to
/// its MS-DOS short form; native shell components choke on such paths. The
/// conversion runs an external command, so the result is computed once per
/// process and shared by concurrent readers. On Unix the lookup is plain.
pub fn home_dir() -> Result<PathBuf> {
    if let Some(cached) = HOME_DIR.get() {
        return Ok(cached.clone());
    }

    let raw = dirs::home_dir().ok_or(DriftboxError::HomeDirUnavailable)?;
    let resolved = if cfg!(windows) && !raw.as_os_str().to_string_lossy().is_ascii() {
        let short = platform::short_path(&raw)
            .with_context(|| format!("cannot determine user home dir from {}", raw.display()))?;
        debug!(original = %raw.display(), short = %short.display(), "using short form of home dir");
        short
    } else {
        raw
    };
    // Strip Windows UNC verbosity; a no-op elsewhere.
    let resolved = dunce::simplified(&resolved).to_path_buf();

    Ok(HOME_DIR.get_or_init(|| resolved).clone())
}

/// OS-appropriate per-user data directory for the app.
pub fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().ok_or(DriftboxError::DataDirUnavailable)?;
    Ok(base.join(APP_NAME))
}

/// The synchronized folder itself: `<home>/Driftbox`.
pub fn sync_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(APP_NAME))
}

/// Directory for log files: the OS state dir when it has one, data dir otherwise.
pub fn log_dir() -> Result<PathBuf> {
    let base = dirs::state_dir()
        .or_else(dirs::data_dir)
        .ok_or(DriftboxError::DataDirUnavailable)?;
    Ok(base.join(APP_NAME).join("logs"))
}
