//! Windows implementations of platform helpers.
//!
//! Notes:
//! - Non-ASCII home paths confuse some native shell components; they are
//!   converted to their MS-DOS (8.3) short form via `cmd`.
//! - The sync dir gets FILE_ATTRIBUTE_SYSTEM so the shell treats it like
//!   other vendor sync folders (best-effort; callers log and continue).

use anyhow::{Context, Result, bail};
use std::io;
use std::os::windows::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use windows_sys::Win32::Storage::FileSystem::{
    FILE_ATTRIBUTE_SYSTEM, GetFileAttributesW, INVALID_FILE_ATTRIBUTES, SetFileAttributesW,
};

/// Login name of the current user, from the environment.
pub fn login_name() -> String {
    std::env::var("USERNAME").unwrap_or_else(|_| String::from("unknown"))
}

/// Convert a path to its fully-qualified MS-DOS (8.3) short form.
///
/// `cmd /c for %I in ("<path>") do @echo %~fsI` prints the short form of its
/// argument as a single line on stdout.
pub fn short_path(path: &Path) -> Result<PathBuf> {
    let arg = format!("for %I in (\"{}\") do @echo %~fsI", path.display());
    let out = Command::new("cmd")
        .args(["/c", &arg])
        .output()
        .with_context(|| format!("failed to run cmd to shorten {}", path.display()))?;
    if !out.status.success() {
        bail!(
            "cmd exited with {} while shortening {}",
            out.status,
            path.display()
        );
    }
    let text = String::from_utf8_lossy(&out.stdout);
    let line = text.lines().next().map(str::trim).unwrap_or_default();
    if line.is_empty() {
        bail!("cmd produced no short path for {}", path.display());
    }
    Ok(PathBuf::from(line))
}

/// Flag a directory with FILE_ATTRIBUTE_SYSTEM, preserving its other attributes.
pub fn mark_system_folder(path: &Path) -> io::Result<()> {
    let wide: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();
    // SAFETY: `wide` is a NUL-terminated UTF-16 path that outlives both calls.
    unsafe {
        let attrs = GetFileAttributesW(wide.as_ptr());
        if attrs == INVALID_FILE_ATTRIBUTES {
            return Err(io::Error::last_os_error());
        }
        if SetFileAttributesW(wide.as_ptr(), attrs | FILE_ATTRIBUTE_SYSTEM) == 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}
