//! Unix implementations of platform helpers.
//! Short-path conversion and the system-folder attribute are Windows
//! peculiarities; both are passthrough/no-op here.

use std::io;
use std::path::{Path, PathBuf};

/// Login name of the current user, from the environment.
pub fn login_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_else(|_| String::from("unknown"))
}

/// No 8.3 short names on Unix; the path is returned unchanged.
pub fn short_path(path: &Path) -> anyhow::Result<PathBuf> {
    Ok(path.to_path_buf())
}

/// System-folder attributes do not exist on Unix.
pub fn mark_system_folder(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_path_is_identity() {
        let p = Path::new("/tmp/some/dir");
        assert_eq!(short_path(p).unwrap(), p);
    }

    #[test]
    fn login_name_is_nonempty() {
        assert!(!login_name().is_empty());
    }
}
