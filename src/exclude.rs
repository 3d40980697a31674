//! Synchronization exclusion rules.
//!
//! Decides which filesystem entries are never synchronized: OS metadata
//! files, editor/Office temp files, and names ending in spaces. Only the
//! final path component is inspected; the filesystem is never consulted, so
//! the answer is the same for paths that do not exist yet.

use std::path::Path;

/// Well-known OS metadata files, matched case-insensitively.
const SYSTEM_FILES: [&str; 3] = ["desktop.ini", "thumbs.db", ".ds_store"];

/// Returns true if the given path should be excluded from synchronization.
///
/// The following entries are excluded:
/// - system files: desktop.ini, thumbs.db, .ds_store
/// - temporary files: names starting with `~$` or `.~`, and names starting
///   with `~` that end with `.tmp`
/// - files and directories whose names end with a space (unstable on some
///   filesystems)
///
/// Relative and absolute paths behave identically. A path with no final
/// component (e.g. the filesystem root) is not excluded.
pub fn is_excluded(path: &Path) -> bool {
    let Some(file_name) = path.file_name() else {
        return false;
    };
    let name = file_name.to_string_lossy().to_lowercase();

    if SYSTEM_FILES.iter().any(|s| name == *s) {
        return true;
    }
    if name.starts_with("~$") || name.starts_with(".~") {
        return true;
    }
    if name.starts_with('~') && name.ends_with(".tmp") {
        return true;
    }
    name.ends_with(' ')
}
