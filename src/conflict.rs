//! Conflicted-copy naming.
//!
//! When both sides of a sync change the same file, the losing version is
//! kept next to the winner under a new name:
//! `<name> (<user>'s conflicted copy <date>)[ <n>]<ext>`, where the counter
//! is omitted at 0 and grows until the name is free. The format is part of
//! the synchronized history and must not change.

use anyhow::{Result, anyhow};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::errors::DriftboxError;
use crate::platform;

/// Returns a path for a conflicted copy of `local` which does not currently
/// exist in the same parent directory.
///
/// The extension is everything from the FIRST dot of the base name, so
/// `sample.tar.gz` keeps `.tar.gz` intact. The file is not created here:
/// between this check and the caller's create, another process may take the
/// name. Callers needing strict uniqueness must create exclusively with the
/// returned name and retry on collision.
///
/// An I/O failure while probing existence is an error; the contract is a
/// provably free name, not a guess.
pub fn conflicted_copy_path(local: &Path) -> Result<PathBuf> {
    let user = platform::login_name();
    let date = Local::now().format("%Y-%m-%d").to_string();
    conflicted_copy_path_as(local, &user, &date)
}

/// Deterministic core of [`conflicted_copy_path`]; identity and date are
/// parameters so tests can pin them.
pub fn conflicted_copy_path_as(local: &Path, user: &str, date: &str) -> Result<PathBuf> {
    let base = local
        .file_name()
        .ok_or_else(|| anyhow!("path has no file name: {}", local.display()))?
        .to_string_lossy();
    let (name, ext) = split_first_dot(&base);
    let parent = local.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut counter: u32 = 0;
    loop {
        let candidate = parent.join(render(name, user, date, counter, ext));
        let exists = candidate
            .try_exists()
            .map_err(|source| DriftboxError::ExistenceCheck {
                path: candidate.clone(),
                source,
            })?;
        if !exists {
            return Ok(candidate);
        }
        trace!(candidate = %candidate.display(), "conflicted-copy name taken, bumping counter");
        counter += 1;
    }
}

/// Split a base name at its first dot; the extension keeps the leading dot.
/// No dot yields an empty extension; a leading dot yields an empty name.
fn split_first_dot(base: &str) -> (&str, &str) {
    match base.find('.') {
        Some(idx) => base.split_at(idx),
        None => (base, ""),
    }
}

fn render(name: &str, user: &str, date: &str, counter: u32, ext: &str) -> String {
    if counter == 0 {
        format!("{name} ({user}'s conflicted copy {date}){ext}")
    } else {
        format!("{name} ({user}'s conflicted copy {date}) {counter}{ext}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_everything_after_first_dot() {
        assert_eq!(split_first_dot("sample"), ("sample", ""));
        assert_eq!(split_first_dot("sample.ext"), ("sample", ".ext"));
        assert_eq!(split_first_dot("sample.tar.gz"), ("sample", ".tar.gz"));
        assert_eq!(split_first_dot(".env"), ("", ".env"));
    }

    #[test]
    fn counter_zero_renders_no_number() {
        assert_eq!(
            render("sample", "alice", "2026-08-24", 0, ".ext"),
            "sample (alice's conflicted copy 2026-08-24).ext"
        );
    }

    #[test]
    fn counter_goes_before_extension() {
        assert_eq!(
            render("sample", "alice", "2026-08-24", 3, ".tar.gz"),
            "sample (alice's conflicted copy 2026-08-24) 3.tar.gz"
        );
    }
}
