//! Typed error definitions for driftbox-common.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriftboxError {
    #[error("Cannot determine the user home directory")]
    HomeDirUnavailable,

    #[error("Cannot determine the user data directory")]
    DataDirUnavailable,

    #[error("Short-path conversion failed for {path}: {context}")]
    ShortPathConversion { path: PathBuf, context: String },

    #[error("Cannot check whether {path} exists")]
    ExistenceCheck {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
