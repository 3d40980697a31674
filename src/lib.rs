//! Shared helpers for the Driftbox desktop synchronization client.
//!
//! This crate carries the small pieces every Driftbox component needs:
//! platform application directories, the rules deciding which entries are
//! never synchronized, conflicted-copy naming, and the glue surfaces for the
//! shell-overlay icons and the system tray. The sync engine itself lives
//! elsewhere; nothing here moves, creates, or deletes user files.

pub mod appdirs;
pub mod conflict;
pub mod errors;
pub mod exclude;
pub mod logging;
pub mod overlay;
pub mod platform;
pub mod tray;

pub use appdirs::{APP_NAME, data_dir, home_dir, log_dir, sync_dir};
pub use conflict::conflicted_copy_path;
pub use errors::DriftboxError;
pub use exclude::is_excluded;
