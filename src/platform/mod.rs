//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the crate can remain platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{login_name, mark_system_folder, short_path};
#[cfg(not(unix))]
pub use windows::{login_name, mark_system_folder, short_path};
