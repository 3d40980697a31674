//! System tray presentation.
//!
//! The native tray library sits behind [`TrayBackend`]; this module keeps
//! the status state and the menu actions ("open the sync folder", "quit")
//! so application code never talks to the native API directly. With no
//! backend (headless sessions, unsupported desktops) every operation is a
//! quiet no-op.

use anyhow::Result;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use crate::appdirs;

/// Tray icon states, mirrored in the icon image and tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrayStatus {
    #[default]
    Idle,
    Synchronizing,
}

impl TrayStatus {
    /// Tooltip text shown next to the tray icon.
    pub fn tooltip(self) -> &'static str {
        match self {
            TrayStatus::Idle => "Idle",
            TrayStatus::Synchronizing => "Synchronizing",
        }
    }
}

/// Native tray implementation surface.
pub trait TrayBackend: Send {
    /// Switch the icon image, status line and tooltip.
    fn show_status(&mut self, status: TrayStatus);
    /// Open a directory in the OS file manager.
    fn browse(&mut self, dir: &Path);
    /// Remove the tray icon.
    fn shutdown(&mut self) {}
}

struct Inner {
    backend: Option<Box<dyn TrayBackend>>,
    on_quit: Option<Box<dyn FnOnce() + Send>>,
    status: TrayStatus,
}

/// Idle/synchronizing presenter over an optional native tray backend.
pub struct SystemTrayPresenter {
    inner: Mutex<Inner>,
}

impl SystemTrayPresenter {
    pub fn new(backend: Box<dyn TrayBackend>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                backend: Some(backend),
                on_quit: None,
                status: TrayStatus::Idle,
            }),
        }
    }

    /// Presenter without a native tray; all operations become no-ops.
    pub fn disabled() -> Self {
        Self {
            inner: Mutex::new(Inner {
                backend: None,
                on_quit: None,
                status: TrayStatus::Idle,
            }),
        }
    }

    /// Show the idle icon and tooltip.
    pub fn set_idle(&self) {
        self.set_status(TrayStatus::Idle);
    }

    /// Show the synchronizing icon and tooltip.
    pub fn set_synchronizing(&self) {
        self.set_status(TrayStatus::Synchronizing);
    }

    /// Currently displayed status.
    pub fn status(&self) -> TrayStatus {
        self.lock().status
    }

    /// Register the callback run when the user picks "Quit" from the menu.
    /// Without one, quitting only removes the tray icon.
    pub fn on_quit(&self, callback: impl FnOnce() + Send + 'static) {
        self.lock().on_quit = Some(Box::new(callback));
    }

    /// Menu action: open the synchronized folder in the OS file manager.
    pub fn open_sync_folder(&self) -> Result<()> {
        let dir = appdirs::sync_dir()?;
        let mut inner = self.lock();
        if let Some(backend) = inner.backend.as_mut() {
            backend.browse(&dir);
        } else {
            debug!(dir = %dir.display(), "no tray backend, not opening folder");
        }
        Ok(())
    }

    /// Menu action: tear down the tray and hand control to the registered
    /// quit callback (at most once).
    pub fn quit(&self) {
        let (backend, on_quit) = {
            let mut inner = self.lock();
            (inner.backend.take(), inner.on_quit.take())
        };
        if let Some(mut backend) = backend {
            backend.shutdown();
        }
        match on_quit {
            Some(callback) => callback(),
            None => warn!("quit requested but no shutdown callback is registered"),
        }
    }

    fn set_status(&self, status: TrayStatus) {
        let mut inner = self.lock();
        inner.status = status;
        if let Some(backend) = inner.backend.as_mut() {
            backend.show_status(status);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Recorder {
        statuses: Arc<Mutex<Vec<TrayStatus>>>,
        browsed: Arc<Mutex<Vec<std::path::PathBuf>>>,
        shutdowns: Arc<AtomicUsize>,
    }

    impl TrayBackend for Recorder {
        fn show_status(&mut self, status: TrayStatus) {
            self.statuses.lock().unwrap().push(status);
        }
        fn browse(&mut self, dir: &Path) {
            self.browsed.lock().unwrap().push(dir.to_path_buf());
        }
        fn shutdown(&mut self) {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn status_changes_reach_the_backend() {
        let backend = Recorder::default();
        let statuses = Arc::clone(&backend.statuses);
        let tray = SystemTrayPresenter::new(Box::new(backend));

        tray.set_synchronizing();
        tray.set_idle();

        assert_eq!(tray.status(), TrayStatus::Idle);
        assert_eq!(
            *statuses.lock().unwrap(),
            vec![TrayStatus::Synchronizing, TrayStatus::Idle]
        );
    }

    #[test]
    fn quit_tears_down_backend_then_runs_callback_once() {
        let backend = Recorder::default();
        let shutdowns = Arc::clone(&backend.shutdowns);
        let tray = SystemTrayPresenter::new(Box::new(backend));

        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = Arc::clone(&calls);
        tray.on_quit(move || {
            calls2.fetch_add(1, Ordering::SeqCst);
        });

        tray.quit();
        tray.quit(); // second quit is inert

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disabled_presenter_is_inert() {
        let tray = SystemTrayPresenter::disabled();
        tray.set_synchronizing();
        assert_eq!(tray.status(), TrayStatus::Synchronizing);
        tray.quit();
    }

    #[test]
    fn tooltips_match_the_shipped_strings() {
        assert_eq!(TrayStatus::Idle.tooltip(), "Idle");
        assert_eq!(TrayStatus::Synchronizing.tooltip(), "Synchronizing");
    }
}
