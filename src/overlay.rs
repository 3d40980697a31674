//! Shell-overlay icon bridge.
//!
//! The sync-engine side of the OS file-badge integration. The native shell
//! transport sits behind [`ShellIconControl`] so this crate carries the
//! queueing and state logic without binding to a particular shell extension.
//!
//! A background worker first connects to the native side, retrying every
//! 30 seconds (most often the port is still held by a previous run of the
//! app), then drains refresh requests one batch at a time so the shell never
//! sees concurrent refresh calls.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, warn};
use walkdir::WalkDir;

use anyhow::{Context, Result};

use crate::platform;

/// Backoff between connection attempts to the native service.
pub const RECONNECT_BACKOFF: Duration = Duration::from_secs(30);

/// Badge states shown by the shell, ordered by "activity" so a directory can
/// display the most active state found in its subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum OverlayIcon {
    #[default]
    None,
    Ok,
    Syncing,
}

impl OverlayIcon {
    /// Stable id used for native icon registration.
    pub fn id(self) -> i32 {
        match self {
            OverlayIcon::None => 0,
            OverlayIcon::Ok => 1,
            OverlayIcon::Syncing => 2,
        }
    }
}

/// Per-file badge state, supplied by the sync engine.
pub trait IconProvider: Send + Sync + 'static {
    fn icon_for(&self, path: &Path) -> OverlayIcon;
}

/// Native shell transport: connection lifecycle plus batched badge refresh.
pub trait ShellIconControl: Send + 'static {
    /// Try to connect to the native service; false means "retry later".
    fn connect(&mut self) -> bool;
    /// Ask the shell to re-query badges for the given paths.
    fn refresh_icons(&mut self, paths: &[PathBuf]);
    /// Tear down the native connection.
    fn disconnect(&mut self) {}
}

#[derive(Default)]
struct Shared {
    shutdown: AtomicBool,
    // Lock/condvar pair exists only to make the reconnect sleep interruptible.
    lock: Mutex<()>,
    wake: Condvar,
    global_icon: Mutex<OverlayIcon>,
}

impl Shared {
    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    fn global_icon(&self) -> OverlayIcon {
        *self
            .global_icon
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_global_icon(&self, icon: OverlayIcon) {
        *self
            .global_icon
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = icon;
    }
}

/// Drives shell badge refreshes for everything under one sync directory.
///
/// Badge queries ([`OverlayHelper::icon_for_query`]) run on the caller's
/// thread; refresh requests are serialized through the background worker.
pub struct OverlayHelper<P: IconProvider> {
    sync_dir: PathBuf,
    provider: Arc<P>,
    shared: Arc<Shared>,
    tx: Sender<Vec<PathBuf>>,
    worker: Option<JoinHandle<()>>,
}

impl<P: IconProvider> OverlayHelper<P> {
    /// Spawn the bridge for `sync_dir`. The worker owns `control` and keeps
    /// retrying the connection until it succeeds or [`shutdown`] is called.
    ///
    /// [`shutdown`]: OverlayHelper::shutdown
    pub fn new<C: ShellIconControl>(sync_dir: PathBuf, provider: P, control: C) -> Result<Self> {
        Self::with_backoff(sync_dir, provider, control, RECONNECT_BACKOFF)
    }

    fn with_backoff<C: ShellIconControl>(
        sync_dir: PathBuf,
        provider: P,
        control: C,
        backoff: Duration,
    ) -> Result<Self> {
        let shared = Arc::new(Shared::default());
        let (tx, rx) = mpsc::channel();

        let worker_shared = Arc::clone(&shared);
        let worker_dir = sync_dir.clone();
        let worker = std::thread::Builder::new()
            .name("overlay-icons".into())
            .spawn(move || run_worker(control, rx, worker_shared, worker_dir, backoff))
            .context("failed to spawn the overlay worker thread")?;

        Ok(Self {
            sync_dir,
            provider: Arc::new(provider),
            shared,
            tx,
            worker: Some(worker),
        })
    }

    /// Queue a badge refresh for `path` and its ancestors up to the sync dir.
    /// Paths outside the boundary are ignored.
    pub fn notify_changed(&self, path: &Path) {
        if !path.starts_with(&self.sync_dir) {
            return;
        }
        let mut batch = Vec::new();
        let mut current = Some(path);
        while let Some(p) = current {
            batch.push(p.to_path_buf());
            if p == self.sync_dir {
                break;
            }
            current = p.parent();
        }
        self.enqueue(batch);
    }

    /// Show the "everything synced" badge on the sync dir itself.
    pub fn set_ok(&self) {
        self.set_global(OverlayIcon::Ok);
    }

    /// Show the "synchronizing" badge on the sync dir itself.
    pub fn set_synchronizing(&self) {
        self.set_global(OverlayIcon::Syncing);
    }

    /// Badge lookup the shell performs for every visible path.
    ///
    /// Outside the boundary nothing is shown; the boundary itself shows the
    /// global sync state; a path inside shows the most active state found in
    /// its subtree.
    pub fn icon_for_query(&self, path: &Path) -> OverlayIcon {
        if !path.starts_with(&self.sync_dir) {
            return OverlayIcon::None;
        }
        if path == self.sync_dir {
            return self.shared.global_icon();
        }
        let mut max = OverlayIcon::None;
        for entry in WalkDir::new(path) {
            match entry {
                Ok(e) => max = max.max(self.provider.icon_for(e.path())),
                Err(e) => {
                    error!(error = %e, "failed walking the file tree for badge state");
                    return OverlayIcon::None;
                }
            }
        }
        max
    }

    /// Stop the worker, clear the sync-dir badge and disconnect.
    /// Interrupts a worker still waiting in the reconnect loop.
    pub fn shutdown(&mut self) {
        self.shared.shutdown.store(true, Ordering::Relaxed);
        // Taking the lock pairs with the worker's under-lock re-check; the
        // worker is either about to see the flag or already in the wait.
        drop(self.shared.lock.lock().unwrap_or_else(PoisonError::into_inner));
        self.shared.wake.notify_all();
        self.shared.set_global_icon(OverlayIcon::None);
        // Unblock a worker parked on an empty queue.
        let _ = self.tx.send(Vec::new());
        if let Some(handle) = self.worker.take()
            && handle.join().is_err()
        {
            warn!("overlay worker panicked during shutdown");
        }
    }

    fn set_global(&self, icon: OverlayIcon) {
        self.shared.set_global_icon(icon);
        self.enqueue(vec![self.sync_dir.clone()]);
    }

    fn enqueue(&self, batch: Vec<PathBuf>) {
        if self.tx.send(batch).is_err() {
            debug!("overlay worker is gone, dropping refresh request");
        }
    }
}

impl<P: IconProvider> Drop for OverlayHelper<P> {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.shutdown();
        }
    }
}

fn run_worker<C: ShellIconControl>(
    mut control: C,
    rx: Receiver<Vec<PathBuf>>,
    shared: Arc<Shared>,
    sync_dir: PathBuf,
    backoff: Duration,
) {
    loop {
        if shared.is_shutdown() {
            return;
        }
        if control.connect() {
            debug!("connected to the native overlay service");
            break;
        }
        // Most probably the port has not been released yet from a previous
        // run of the app.
        debug!(backoff = ?backoff, "native overlay service unavailable, will retry");
        let guard = shared.lock.lock().unwrap_or_else(PoisonError::into_inner);
        // Re-check under the lock so a shutdown between the check above and
        // this wait cannot be missed.
        if shared.is_shutdown() {
            return;
        }
        let _ = shared.wake.wait_timeout(guard, backoff);
    }
    if shared.is_shutdown() {
        control.disconnect();
        return;
    }

    if let Err(e) = platform::mark_system_folder(&sync_dir) {
        warn!(dir = %sync_dir.display(), error = %e, "cannot mark sync dir as a system folder");
    }

    // Single consumer: one refresh batch at a time, in arrival order.
    while let Ok(batch) = rx.recv() {
        if shared.is_shutdown() {
            break;
        }
        if !batch.is_empty() {
            control.refresh_icons(&batch);
        }
    }
    control.disconnect();
}
