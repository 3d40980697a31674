//! Refresh requests must reach the native side serialized through the
//! worker, carrying the changed path plus its ancestors up to the boundary.

use driftbox_common::overlay::{
    IconProvider, OverlayHelper, OverlayIcon, ShellIconControl,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::tempdir;

struct NoIcons;
impl IconProvider for NoIcons {
    fn icon_for(&self, _path: &Path) -> OverlayIcon {
        OverlayIcon::None
    }
}

#[derive(Clone, Default)]
struct RecordingControl {
    batches: Arc<Mutex<Vec<Vec<PathBuf>>>>,
}

impl ShellIconControl for RecordingControl {
    fn connect(&mut self) -> bool {
        true
    }
    fn refresh_icons(&mut self, paths: &[PathBuf]) {
        self.batches.lock().unwrap().push(paths.to_vec());
    }
}

fn wait_for_batches(batches: &Mutex<Vec<Vec<PathBuf>>>, count: usize) -> Vec<Vec<PathBuf>> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        {
            let seen = batches.lock().unwrap();
            if seen.len() >= count {
                return seen.clone();
            }
        }
        assert!(Instant::now() < deadline, "worker never delivered {count} batches");
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn changed_path_refreshes_itself_and_ancestors() {
    let td = tempdir().unwrap();
    let sync_dir = td.path().to_path_buf();

    let control = RecordingControl::default();
    let batches = Arc::clone(&control.batches);
    let mut helper = OverlayHelper::new(sync_dir.clone(), NoIcons, control).unwrap();

    let file = sync_dir.join("docs").join("report.pdf");
    helper.notify_changed(&file);

    let seen = wait_for_batches(&batches, 1);
    assert_eq!(
        seen[0],
        vec![file.clone(), sync_dir.join("docs"), sync_dir.clone()]
    );

    helper.shutdown();
}

#[test]
fn paths_outside_the_boundary_are_ignored() {
    let td = tempdir().unwrap();
    let control = RecordingControl::default();
    let batches = Arc::clone(&control.batches);
    let mut helper = OverlayHelper::new(td.path().to_path_buf(), NoIcons, control).unwrap();

    helper.notify_changed(Path::new("/somewhere/else/file.txt"));
    // Follow with an in-boundary change so there is something to wait on.
    let inside = td.path().join("a.txt");
    helper.notify_changed(&inside);

    let seen = wait_for_batches(&batches, 1);
    assert_eq!(seen.len(), 1, "outside path must not produce a refresh");
    assert_eq!(seen[0][0], inside);

    helper.shutdown();
}

#[test]
fn global_state_change_refreshes_the_sync_dir_badge() {
    let td = tempdir().unwrap();
    let sync_dir = td.path().to_path_buf();
    let control = RecordingControl::default();
    let batches = Arc::clone(&control.batches);
    let mut helper = OverlayHelper::new(sync_dir.clone(), NoIcons, control).unwrap();

    helper.set_synchronizing();
    assert_eq!(helper.icon_for_query(&sync_dir), OverlayIcon::Syncing);

    helper.set_ok();
    assert_eq!(helper.icon_for_query(&sync_dir), OverlayIcon::Ok);

    let seen = wait_for_batches(&batches, 2);
    assert!(seen.iter().all(|b| b == &vec![sync_dir.clone()]));

    helper.shutdown();
    // Shutdown resets the boundary badge.
    assert_eq!(helper.icon_for_query(&sync_dir), OverlayIcon::None);
}
