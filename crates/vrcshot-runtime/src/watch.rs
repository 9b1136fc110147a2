use notify::{Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::Result;

/// Coalesced change notification from the watched directories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEvent {
    /// A log file under the log directory changed
    Logs,
    /// A screenshot under one of the photo roots changed
    Photos,
}

/// Filesystem watcher over the log directory and photo roots.
///
/// Raw notify events arrive per file write; a VRChat session or a photo
/// burst produces hundreds of them. The worker thread folds them into dirty
/// flags and flushes at the debounce tick, so the receiver sees at most one
/// `Logs` and one `Photos` event per quiet period. The caller feeds these
/// through the sync gate, which drops triggers that land mid-run.
pub struct WorkspaceWatcher {
    _watcher: PollWatcher,
    _handle: JoinHandle<()>,
    rx: Receiver<ActivityEvent>,
}

impl WorkspaceWatcher {
    pub fn start(
        log_dir: Option<PathBuf>,
        photo_roots: Vec<PathBuf>,
        debounce: Duration,
    ) -> Result<Self> {
        let (tx_out, rx_out) = channel();
        let (tx_fs, rx_fs) = channel();

        let config = notify::Config::default().with_poll_interval(Duration::from_millis(1000));

        let mut watcher = PollWatcher::new(
            move |res: std::result::Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = tx_fs.send(event);
                }
            },
            config,
        )?;

        if let Some(dir) = &log_dir
            && dir.exists()
        {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }
        for root in &photo_roots {
            if root.exists() {
                watcher.watch(root, RecursiveMode::Recursive)?;
            }
        }

        let handle = std::thread::Builder::new()
            .name("workspace-watcher".to_string())
            .spawn(move || {
                let mut logs_dirty = false;
                let mut photos_dirty = false;
                loop {
                    match rx_fs.recv_timeout(debounce) {
                        Ok(event) => {
                            classify_event(&event, &log_dir, &mut logs_dirty, &mut photos_dirty);
                        }
                        Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                            if !flush(&tx_out, &mut logs_dirty, &mut photos_dirty) {
                                break;
                            }
                        }
                        Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        Ok(Self {
            _watcher: watcher,
            _handle: handle,
            rx: rx_out,
        })
    }

    pub fn receiver(&self) -> &Receiver<ActivityEvent> {
        &self.rx
    }
}

fn classify_event(
    event: &Event,
    log_dir: &Option<PathBuf>,
    logs_dirty: &mut bool,
    photos_dirty: &mut bool,
) {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return;
    }
    for path in &event.paths {
        if is_log_path(path, log_dir) {
            *logs_dirty = true;
        } else if is_photo_path(path) {
            *photos_dirty = true;
        }
    }
}

/// Returns false once the receiving side is gone
fn flush(tx: &Sender<ActivityEvent>, logs_dirty: &mut bool, photos_dirty: &mut bool) -> bool {
    if std::mem::take(logs_dirty) && tx.send(ActivityEvent::Logs).is_err() {
        return false;
    }
    if std::mem::take(photos_dirty) && tx.send(ActivityEvent::Photos).is_err() {
        return false;
    }
    true
}

fn is_log_path(path: &Path, log_dir: &Option<PathBuf>) -> bool {
    let under_log_dir = log_dir.as_ref().is_some_and(|dir| path.starts_with(dir));
    under_log_dir
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("output_log_") && n.ends_with(".txt"))
}

fn is_photo_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(vrcshot_sources::photos::parse_photo_file_name)
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_classification() {
        let log_dir = Some(PathBuf::from("/vrchat/logs"));
        assert!(is_log_path(
            Path::new("/vrchat/logs/output_log_2024-01-15_09-58-00.txt"),
            &log_dir
        ));
        assert!(!is_log_path(Path::new("/vrchat/logs/Player.log"), &log_dir));
        assert!(!is_log_path(
            Path::new("/elsewhere/output_log_x.txt"),
            &log_dir
        ));

        assert!(is_photo_path(Path::new(
            "/photos/VRChat_2024-01-15_10-15-30.123_1920x1080.png"
        )));
        assert!(!is_photo_path(Path::new("/photos/IMG_1234.png")));
    }
}
