//! Filesystem watcher for the rendered page snapshot and the settings file.
//!
//! An external renderer rewrites the page snapshot file as the page mutates.
//! The watcher turns those rewrites into [`PageSignal::Mutated`] events
//! carrying a byte-growth estimate, and turns settings-file rewrites into
//! [`PageSignal::SettingsChanged`]. The notify callback stays lightweight:
//! it only forwards raw events over a bounded channel, and all filesystem
//! inspection happens on a dedicated async task.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::observer::PageSignal;

/// Capacity of the internal raw-event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Errors from the page watcher.
#[derive(Debug, thiserror::Error)]
pub enum WatcherError {
    /// The underlying filesystem watcher could not be initialized.
    #[error("Failed to initialize file watcher: {0}")]
    Init(#[from] notify::Error),

    /// An IO error occurred while inspecting a watched file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The page snapshot file does not exist.
    #[error("Page snapshot file not found: {0}")]
    PageFileNotFound(PathBuf),

    /// The signal channel closed while the watcher was running.
    #[error("Signal channel closed")]
    ChannelClosed,
}

/// Which watched file a raw event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchedFile {
    Page,
    Settings,
}

/// Watches the page snapshot and settings files, emitting [`PageSignal`]s.
///
/// Dropping the watcher stops event delivery; the forwarding task then exits
/// once its channel drains.
pub struct PageWatcher {
    // Kept alive for the lifetime of the watch.
    _watcher: RecommendedWatcher,
    handle: JoinHandle<()>,
}

impl PageWatcher {
    /// Starts watching and forwards signals to `signals`.
    ///
    /// The page file must already exist so the initial size baseline can be
    /// taken; the settings file may be absent. Parent directories are watched
    /// rather than the files themselves so atomic rename-into-place rewrites
    /// are still observed.
    pub fn spawn(
        page_path: &Path,
        settings_path: &Path,
        signals: mpsc::Sender<PageSignal>,
    ) -> Result<Self, WatcherError> {
        if !page_path.exists() {
            return Err(WatcherError::PageFileNotFound(page_path.to_path_buf()));
        }
        let baseline = std::fs::metadata(page_path)?.len();

        let page_path = page_path.to_path_buf();
        let settings_path = settings_path.to_path_buf();
        let (raw_tx, raw_rx) = mpsc::channel::<WatchedFile>(EVENT_CHANNEL_CAPACITY);

        let callback_page = page_path.clone();
        let callback_settings = settings_path.clone();
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            let event = match result {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "File watcher event error");
                    return;
                }
            };
            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                return;
            }
            for path in &event.paths {
                let file = if path == &callback_page {
                    WatchedFile::Page
                } else if path == &callback_settings {
                    WatchedFile::Settings
                } else {
                    continue;
                };
                // Drop on overflow; the fallback poll covers missed events.
                if raw_tx.try_send(file).is_err() {
                    trace!(?file, "Raw event channel full, event dropped");
                }
            }
        })?;

        watch_parent(&mut watcher, &page_path)?;
        if settings_path.parent() != page_path.parent() {
            watch_parent(&mut watcher, &settings_path)?;
        }
        info!(
            page = %page_path.display(),
            settings = %settings_path.display(),
            "Page watcher started"
        );

        let handle = tokio::spawn(forward_events(raw_rx, page_path, baseline, signals));

        Ok(Self {
            _watcher: watcher,
            handle,
        })
    }

    /// Stops the watcher and waits for the forwarding task to exit.
    pub async fn shutdown(self) {
        drop(self._watcher);
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Watcher task ended abnormally");
        }
    }
}

fn watch_parent(watcher: &mut RecommendedWatcher, path: &Path) -> Result<(), WatcherError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    watcher.watch(parent, RecursiveMode::NonRecursive)?;
    Ok(())
}

/// Bytes gained by a file that went from `last` to `current` in size.
///
/// A shrink means the renderer rewrote the file from scratch, so the whole
/// new size counts as added content.
fn added_bytes(last: u64, current: u64) -> u64 {
    if current >= last {
        current - last
    } else {
        current
    }
}

async fn forward_events(
    mut raw_rx: mpsc::Receiver<WatchedFile>,
    page_path: PathBuf,
    mut last_size: u64,
    signals: mpsc::Sender<PageSignal>,
) {
    while let Some(file) = raw_rx.recv().await {
        let signal = match file {
            WatchedFile::Settings => PageSignal::SettingsChanged,
            WatchedFile::Page => {
                let size = match tokio::fs::metadata(&page_path).await {
                    Ok(meta) => meta.len(),
                    Err(e) => {
                        // Transient during atomic rewrites; keep the baseline.
                        debug!(error = %e, "Page file momentarily unreadable");
                        continue;
                    }
                };
                let added = added_bytes(last_size, size);
                last_size = size;
                if added == 0 {
                    trace!(size, "Page event with no growth");
                    continue;
                }
                PageSignal::Mutated {
                    added_bytes: added as usize,
                }
            }
        };

        if signals.send(signal).await.is_err() {
            debug!("Signal channel closed, watcher forwarding stopped");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn growth_is_the_size_difference() {
        assert_eq!(added_bytes(100, 180), 80);
        assert_eq!(added_bytes(0, 40), 40);
    }

    #[test]
    fn unchanged_size_adds_nothing() {
        assert_eq!(added_bytes(100, 100), 0);
    }

    #[test]
    fn shrink_counts_as_full_rewrite() {
        assert_eq!(added_bytes(500, 120), 120);
    }

    #[tokio::test]
    async fn missing_page_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (tx, _rx) = mpsc::channel(8);

        let result = PageWatcher::spawn(
            &dir.path().join("absent.html"),
            &dir.path().join("settings.json"),
            tx,
        );
        assert!(matches!(result, Err(WatcherError::PageFileNotFound(_))));
    }

    #[tokio::test]
    async fn page_growth_emits_a_mutation_signal() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("page.html");
        let settings = dir.path().join("settings.json");
        std::fs::write(&page, "<html></html>").unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        let watcher = PageWatcher::spawn(&page, &settings, tx).unwrap();

        // Append well past the initial size.
        let grown = format!("<html><body>{}</body></html>", "x".repeat(300));
        std::fs::write(&page, grown).unwrap();

        let signal = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for mutation signal")
            .expect("channel closed");
        match signal {
            PageSignal::Mutated { added_bytes } => assert!(added_bytes > 200),
            other => panic!("unexpected signal: {other:?}"),
        }

        watcher.shutdown().await;
    }

    #[tokio::test]
    async fn settings_rewrite_emits_a_settings_signal() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("page.html");
        let settings = dir.path().join("settings.json");
        std::fs::write(&page, "<html></html>").unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        let watcher = PageWatcher::spawn(&page, &settings, tx).unwrap();

        std::fs::write(&settings, r#"{"volume":0.4}"#).unwrap();

        let signal = loop {
            let signal = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("timed out waiting for settings signal")
                .expect("channel closed");
            // Creating the settings file can also surface page-dir noise.
            if signal == PageSignal::SettingsChanged {
                break signal;
            }
        };
        assert_eq!(signal, PageSignal::SettingsChanged);

        watcher.shutdown().await;
    }
}
