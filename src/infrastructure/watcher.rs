// Live observation of the config directory
use crate::infrastructure::config_store::CONFIG_EXTENSION;
use notify::event::EventKind;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 32;

/// One modification of a dashboard document.
#[derive(Debug, Clone)]
pub struct ConfigChange {
    pub path: PathBuf,
}

/// Watches the effective config directory (non-recursive) and broadcasts a
/// [`ConfigChange`] for every modified dashboard document. Subscribers decide
/// what to do with it; the watcher itself only observes.
pub struct ConfigWatcher {
    watcher: Option<RecommendedWatcher>,
    sender: broadcast::Sender<ConfigChange>,
}

impl ConfigWatcher {
    pub fn start(dir: &Path) -> notify::Result<Self> {
        let (sender, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        let tx = sender.clone();
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            let event = match result {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!("config watcher error: {}", err);
                    return;
                }
            };
            for path in modified_config_paths(event) {
                tracing::debug!("modification event for {}", path.display());
                // send only fails when nobody is subscribed, which is fine
                let _ = tx.send(ConfigChange { path });
            }
        })?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        tracing::info!("watching {} for configuration changes", dir.display());
        Ok(Self {
            watcher: Some(watcher),
            sender,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConfigChange> {
        self.sender.subscribe()
    }

    /// Halts the underlying notification backend. Dropping the notify watcher
    /// joins its event thread, so once this returns no further events fire.
    /// Safe to call more than once.
    pub fn stop(&mut self) {
        if self.watcher.take().is_some() {
            tracing::debug!("config watcher stopped");
        }
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Paths from a filesystem event that denote a modified dashboard document:
/// modification events on non-directory paths with the config extension.
fn modified_config_paths(event: Event) -> Vec<PathBuf> {
    if !matches!(event.kind, EventKind::Modify(_)) {
        return Vec::new();
    }
    event
        .paths
        .into_iter()
        .filter(|path| {
            !path.is_dir()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext == CONFIG_EXTENSION)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind};
    use std::time::Duration;
    use tempfile::TempDir;

    fn modify_event(path: &Path) -> Event {
        Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(path.to_path_buf())
    }

    #[test]
    fn test_modify_event_on_yaml_file_is_relevant() {
        let paths = modified_config_paths(modify_event(Path::new("/tmp/nowhere/team.yaml")));
        assert_eq!(paths, vec![PathBuf::from("/tmp/nowhere/team.yaml")]);
    }

    #[test]
    fn test_non_yaml_and_non_modify_events_are_filtered() {
        let paths = modified_config_paths(modify_event(Path::new("/tmp/nowhere/notes.txt")));
        assert!(paths.is_empty());

        let create = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/tmp/nowhere/team.yaml"));
        assert!(modified_config_paths(create).is_empty());
    }

    #[tokio::test]
    async fn test_watcher_reports_modified_document() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("default.yaml");
        std::fs::write(&file, "metadata: {}\n").unwrap();

        let Ok(mut watcher) = ConfigWatcher::start(dir.path()) else {
            // no OS notification facility available in this environment
            return;
        };
        let mut changes = watcher.subscribe();

        // give the backend a moment to register before mutating the file
        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(&file, "metadata: {updated: true}\n").unwrap();

        let change = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match changes.recv().await {
                    Ok(change) if change.path.ends_with("default.yaml") => break change,
                    Ok(_) => continue,
                    Err(err) => panic!("change channel closed: {err}"),
                }
            }
        })
        .await
        .expect("no change notification within timeout");
        assert!(change.path.ends_with("default.yaml"));

        watcher.stop();
        // stop is idempotent
        watcher.stop();
    }
}
