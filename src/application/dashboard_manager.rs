// Dashboard manager - Single access point over stores and watcher
use crate::domain::dashboard::DashboardConfig;
use crate::domain::preferences::UserConfig;
use crate::infrastructure::config_store::{ConfigStore, ConfigStoreError};
use crate::infrastructure::preference_store::{PreferenceStore, PreferencesError};
use crate::infrastructure::watcher::{ConfigChange, ConfigWatcher};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Mutex;
use tokio::sync::{broadcast, RwLock};

/// Composes the config store, preference store and change watcher into the
/// one object the HTTP layer depends on. Construction resolves the config
/// directory, creates the user-preference directory, loads preferences and
/// starts the watcher.
pub struct DashboardManager {
    config_store: ConfigStore,
    preferences: RwLock<PreferenceStore>,
    watcher: Mutex<Option<ConfigWatcher>>,
}

impl DashboardManager {
    pub fn new(base: &Path, watch: bool) -> anyhow::Result<Self> {
        let config_store = ConfigStore::new(base);
        let preferences = PreferenceStore::new(base)?;
        let watcher = if watch {
            match ConfigWatcher::start(config_store.config_dir()) {
                Ok(watcher) => Some(watcher),
                Err(err) => {
                    // degrade to no live reload rather than failing startup
                    tracing::warn!("live reload disabled: {}", err);
                    None
                }
            }
        } else {
            None
        };
        Ok(Self {
            config_store,
            preferences: RwLock::new(preferences),
            watcher: Mutex::new(watcher),
        })
    }

    pub fn config_dir(&self) -> &Path {
        self.config_store.config_dir()
    }

    /// Loads the named dashboard document, or the active one when no name is
    /// given. Missing documents yield `None`; malformed documents are logged
    /// with the offending file name and also yield `None`, so the API layer
    /// answers 404 for both.
    pub async fn get_config(&self, name: Option<&str>) -> anyhow::Result<Option<DashboardConfig>> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.active_config().await,
        };
        match self.config_store.load(&name) {
            Ok(config) => Ok(Some(config)),
            Err(ConfigStoreError::NotFound { .. }) => Ok(None),
            Err(ConfigStoreError::Parse { name, source }) => {
                tracing::error!("error loading config {}: {}", name, source);
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get_user_view(&self) -> anyhow::Result<UserConfig> {
        let available_configs = self.config_store.list_configs()?;
        let preferences = self.preferences.read().await.preferences().clone();
        Ok(UserConfig {
            config_path: self.config_store.config_dir().display().to_string(),
            preferences,
            available_configs,
        })
    }

    pub async fn update_preferences(
        &self,
        fields: &Map<String, Value>,
    ) -> Result<(), PreferencesError> {
        self.preferences.write().await.update(fields)
    }

    pub fn list_configs(&self) -> Result<Vec<String>, ConfigStoreError> {
        self.config_store.list_configs()
    }

    pub async fn active_config(&self) -> String {
        self.preferences
            .read()
            .await
            .preferences()
            .active_config
            .clone()
    }

    /// Change notifications from the watcher, if it is running.
    pub fn subscribe_changes(&self) -> Option<broadcast::Receiver<ConfigChange>> {
        self.watcher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(ConfigWatcher::subscribe)
    }

    /// Stops the watcher. Safe to call when it never started, and safe to
    /// call repeatedly.
    pub fn shutdown(&self) {
        if let Some(mut watcher) = self
            .watcher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
        {
            watcher.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config_store::DEFAULT_CONFIG;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn two_category_document() -> &'static str {
        r#"
metadata:
  name: Team Dashboard
  description: Team tools
  version: 1.0.0
  tags: [team]
categories:
  - name: Development
    description: Dev tools
    links:
      - name: CI
        url: https://ci.example.com
        description: Build pipeline
        tags: [dev]
      - name: Repo
        url: https://git.example.com
        description: Source hosting
        tags: [dev]
  - name: Ops
    description: Operational tools
    links:
      - name: Grafana
        url: https://grafana.example.com
        description: Metrics
        tags: [ops]
"#
    }

    #[tokio::test]
    async fn test_get_config_falls_back_to_active_preference() {
        let dir = TempDir::new().unwrap();
        let manager = DashboardManager::new(dir.path(), false).unwrap();
        manager.list_configs().unwrap(); // materializes default.yaml

        let config = manager.get_config(None).await.unwrap().unwrap();
        assert_eq!(config.metadata.name, "Company Dashboard");
    }

    #[tokio::test]
    async fn test_get_config_missing_yields_none() {
        let dir = TempDir::new().unwrap();
        let manager = DashboardManager::new(dir.path(), false).unwrap();
        assert!(manager
            .get_config(Some("missing.yaml"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_get_config_malformed_yields_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.yaml"), "categories: 7").unwrap();
        let manager = DashboardManager::new(dir.path(), false).unwrap();
        assert!(manager
            .get_config(Some("broken.yaml"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_user_view_composes_path_preferences_and_listing() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join("config");
        fs::create_dir(&config_dir).unwrap();
        fs::write(config_dir.join(DEFAULT_CONFIG), two_category_document()).unwrap();

        let manager = DashboardManager::new(dir.path(), false).unwrap();
        let view = manager.get_user_view().await.unwrap();

        assert_eq!(view.config_path, config_dir.display().to_string());
        assert_eq!(view.available_configs, vec![DEFAULT_CONFIG.to_string()]);
        assert_eq!(view.preferences.active_config, DEFAULT_CONFIG);

        let config = manager.get_config(None).await.unwrap().unwrap();
        assert_eq!(config.categories.len(), 2);
        let total_links: usize = config.categories.iter().map(|c| c.links.len()).sum();
        assert_eq!(total_links, 3);
    }

    #[tokio::test]
    async fn test_update_preferences_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        {
            let manager = DashboardManager::new(dir.path(), false).unwrap();
            manager
                .update_preferences(&object(json!({"theme": "dark"})))
                .await
                .unwrap();
        }
        let manager = DashboardManager::new(dir.path(), false).unwrap();
        let view = manager.get_user_view().await.unwrap();
        assert_eq!(view.preferences.theme, "dark");
    }

    #[tokio::test]
    async fn test_shutdown_without_watcher_is_safe() {
        let dir = TempDir::new().unwrap();
        let manager = DashboardManager::new(dir.path(), false).unwrap();
        assert!(manager.subscribe_changes().is_none());
        manager.shutdown();
        manager.shutdown();
    }
}
