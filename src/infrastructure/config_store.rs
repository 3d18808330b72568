// Filesystem store for dashboard documents
use crate::domain::dashboard::DashboardConfig;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG: &str = "default.yaml";
pub const CONFIG_EXTENSION: &str = "yaml";

pub const DEFAULT_DASHBOARD_NAME: &str = "Company Dashboard";
pub const DEFAULT_DASHBOARD_DESCRIPTION: &str = "Your company tools and resources";

#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("configuration {name} not found")]
    NotFound { name: String },
    #[error("failed to parse configuration {name}")]
    Parse {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to serialize configuration")]
    Serialize(#[from] serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Resolve the effective config directory for a base path: `<base>/config`
/// when that subdirectory exists, otherwise the base itself. Pure in the
/// directory-exists predicate so it can be tested without touching disk.
pub fn resolve_config_dir<F>(base: &Path, dir_exists: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    let candidate = base.join("config");
    if dir_exists(&candidate) {
        candidate
    } else {
        base.to_path_buf()
    }
}

/// Owns the set of on-disk dashboard documents inside one directory,
/// resolved once at construction.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_dir: PathBuf,
}

impl ConfigStore {
    pub fn new(base: &Path) -> Self {
        let config_dir = resolve_config_dir(base, |p| p.is_dir());
        Self { config_dir }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// File names of the dashboard documents currently on disk, sorted.
    /// No side effects; `list_configs` layers the default-creation rule on top.
    pub fn existing_configs(&self) -> Result<Vec<String>, ConfigStoreError> {
        let mut configs = Vec::new();
        for entry in fs::read_dir(&self.config_dir)? {
            let path = entry?.path();
            let is_config = path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext == CONFIG_EXTENSION);
            if !is_config {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                configs.push(name.to_string());
            }
        }
        configs.sort();
        Ok(configs)
    }

    /// Lists available documents, guaranteeing that `default.yaml` exists.
    /// When the directory holds no documents (or none named `default.yaml`)
    /// the default document is written and the listing is exactly that file.
    pub fn list_configs(&self) -> Result<Vec<String>, ConfigStoreError> {
        let configs = self.existing_configs()?;
        if configs.is_empty() || !configs.iter().any(|name| name == DEFAULT_CONFIG) {
            self.create_default()?;
            return Ok(vec![DEFAULT_CONFIG.to_string()]);
        }
        Ok(configs)
    }

    pub fn create_default(&self) -> Result<(), ConfigStoreError> {
        self.create_default_with(DEFAULT_DASHBOARD_NAME, DEFAULT_DASHBOARD_DESCRIPTION)
    }

    /// Writes the seed document as `default.yaml`, overwriting any existing one.
    pub fn create_default_with(
        &self,
        name: &str,
        description: &str,
    ) -> Result<(), ConfigStoreError> {
        let config = DashboardConfig::default_document(name, description);
        self.save(&config, DEFAULT_CONFIG)
    }

    pub fn load(&self, name: &str) -> Result<DashboardConfig, ConfigStoreError> {
        let path = self.config_dir.join(name);
        if !path.is_file() {
            return Err(ConfigStoreError::NotFound {
                name: name.to_string(),
            });
        }
        let contents = fs::read_to_string(&path)?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigStoreError::Parse {
            name: name.to_string(),
            source,
        })
    }

    pub fn save(&self, config: &DashboardConfig, name: &str) -> Result<(), ConfigStoreError> {
        let contents = serde_yaml::to_string(config)?;
        write_atomic(&self.config_dir.join(name), contents.as_bytes())?;
        Ok(())
    }
}

/// Write via a temp file sibling and rename, so concurrent readers never
/// observe a partially written document.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    if let Err(err) = file.write_all(bytes).and_then(|_| file.sync_all()) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    drop(file);
    fs::rename(&temp_path, path)
}
