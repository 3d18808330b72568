// Local user preference persistence
use crate::domain::preferences::UserPreferences;
use crate::infrastructure::config_store::write_atomic;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const USER_DIR: &str = ".navspec";
const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("preference update must be a JSON object")]
    InvalidUpdate,
    #[error("invalid value for preference field {field}")]
    InvalidValue { field: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Owns the single preferences document at `<base>/.navspec/preferences.json`.
/// The location is independent of config-directory resolution: it always
/// hangs off the base directory, never off `<base>/config`.
#[derive(Debug)]
pub struct PreferenceStore {
    file: PathBuf,
    preferences: UserPreferences,
}

impl PreferenceStore {
    /// Creates `.navspec/` if needed and loads the stored preferences.
    /// A missing or malformed file silently yields defaults.
    pub fn new(base: &Path) -> Result<Self, PreferencesError> {
        let dir = base.join(USER_DIR);
        fs::create_dir_all(&dir)?;
        let file = dir.join(PREFERENCES_FILE);
        let preferences = load_or_default(&file);
        Ok(Self { file, preferences })
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    /// Applies recognized fields from the update mapping, then persists.
    /// Unrecognized keys are ignored; a recognized key with a wrong-typed
    /// value rejects the whole update and leaves the stored state untouched.
    pub fn update(&mut self, fields: &Map<String, Value>) -> Result<(), PreferencesError> {
        let mut next = self.preferences.clone();
        for (key, value) in fields {
            apply_field(&mut next, key, value)?;
        }
        self.preferences = next;
        self.save()
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        let contents = serde_json::to_string_pretty(&self.preferences)?;
        write_atomic(&self.file, contents.as_bytes())?;
        Ok(())
    }
}

fn load_or_default(file: &Path) -> UserPreferences {
    let Ok(contents) = fs::read_to_string(file) else {
        return UserPreferences::default();
    };
    match serde_json::from_str(&contents) {
        Ok(preferences) => preferences,
        Err(err) => {
            tracing::warn!(
                "ignoring malformed preferences file {}: {}",
                file.display(),
                err
            );
            UserPreferences::default()
        }
    }
}

/// Explicit field table. Reflection-free on purpose: each recognized key
/// maps to one typed setter, everything else falls through.
fn apply_field(
    preferences: &mut UserPreferences,
    key: &str,
    value: &Value,
) -> Result<(), PreferencesError> {
    match key {
        "active_config" => preferences.active_config = as_string(key, value)?,
        "theme" => preferences.theme = as_string(key, value)?,
        "layout" => preferences.layout = as_string(key, value)?,
        "show_descriptions" => preferences.show_descriptions = as_bool(key, value)?,
        "show_status" => preferences.show_status = as_bool(key, value)?,
        "custom_order" => preferences.custom_order = as_string_list(key, value)?,
        "recent_links" => preferences.recent_links = as_string_list(key, value)?,
        _ => {}
    }
    Ok(())
}

fn as_string(field: &str, value: &Value) -> Result<String, PreferencesError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PreferencesError::InvalidValue {
            field: field.to_string(),
        })
}

fn as_bool(field: &str, value: &Value) -> Result<bool, PreferencesError> {
    value.as_bool().ok_or_else(|| PreferencesError::InvalidValue {
        field: field.to_string(),
    })
}

fn as_string_list(field: &str, value: &Value) -> Result<Vec<String>, PreferencesError> {
    value
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| PreferencesError::InvalidValue {
            field: field.to_string(),
        })
}
