// User preference domain models
use serde::{Deserialize, Serialize};

/// Per-installation user preferences. Every field carries its own serde
/// default so a stored document missing some fields merges field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default = "default_active_config")]
    pub active_config: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_layout")]
    pub layout: String,
    #[serde(default = "default_true")]
    pub show_descriptions: bool,
    #[serde(default = "default_true")]
    pub show_status: bool,
    #[serde(default)]
    pub custom_order: Vec<String>,
    #[serde(default)]
    pub recent_links: Vec<String>,
}

fn default_active_config() -> String {
    "default.yaml".to_string()
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_layout() -> String {
    "grid".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            active_config: default_active_config(),
            theme: default_theme(),
            layout: default_layout(),
            show_descriptions: true,
            show_status: true,
            custom_order: Vec::new(),
            recent_links: Vec::new(),
        }
    }
}

/// Read-model for the API boundary, built on demand and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct UserConfig {
    pub config_path: String,
    pub preferences: UserPreferences,
    pub available_configs: Vec<String>,
}
