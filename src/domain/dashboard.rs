// Dashboard document domain models
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    pub tags: Vec<String>,
}

/// A single navigable item inside a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

fn default_status() -> String {
    "active".to_string()
}

/// A named group of links. The order of `links` is rendering order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub links: Vec<Link>,
}

/// Root dashboard document, identified externally by its file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub metadata: DashboardMetadata,
    pub categories: Vec<Category>,
}

impl DashboardConfig {
    /// Seed content written on first run and by `navspec init`.
    pub fn default_document(name: &str, description: &str) -> Self {
        Self {
            metadata: DashboardMetadata {
                name: name.to_string(),
                description: description.to_string(),
                version: "1.0.0".to_string(),
                tags: vec!["default".to_string()],
            },
            categories: vec![Category {
                name: "Development".to_string(),
                description: "Development tools and environments".to_string(),
                icon: None,
                links: vec![Link {
                    name: "Local Development".to_string(),
                    url: "http://localhost:3000".to_string(),
                    description: "Local development server".to_string(),
                    tags: vec!["dev".to_string(), "local".to_string()],
                    status: "active".to_string(),
                    icon: None,
                }],
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_active() {
        let yaml =
            "name: Grafana\nurl: https://grafana.example.com\ndescription: Metrics\ntags: [ops]\n";
        let link: Link = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(link.status, "active");
        assert_eq!(link.icon, None);
    }

    #[test]
    fn test_missing_required_field_is_an_error() {
        // no url
        let yaml = "name: Grafana\ndescription: Metrics\ntags: []\n";
        assert!(serde_yaml::from_str::<Link>(yaml).is_err());
    }

    #[test]
    fn test_document_round_trip_preserves_order_and_optionals() {
        let mut config = DashboardConfig::default_document("Team Dashboard", "Team tools");
        config.categories.push(Category {
            name: "Ops".to_string(),
            description: "Operational tools".to_string(),
            icon: Some("wrench".to_string()),
            links: vec![
                Link {
                    name: "Pager".to_string(),
                    url: "https://pager.example.com".to_string(),
                    description: "On-call rotation".to_string(),
                    tags: vec![],
                    status: "deprecated".to_string(),
                    icon: Some("bell".to_string()),
                },
                Link {
                    name: "Wiki".to_string(),
                    url: "https://wiki.example.com".to_string(),
                    description: "Team docs".to_string(),
                    tags: vec!["docs".to_string()],
                    status: "active".to_string(),
                    icon: None,
                },
            ],
        });

        let serialized = serde_yaml::to_string(&config).unwrap();
        let parsed: DashboardConfig = serde_yaml::from_str(&serialized).unwrap();
        assert_eq!(parsed, config);
        // an absent icon stays absent in the document, it does not become null
        assert!(!serialized.contains("icon: null"));
    }
}
