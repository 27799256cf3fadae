/// Host configuration
///
/// The host exposes the widget's base fetch URL (and here, the field
/// definitions it would otherwise render into the page) under a key
/// namespaced by the widget's registered name.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::state::field::{FieldConfig, PageRef, PanelConfig};

/// The widget's registered name; its configuration lives under this key
pub const WIDGET_NAME: &str = "ImagerefPicker";

/// Configuration the host supplies for this widget
#[derive(Deserialize, Debug, Clone)]
pub struct HostConfig {
    /// Base URL of the thumbnail-fragment endpoint, query included
    pub url: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

impl HostConfig {
    /// Load the config file, falling back to built-in demo defaults.
    /// A broken config is never fatal; the diagnostic goes to stderr.
    pub fn load() -> Self {
        let path = Self::config_path();

        match fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    println!("📁 Loaded host config from {}", path.display());
                    config
                }
                Err(e) => {
                    eprintln!("⚠️  Could not parse {}: {}", path.display(), e);
                    Self::demo_defaults()
                }
            },
            Err(_) => Self::demo_defaults(),
        }
    }

    /// Parse the namespaced config document:
    /// `{ "ImagerefPicker": { "url": ..., "fields": [...] } }`
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let root: serde_json::Value = serde_json::from_str(json)?;
        let section = root.get(WIDGET_NAME).cloned().unwrap_or(serde_json::Value::Null);
        serde_json::from_value(section)
    }

    /// Where the config file is expected:
    /// - Linux: ~/.config/imageref-picker/config.json
    /// - macOS: ~/Library/Application Support/imageref-picker/config.json
    /// - Windows: %APPDATA%\imageref-picker\config.json
    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("imageref-picker");
        path.push("config.json");
        path
    }

    /// Built-in configuration so the app runs without a config file.
    pub fn demo_defaults() -> Self {
        HostConfig {
            url: "http://localhost:8080/admin/imageref/thumbs?field=headline_image".to_string(),
            fields: vec![FieldConfig {
                id: "headline_image".to_string(),
                label: "Headline image".to_string(),
                panels: vec![
                    PanelConfig {
                        title: "Images on this page".to_string(),
                        pageid: "1042".to_string(),
                        folderpath: None,
                        images_fields: vec!["images".to_string()],
                    },
                    PanelConfig {
                        title: "Shared media folder".to_string(),
                        pageid: "1043".to_string(),
                        folderpath: Some("site/media/".to_string()),
                        images_fields: Vec::new(),
                    },
                ],
                any_page: true,
                any_page_candidates: vec![
                    PageRef {
                        id: "1001".to_string(),
                        title: "Home".to_string(),
                    },
                    PageRef {
                        id: "1002".to_string(),
                        title: "About".to_string(),
                    },
                    PageRef {
                        id: "1003".to_string(),
                        title: "Blog".to_string(),
                    },
                ],
            }],
        }
    }
}
