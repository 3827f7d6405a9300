use anyhow::Context;
use branchtree_editor::{EditorConfig, DEFAULT_HISTORY_LIMIT};
use branchtree_export::ExportFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "branchtree.config.json";

/// Branchtree configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Where the tree document is stored, relative to the project directory
    #[serde(default = "default_document_path")]
    pub document_path: String,

    /// Undo levels kept while editing
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Export defaults
    #[serde(default)]
    pub export: ExportOptions,
}

fn default_document_path() -> String {
    "branchtree.json".to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Default export format ("ascii" or "mermaid")
    #[serde(default = "default_format")]
    pub format: String,

    /// Wrap Mermaid output in a Markdown code fence
    #[serde(default = "default_fence")]
    pub fence: bool,
}

fn default_format() -> String {
    ExportFormat::default().as_str().to_string()
}

fn default_fence() -> bool {
    true
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: default_format(),
            fence: default_fence(),
        }
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid {}", config_path.display()))?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the tree document
    pub fn get_document_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.document_path)
    }

    pub fn editor_config(&self) -> EditorConfig {
        EditorConfig {
            history_limit: self.history_limit,
        }
    }

    pub fn export_format(&self) -> anyhow::Result<ExportFormat> {
        Ok(self.export.format.parse::<ExportFormat>()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_path: default_document_path(),
            history_limit: default_history_limit(),
            export: ExportOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "documentPath": "docs/branches.json",
            "historyLimit": 20,
            "export": { "format": "mermaid", "fence": false }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.document_path, "docs/branches.json");
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.export_format().unwrap(), ExportFormat::Mermaid);
        assert!(!config.export.fence);
        assert_eq!(config.editor_config().history_limit, 20);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.document_path, "branchtree.json");
        assert_eq!(config.history_limit, 100);
        assert_eq!(config.export_format().unwrap(), ExportFormat::Ascii);
        assert!(config.export.fence);

        let partial: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(partial, config);
    }

    #[test]
    fn test_unknown_export_format() {
        let config: Config = serde_json::from_str(r#"{"export": {"format": "svg"}}"#).unwrap();
        assert!(config.export_format().is_err());
    }

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config, Config::default());
    }
}
