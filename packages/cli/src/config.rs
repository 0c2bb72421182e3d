use cnx_editor::EditorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "cnx.config.json";

/// cnx configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Source directory containing modules
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Extension of module files
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Editor settings used when loading modules
    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_src_dir() -> String {
    "src".to_string()
}

fn default_extension() -> String {
    "cnxml".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to source directory
    pub fn get_src_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.src_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            extension: default_extension(),
            editor: EditorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "srcDir": "modules",
            "extension": "xml",
            "editor": { "maxNormalizePasses": 50, "normalizeOnLoad": false }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.src_dir, "modules");
        assert_eq!(config.extension, "xml");
        assert_eq!(config.editor.max_normalize_passes, 50);
        assert!(!config.editor.normalize_on_load);
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.src_dir, "src");
        assert_eq!(config.extension, "cnxml");
        assert!(config.editor.normalize_on_load);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.get_src_dir(dir.path()), dir.path().join("src"));
    }
}
