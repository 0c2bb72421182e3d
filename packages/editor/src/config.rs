//! Editor settings

use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MAX_NORMALIZE_PASSES: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Upper bound on normalization passes before giving up
    pub max_normalize_passes: usize,

    /// Normalize documents right after loading them
    pub normalize_on_load: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_normalize_passes: DEFAULT_MAX_NORMALIZE_PASSES,
            normalize_on_load: true,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, EditorError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = EditorConfig::from_json(r#"{"maxNormalizePasses": 5}"#).unwrap();

        assert_eq!(config.max_normalize_passes, 5);
        assert!(config.normalize_on_load);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            EditorConfig::from_json("{maxNormalizePasses"),
            Err(EditorError::Json(_))
        ));
    }
}
