//! Configuration system
//!
//! Editor tuning lives in [`EditorConfig`]; any config type can be read from
//! or written to TOML or RON, chosen by the file extension.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::geometry::TessellationLevel;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        match ConfigFormat::of(path)? {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::of(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Step sizes and defaults used by the interactive editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Degrees applied per rotate step
    pub rotation_step_degrees: f32,
    /// Distance applied per translate step
    pub translation_step: f32,
    /// Factor applied by an increasing scale step
    pub scale_up_factor: f32,
    /// Factor applied by a decreasing scale step
    pub scale_down_factor: f32,
    /// Tessellation level for shapes added in the editor
    pub default_level: TessellationLevel,
    /// Tessellation level used to rebuild shapes when a model is loaded
    pub load_level: TessellationLevel,
    /// Extension appended to save/load paths that lack it
    pub file_extension: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            rotation_step_degrees: 10.0,
            translation_step: 0.1,
            scale_up_factor: 1.1,
            scale_down_factor: 0.9,
            default_level: TessellationLevel::new(1),
            load_level: TessellationLevel::new(1),
            file_extension: "mod".to_string(),
        }
    }
}

impl Config for EditorConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_toml_with_partial_fields() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "rotation_step_degrees = 15.0").unwrap();
        writeln!(file, "default_level = 3").unwrap();

        let config = EditorConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.rotation_step_degrees, 15.0);
        assert_eq!(config.default_level.get(), 3);
        // Unspecified fields keep their defaults
        assert_eq!(config.translation_step, 0.1);
        assert_eq!(config.file_extension, "mod");
    }

    #[test]
    fn test_ron_roundtrip() {
        let file = tempfile::Builder::new().suffix(".ron").tempfile().unwrap();
        let config = EditorConfig {
            scale_up_factor: 1.25,
            load_level: TessellationLevel::new(2),
            ..Default::default()
        };
        config.save_to_file(file.path()).unwrap();

        let loaded = EditorConfig::load_from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = NamedTempFile::new().unwrap();
        let result = EditorConfig::load_from_file(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_level_is_clamped_on_load() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "load_level = 9").unwrap();

        let config = EditorConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.load_level.get(), TessellationLevel::MAX);
    }
}
