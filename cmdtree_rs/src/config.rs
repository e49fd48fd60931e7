//! Configuration file support for cmdtree.
//!
//! Loads optional `.cmdtree/config.toml` from a root directory.

use serde::Deserialize;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Prefix shown in front of the command name in usage syntax.
    pub command_prefix: String,
    pub suggestions: SuggestionConfig,
    pub completion: CompletionConfig,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            command_prefix: "/".to_string(),
            suggestions: SuggestionConfig::default(),
            completion: CompletionConfig::default(),
        }
    }
}

/// "Did you mean" behaviour for unknown commands
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    pub did_you_mean: bool,
    /// Maximum Levenshtein distance for a name to count as close.
    pub max_distance: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            did_you_mean: true,
            max_distance: 2,
        }
    }
}

/// Autocomplete post-filtering
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Keep only candidates starting with the typed token (case-insensitive).
    pub filter_by_prefix: bool,
    pub max_results: Option<usize>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            filter_by_prefix: true,
            max_results: None,
        }
    }
}

impl DispatcherConfig {
    /// Load config from `.cmdtree/config.toml` in the given root directory.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(".cmdtree").join("config.toml");
        Self::load_from_path(&config_path)
    }

    /// Load config from a specific path.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to parse config");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read config");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = DispatcherConfig::default();
        assert_eq!(config.command_prefix, "/");
        assert!(config.suggestions.did_you_mean);
        assert_eq!(config.suggestions.max_distance, 2);
        assert!(config.completion.filter_by_prefix);
        assert_eq!(config.completion.max_results, None);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().expect("temp dir");
        let config = DispatcherConfig::load(temp.path());
        assert_eq!(config.command_prefix, "/");
    }

    #[test]
    fn test_load_valid_config() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join(".cmdtree");
        std::fs::create_dir_all(&dir).expect("create .cmdtree");

        let config_path = dir.join("config.toml");
        let mut file = std::fs::File::create(&config_path).expect("create config");
        writeln!(
            file,
            r#"
command_prefix = "!"

[suggestions]
did_you_mean = false

[completion]
max_results = 5
"#
        )
        .expect("write config");

        let config = DispatcherConfig::load(temp.path());
        assert_eq!(config.command_prefix, "!");
        assert!(!config.suggestions.did_you_mean);
        // untouched keys keep their defaults
        assert_eq!(config.suggestions.max_distance, 2);
        assert!(config.completion.filter_by_prefix);
        assert_eq!(config.completion.max_results, Some(5));
    }

    #[test]
    fn test_load_invalid_config_falls_back() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("broken.toml");
        std::fs::write(&path, "command_prefix = [").expect("write config");

        let config = DispatcherConfig::load_from_path(&path);
        assert_eq!(config.command_prefix, "/");
    }
}
