//! Server configuration
//!
//! Loaded from JSON at startup, falls back to defaults if no config file
//! exists. Every struct rejects unknown keys so a typo in the config is an
//! error instead of a silently ignored setting.

use crate::error::{Error, Result};
use crate::types::CollaboratorProfile;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemcoreConfig {
    /// Base directory all relative file paths resolve against.
    pub memory_dir: PathBuf,
    /// Files read on `initialized`.
    pub files: FilesConfig,
    pub search: SearchConfig,
    pub wonder: WonderConfig,
    pub ethics: EthicsConfig,
    /// Shown to clients, never used for behavior.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborator: Option<CollaboratorProfile>,
}

/// A file to auto-load and whether its absence is fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSpec {
    pub path: PathBuf,
    #[serde(default)]
    pub required: bool,
}

impl FileSpec {
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), required: true }
    }

    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), required: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    /// Append-only markdown narrative log.
    pub memory_log: FileSpec,
    /// JSON snapshot of the current introspection state.
    pub introspection: FileSpec,
    /// Auxiliary "parameters" JSON. `null` disables it.
    pub parameters: Option<FileSpec>,
    /// Auxiliary "accumulated learnings" JSON. `null` disables it.
    pub learnings: Option<FileSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Result count when the caller gives no limit.
    pub default_limit: usize,
    /// Largest limit a caller may ask for.
    pub max_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WonderConfig {
    /// Intensity assigned when the caller gives none (0.0 - 1.0).
    pub default_intensity: f64,
    /// JSONL file generated wonders are appended to. `null` disables it.
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EthicsConfig {
    pub rules: Vec<EthicsRule>,
}

/// Deny-rule for `check_ethics`: a regex matched against the action text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EthicsRule {
    pub name: String,
    pub pattern: String,
    pub reason: String,
}

// ============================================================
// Defaults
// ============================================================

impl Default for MemcoreConfig {
    fn default() -> Self {
        Self {
            memory_dir: PathBuf::from(".memory"),
            files: FilesConfig::default(),
            search: SearchConfig::default(),
            wonder: WonderConfig::default(),
            ethics: EthicsConfig::default(),
            collaborator: None,
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            memory_log: FileSpec::required("log.md"),
            introspection: FileSpec::optional("introspection/latest.json"),
            parameters: Some(FileSpec::optional("parameters.json")),
            learnings: Some(FileSpec::optional("accumulated-learnings.json")),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_limit: 5, max_limit: 50 }
    }
}

impl Default for WonderConfig {
    fn default() -> Self {
        Self {
            default_intensity: 0.5,
            log_file: Some(PathBuf::from("wonders.jsonl")),
        }
    }
}

// ============================================================
// Loading
// ============================================================

impl MemcoreConfig {
    /// Load config from a JSON file. A missing file yields defaults; a
    /// malformed one, or one with unknown keys, is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(Error::Config(format!("cannot read {}: {}", path.display(), e)));
            }
        };
        let config = Self::from_json(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and compile every ethics pattern once.
    pub fn validate(&self) -> Result<()> {
        if self.search.default_limit == 0 {
            return Err(Error::Config("search.default_limit must be at least 1".into()));
        }
        if self.search.default_limit > self.search.max_limit {
            return Err(Error::Config(format!(
                "search.default_limit ({}) exceeds search.max_limit ({})",
                self.search.default_limit, self.search.max_limit
            )));
        }
        let intensity = self.wonder.default_intensity;
        if !intensity.is_finite() || !(0.0..=1.0).contains(&intensity) {
            return Err(Error::Config(format!(
                "wonder.default_intensity must be within 0.0-1.0, got {}",
                intensity
            )));
        }
        for rule in &self.ethics.rules {
            regex::Regex::new(&rule.pattern).map_err(|e| {
                Error::Config(format!("ethics rule '{}': invalid pattern: {}", rule.name, e))
            })?;
        }
        Ok(())
    }

    /// Pretty JSON (for generating a default config file).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolve a configured path: `~/` expands to $HOME, relative paths land
    /// under `memory_dir`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        let expanded = expand_tilde(path);
        if expanded.is_absolute() {
            expanded
        } else {
            expand_tilde(&self.memory_dir).join(expanded)
        }
    }

    pub fn wonder_log_path(&self) -> Option<PathBuf> {
        self.wonder.log_file.as_deref().map(|p| self.resolve(p))
    }
}

pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = MemcoreConfig::default();
        config.validate().unwrap();
        assert!(config.files.memory_log.required);
        assert!(!config.files.introspection.required);
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config = MemcoreConfig::from_json(r#"{ "search": { "default_limit": 3 } }"#).unwrap();
        assert_eq!(config.search.default_limit, 3);
        assert_eq!(config.search.max_limit, 50);
        assert_eq!(config.memory_dir, PathBuf::from(".memory"));
    }

    #[test]
    fn null_disables_auxiliary_files() {
        let config = MemcoreConfig::from_json(
            r#"{ "files": { "parameters": null }, "wonder": { "log_file": null } }"#,
        )
        .unwrap();
        assert!(config.files.parameters.is_none());
        assert!(config.files.learnings.is_some());
        assert!(config.wonder_log_path().is_none());
    }

    #[test]
    fn relative_paths_resolve_under_memory_dir() {
        let config = MemcoreConfig {
            memory_dir: PathBuf::from("/data/mem"),
            ..Default::default()
        };
        assert_eq!(config.resolve(Path::new("log.md")), PathBuf::from("/data/mem/log.md"));
        assert_eq!(config.resolve(Path::new("/etc/x.json")), PathBuf::from("/etc/x.json"));
    }
}
