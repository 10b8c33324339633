//! Provider layout registry
//!
//! Each provider delivers CSV files with a known column layout, declared in a
//! JSON file under the configured layout directory:
//!
//! ```json
//! {
//!     "provider_name": "acme",
//!     "has_header": true,
//!     "columns": ["uuid", "vin"]
//! }
//! ```
//!
//! The registry is built once at startup and shared read-only behind an
//! `Arc`; lookups never mutate it. Two layout files claiming the same
//! provider name abort startup: directory iteration order is
//! platform-dependent, so silently letting one win would make the effective
//! configuration nondeterministic.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Expected CSV shape for one provider. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderLayout {
    /// Provider name, matched exactly against the upload path segment
    pub provider_name: String,
    /// Whether the first row of the file names its columns
    pub has_header: bool,
    /// Required column names, in declared order (case-sensitive)
    pub columns: Vec<String>,
}

/// Errors raised while building the registry
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Failed to read layout directory {dir}: {source}")]
    ReadDir {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read layout file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid layout file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Duplicate layout for provider '{0}'")]
    DuplicateProvider(String),
}

/// Read-only provider name → layout mapping
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: HashMap<String, ProviderLayout>,
}

impl LayoutRegistry {
    /// Build a registry from already-parsed layouts, rejecting duplicates.
    pub fn from_layouts(
        layouts: impl IntoIterator<Item = ProviderLayout>,
    ) -> Result<Self, LayoutError> {
        let mut map = HashMap::new();
        for layout in layouts {
            let name = layout.provider_name.clone();
            if map.insert(name.clone(), layout).is_some() {
                return Err(LayoutError::DuplicateProvider(name));
            }
        }
        Ok(Self { layouts: map })
    }

    /// Load every `*.json` file in `dir` as a provider layout.
    pub fn load_dir(dir: &Path) -> Result<Self, LayoutError> {
        let entries = std::fs::read_dir(dir).map_err(|source| LayoutError::ReadDir {
            dir: dir.to_path_buf(),
            source,
        })?;

        let mut layouts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LayoutError::ReadDir {
                dir: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let contents =
                std::fs::read_to_string(&path).map_err(|source| LayoutError::ReadFile {
                    path: path.clone(),
                    source,
                })?;
            let layout: ProviderLayout = serde_json::from_str(&contents)
                .map_err(|source| LayoutError::Parse { path, source })?;

            tracing::debug!(
                provider = %layout.provider_name,
                columns = layout.columns.len(),
                has_header = layout.has_header,
                "Loaded provider layout"
            );
            layouts.push(layout);
        }

        let registry = Self::from_layouts(layouts)?;
        if registry.is_empty() {
            tracing::warn!(dir = %dir.display(), "No provider layouts found");
        } else {
            tracing::info!(providers = registry.len(), "Provider layouts loaded");
        }

        Ok(registry)
    }

    /// Look up the layout for a provider by exact name.
    pub fn lookup(&self, provider_name: &str) -> Option<&ProviderLayout> {
        self.layouts.get(provider_name)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn acme() -> ProviderLayout {
        ProviderLayout {
            provider_name: "acme".to_string(),
            has_header: true,
            columns: vec!["uuid".to_string(), "vin".to_string()],
        }
    }

    #[test]
    fn test_lookup_by_exact_name() {
        let registry = LayoutRegistry::from_layouts(vec![acme()]).unwrap();

        assert_eq!(registry.lookup("acme"), Some(&acme()));
        assert_eq!(registry.lookup("ACME"), None);
        assert_eq!(registry.lookup("unknown"), None);
    }

    #[test]
    fn test_duplicate_provider_rejected() {
        let result = LayoutRegistry::from_layouts(vec![acme(), acme()]);

        assert!(matches!(
            result,
            Err(LayoutError::DuplicateProvider(name)) if name == "acme"
        ));
    }

    #[test]
    fn test_load_dir_reads_json_files_only() {
        let dir = tempfile::tempdir().unwrap();

        let mut acme_file = std::fs::File::create(dir.path().join("acme.json")).unwrap();
        write!(
            acme_file,
            r#"{{"provider_name": "acme", "has_header": true, "columns": ["uuid", "vin"]}}"#
        )
        .unwrap();

        let mut other = std::fs::File::create(dir.path().join("notes.txt")).unwrap();
        write!(other, "not a layout").unwrap();

        let registry = LayoutRegistry::load_dir(dir.path()).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("acme"), Some(&acme()));
    }

    #[test]
    fn test_load_dir_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();

        let mut bad = std::fs::File::create(dir.path().join("bad.json")).unwrap();
        write!(bad, "{{ not json").unwrap();

        assert!(matches!(
            LayoutRegistry::load_dir(dir.path()),
            Err(LayoutError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_dir_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        assert!(matches!(
            LayoutRegistry::load_dir(&missing),
            Err(LayoutError::ReadDir { .. })
        ));
    }
}
