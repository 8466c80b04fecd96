//! Typed configuration models and defaults.
//!
//! # Design
//! - Pure data carriers with serde defaults; validation is explicit.
//! - Defaults mirror the CAD shop-floor workflow this tool grew out of.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Top-level configuration for a replication run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicatorConfig {
    /// Priority-ordered roots searched for design files; first match wins.
    pub source_roots: Vec<PathBuf>,
    /// Base directory the material/thickness tree is created under.
    pub destination_base: PathBuf,
    /// Maximum directory depth searched below each root. A depth of 1
    /// limits the search to files directly inside the root; each increment
    /// descends one further subdirectory level.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Recognized design-file extensions, highest priority first.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Directory that receives not-found manifests.
    #[serde(default = "default_manifest_dir")]
    pub manifest_dir: PathBuf,
    /// CSV ingestion settings.
    #[serde(default)]
    pub ingest: IngestSettings,
}

/// Settings for turning CSV rows into work items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSettings {
    /// Directory scanned for `*.csv` files.
    #[serde(default = "default_csv_dir")]
    pub csv_dir: PathBuf,
    /// Column holding the product name.
    #[serde(default = "default_product_column")]
    pub product_column: String,
    /// Column holding the thickness label.
    #[serde(default = "default_thickness_column")]
    pub thickness_column: String,
    /// Column holding the requested quantity.
    #[serde(default = "default_quantity_column")]
    pub quantity_column: String,
    /// Prefix stripped from a CSV file name to derive the material label.
    #[serde(default = "default_material_prefix")]
    pub material_prefix: String,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            csv_dir: default_csv_dir(),
            product_column: default_product_column(),
            thickness_column: default_thickness_column(),
            quantity_column: default_quantity_column(),
            material_prefix: default_material_prefix(),
        }
    }
}

fn default_max_depth() -> usize {
    5
}

fn default_extensions() -> Vec<String> {
    [
        "dwg",
        "dxf",
        "step",
        "stp",
        "iges",
        "igs",
        "sat",
        "3dm",
        "catpart",
        "catproduct",
        "prt",
        "asm",
    ]
    .iter()
    .map(|ext| (*ext).to_string())
    .collect()
}

fn default_manifest_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_csv_dir() -> PathBuf {
    PathBuf::from("db")
}

fn default_product_column() -> String {
    "Product Name".to_string()
}

fn default_thickness_column() -> String {
    "Thickness(mm)".to_string()
}

fn default_quantity_column() -> String {
    "Quantity".to_string()
}

fn default_material_prefix() -> String {
    "Copy of THICKNESS AND MATERIAL DATA - ".to_string()
}

impl ReplicatorConfig {
    /// Load and validate configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Io` or `Parse` for unreadable or malformed files and
    /// `InvalidField` when validation fails.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            operation: "read_config",
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde defaults cannot express.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` for an empty root list, an empty destination,
    /// a zero search depth, or a missing/blank extension list.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.source_roots.is_empty() {
            return Err(ConfigError::InvalidField {
                section: "replicator",
                field: "source_roots",
                reason: "must list at least one source root",
                value: None,
            });
        }
        if self.destination_base.as_os_str().is_empty() {
            return Err(ConfigError::InvalidField {
                section: "replicator",
                field: "destination_base",
                reason: "must not be empty",
                value: None,
            });
        }
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidField {
                section: "replicator",
                field: "max_depth",
                reason: "must be a positive integer",
                value: Some(self.max_depth.to_string()),
            });
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::InvalidField {
                section: "replicator",
                field: "extensions",
                reason: "must list at least one extension",
                value: None,
            });
        }
        if let Some(blank) = self.extensions.iter().find(|ext| ext.trim().is_empty()) {
            return Err(ConfigError::InvalidField {
                section: "replicator",
                field: "extensions",
                reason: "extensions cannot be blank",
                value: Some(blank.clone()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::fs;
    use tempfile::TempDir;

    fn minimal_config() -> ReplicatorConfig {
        ReplicatorConfig {
            source_roots: vec![PathBuf::from("/srv/designs")],
            destination_base: PathBuf::from("/srv/layout"),
            max_depth: default_max_depth(),
            extensions: default_extensions(),
            manifest_dir: default_manifest_dir(),
            ingest: IngestSettings::default(),
        }
    }

    #[test]
    fn defaults_cover_the_legacy_workflow() {
        let ingest = IngestSettings::default();
        assert_eq!(ingest.csv_dir, PathBuf::from("db"));
        assert_eq!(ingest.product_column, "Product Name");
        assert_eq!(ingest.thickness_column, "Thickness(mm)");
        assert_eq!(ingest.quantity_column, "Quantity");
        assert!(ingest.material_prefix.starts_with("Copy of"));

        let extensions = default_extensions();
        assert_eq!(extensions.first().map(String::as_str), Some("dwg"));
        assert!(extensions.contains(&"dxf".to_string()));
    }

    #[test]
    fn load_applies_defaults_to_sparse_files() -> Result<(), Box<dyn Error>> {
        let temp = TempDir::new()?;
        let path = temp.path().join("platewright.toml");
        fs::write(
            &path,
            r#"
source_roots = ["/mnt/share/designs"]
destination_base = "/mnt/share/layout"
"#,
        )?;

        let config = ReplicatorConfig::load(&path)?;
        assert_eq!(config.source_roots.len(), 1);
        assert_eq!(config.max_depth, 5);
        assert!(!config.extensions.is_empty());
        assert_eq!(config.ingest.csv_dir, PathBuf::from("db"));
        Ok(())
    }

    #[test]
    fn load_round_trips_through_toml() -> Result<(), Box<dyn Error>> {
        let config = minimal_config();
        let rendered = toml::to_string_pretty(&config)?;
        let parsed: ReplicatorConfig = toml::from_str(&rendered)?;
        assert_eq!(parsed.source_roots, config.source_roots);
        assert_eq!(parsed.extensions, config.extensions);
        assert_eq!(parsed.ingest.material_prefix, config.ingest.material_prefix);
        Ok(())
    }

    #[test]
    fn validate_rejects_empty_roots() {
        let mut config = minimal_config();
        config.source_roots.clear();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "source_roots",
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_zero_depth() {
        let mut config = minimal_config();
        config.max_depth = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "max_depth",
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_blank_extensions() {
        let mut config = minimal_config();
        config.extensions = vec!["dwg".to_string(), "  ".to_string()];
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "extensions",
                ..
            }
        ));
    }

    #[test]
    fn load_reports_missing_files() {
        let err = ReplicatorConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.source().is_some());
    }
}
