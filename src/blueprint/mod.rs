pub mod builtin;
pub mod definition;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::constants::{CONFIG_FILE, FILES_DIR};
use crate::error::{Error, Result};

use definition::{BlueprintDefinition, DefaultDefinition};

/// Optional on-disk configuration for a blueprint
/// (`<blueprint>/blueprint.yaml`).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BlueprintConfig {
    /// One-line description shown by `list`.
    #[serde(default)]
    pub description: String,

    /// Names for positional CLI arguments beyond the entity name.
    #[serde(default)]
    pub anonymous_options: Vec<String>,

    /// Static path rewrite rules, regex -> replacement, applied before
    /// token substitution.
    #[serde(default)]
    pub file_map: IndexMap<String, String>,

    /// Static template variables merged into the built-in locals.
    #[serde(default)]
    pub locals: serde_json::Map<String, serde_json::Value>,
}

/// A named template bundle plus its hooks.
///
/// Immutable once loaded; one `Blueprint` may serve several installs, each
/// of which gets its own context, locals, and file map.
pub struct Blueprint {
    pub name: String,
    pub path: PathBuf,
    config: BlueprintConfig,
    definition: Box<dyn BlueprintDefinition>,
}

impl std::fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blueprint")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Blueprint {
    /// Loads a data-only blueprint (default hooks) from a directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_definition(path, Box::new(DefaultDefinition))
    }

    /// Loads a blueprint bound to a coded definition. The name is derived
    /// from the directory name.
    pub fn load_with_definition<P: AsRef<Path>>(
        path: P,
        definition: Box<dyn BlueprintDefinition>,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let config_path = path.join(CONFIG_FILE);
        let config = if config_path.is_file() {
            let raw = std::fs::read_to_string(&config_path)?;
            serde_yaml::from_str(&raw).map_err(|source| Error::ConfigParse {
                path: config_path.display().to_string(),
                source,
            })?
        } else {
            BlueprintConfig::default()
        };

        Ok(Self { name, path, config, definition })
    }

    /// Root of this blueprint's file templates.
    pub fn files_path(&self) -> PathBuf {
        self.path.join(FILES_DIR)
    }

    pub fn description(&self) -> &str {
        &self.config.description
    }

    pub fn anonymous_options(&self) -> &[String] {
        &self.config.anonymous_options
    }

    pub fn config(&self) -> &BlueprintConfig {
        &self.config
    }

    pub fn definition(&self) -> &dyn BlueprintDefinition {
        self.definition.as_ref()
    }

    /// Whether any template path carries the `__path__` token. Pod-aware
    /// token mapping only applies to blueprints that do.
    pub fn has_path_token(&self) -> bool {
        let files = self.files_path();
        if !files.is_dir() {
            return false;
        }
        WalkDir::new(&files)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .any(|entry| entry.path().to_string_lossy().contains("__path__"))
    }

    /// Compiles the static file-map rules from the config.
    pub fn file_map_rules(&self) -> Result<Vec<(Regex, String)>> {
        self.config
            .file_map
            .iter()
            .map(|(pattern, replacement)| {
                let regex =
                    Regex::new(pattern).map_err(|source| Error::FileMapRule {
                        pattern: pattern.clone(),
                        source,
                    })?;
                Ok((regex, replacement.clone()))
            })
            .collect()
    }
}
