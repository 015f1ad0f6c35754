use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::{PROJECT_BLUEPRINTS_DIR, PROJECT_MANIFEST};
use crate::error::{Error, Result};

/// The subset of the project manifest the engine consults.
#[derive(Debug, Deserialize, Default)]
struct Manifest {
    name: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, String>,
    #[serde(rename = "podModulePrefix")]
    pod_module_prefix: Option<String>,
}

/// Project metadata for the target tree an install writes into.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub name: String,
    pub pod_module_prefix: Option<String>,
    pub is_addon: bool,
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
    existing: bool,
}

impl Project {
    /// Loads project metadata from `<root>/package.json`. A directory
    /// without a manifest is treated as a fresh, empty project.
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let manifest_path = root.join(PROJECT_MANIFEST);
        if !manifest_path.is_file() {
            return Ok(Self::bare(root));
        }

        let raw = std::fs::read_to_string(&manifest_path)?;
        let manifest: Manifest = serde_json::from_str(&raw).map_err(Error::Json)?;

        Ok(Self {
            root: root.to_path_buf(),
            name: manifest.name.unwrap_or_else(|| dir_name(root)),
            pod_module_prefix: manifest.pod_module_prefix,
            is_addon: manifest.keywords.iter().any(|k| k == "addon"),
            dependencies: manifest.dependencies,
            dev_dependencies: manifest.dev_dependencies,
            existing: true,
        })
    }

    /// A project with no manifest on disk.
    pub fn bare<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            root: root.to_path_buf(),
            name: dir_name(root),
            pod_module_prefix: None,
            is_addon: false,
            dependencies: BTreeMap::new(),
            dev_dependencies: BTreeMap::new(),
            existing: false,
        }
    }

    /// Whether the target already carries a project manifest. Installs into
    /// an existing project additionally skip the ignored-update file list.
    pub fn is_existing(&self) -> bool {
        self.existing
    }

    /// True when `name` is declared in neither dependencies nor
    /// devDependencies.
    pub fn is_package_missing(&self, name: &str) -> bool {
        !self.dependencies.contains_key(name) && !self.dev_dependencies.contains_key(name)
    }

    /// Directories searched for project-local blueprints, highest
    /// priority first.
    pub fn blueprint_lookup_paths(&self) -> Vec<PathBuf> {
        vec![self.root.join(PROJECT_BLUEPRINTS_DIR)]
    }
}

fn dir_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "app".to_string())
}
