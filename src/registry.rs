use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::blueprint::builtin::{builtin_definitions, DefinitionFactory};
use crate::blueprint::Blueprint;
use crate::constants::{CONFIG_FILE, FILES_DIR};
use crate::error::{Error, Result};

/// Resolves blueprint names against an ordered list of lookup directories.
///
/// Earlier directories shadow later ones: a project-local blueprint of the
/// same name wins over an addon's, which wins over a built-in. Matches are
/// never merged.
pub struct Registry {
    paths: Vec<PathBuf>,
    coded: IndexMap<String, DefinitionFactory>,
}

impl Registry {
    /// A registry searching `paths` in priority order, with the built-in
    /// coded definitions pre-registered.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        let coded = builtin_definitions()
            .into_iter()
            .map(|(name, factory)| (name.to_string(), factory))
            .collect();
        Self { paths, coded }
    }

    /// Binds a coded definition to a blueprint name. The definition
    /// attaches to whichever directory the lookup resolves for that name.
    pub fn register(&mut self, name: &str, factory: DefinitionFactory) {
        self.coded.insert(name.to_string(), factory);
    }

    /// Resolves `name` to a blueprint, failing when none is found.
    pub fn lookup(&self, name: &str) -> Result<Blueprint> {
        self.lookup_opt(name)?
            .ok_or_else(|| Error::UnknownBlueprint { name: name.to_string() })
    }

    /// Like [`lookup`](Self::lookup) but returns `None` for a missing
    /// blueprint instead of an error.
    pub fn lookup_opt(&self, name: &str) -> Result<Option<Blueprint>> {
        // An explicit filesystem path bypasses the search order.
        if name.contains('/') || name.contains('\\') || Path::new(name).is_absolute() {
            let path = Path::new(name);
            if is_blueprint_dir(path) {
                return self.load_at(path).map(Some);
            }
            return Ok(None);
        }

        for dir in &self.paths {
            let candidate = dir.join(name);
            if is_blueprint_dir(&candidate) {
                return self.load_at(&candidate).map(Some);
            }
        }
        Ok(None)
    }

    /// Resolves the companion blueprint `<name>-<suffix>` by convention.
    /// Missing companions are not an error.
    pub fn lookup_paired(&self, name: &str, suffix: &str) -> Result<Option<Blueprint>> {
        self.lookup_opt(&format!("{name}-{suffix}"))
    }

    /// Enumerates blueprint names per lookup directory, in priority order.
    pub fn list(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.paths
            .iter()
            .map(|dir| {
                let mut names: Vec<String> = std::fs::read_dir(dir)
                    .map(|entries| {
                        entries
                            .filter_map(|entry| entry.ok())
                            .filter(|entry| is_blueprint_dir(&entry.path()))
                            .map(|entry| entry.file_name().to_string_lossy().into_owned())
                            .collect()
                    })
                    .unwrap_or_default();
                names.sort();
                (dir.clone(), names)
            })
            .collect()
    }

    fn load_at(&self, path: &Path) -> Result<Blueprint> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match self.coded.get(&name) {
            Some(factory) => Blueprint::load_with_definition(path, factory()),
            None => Blueprint::load(path),
        }
    }
}

fn is_blueprint_dir(path: &Path) -> bool {
    path.join(FILES_DIR).is_dir() || path.join(CONFIG_FILE).is_file()
}
