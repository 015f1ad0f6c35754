use indexmap::IndexMap;

use crate::error::Result;
use crate::install::InstallContext;
use crate::tokens::TokenContext;

/// The hooks a blueprint may customize.
///
/// Every method has a default; overriding one shadows it entirely. An
/// override that wants the stock behavior as well calls the matching free
/// function in [`defaults`] explicitly, rather than relying on any
/// inheritance machinery.
pub trait BlueprintDefinition {
    /// Validates and possibly rewrites the entity name before anything
    /// else reads it. The default requires a non-empty name without a
    /// trailing path separator.
    fn normalize_entity_name(&self, name: Option<&str>) -> Result<String> {
        defaults::normalize_entity_name(name)
    }

    /// Custom template variables, shallow-merged over the built-in
    /// derivations (custom keys win; `fileMap` is always recomputed by the
    /// engine).
    fn locals(
        &self,
        _ctx: &InstallContext<'_>,
        _module_name: &str,
    ) -> Result<Option<serde_json::Map<String, serde_json::Value>>> {
        Ok(None)
    }

    /// Extra path tokens merged on top of the built-ins; may override
    /// them.
    fn file_map_tokens(&self, _ctx: &TokenContext<'_>) -> IndexMap<String, String> {
        IndexMap::new()
    }

    fn before_install(
        &self,
        _ctx: &InstallContext<'_>,
        _locals: &serde_json::Value,
    ) -> Result<()> {
        Ok(())
    }

    fn after_install(
        &self,
        _ctx: &InstallContext<'_>,
        _locals: &serde_json::Value,
    ) -> Result<()> {
        Ok(())
    }

    fn before_uninstall(
        &self,
        _ctx: &InstallContext<'_>,
        _locals: &serde_json::Value,
    ) -> Result<()> {
        Ok(())
    }

    fn after_uninstall(
        &self,
        _ctx: &InstallContext<'_>,
        _locals: &serde_json::Value,
    ) -> Result<()> {
        Ok(())
    }
}

/// Stock hook behavior, callable from overrides.
pub mod defaults {
    use crate::error::{Error, Result};

    pub fn normalize_entity_name(name: Option<&str>) -> Result<String> {
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(Error::MissingEntityName),
        };

        if name.ends_with('/') || name.ends_with('\\') {
            return Err(Error::TrailingSlash {
                name: name.to_string(),
                suggestion: name.trim_end_matches(['/', '\\']).to_string(),
            });
        }

        Ok(name.to_string())
    }
}

/// Definition for data-only blueprints: every hook keeps its default.
pub struct DefaultDefinition;

impl BlueprintDefinition for DefaultDefinition {}
