use indexmap::IndexMap;

use crate::error::Result;
use crate::install::{self, InstallContext};
use crate::packages::PackageDescriptor;

use super::definition::BlueprintDefinition;

/// Factory for a coded blueprint definition.
pub type DefinitionFactory = fn() -> Box<dyn BlueprintDefinition>;

/// Coded definitions bound to blueprint directories by name. A project or
/// addon directory shadowing one of these names keeps its hooks.
pub fn builtin_definitions() -> IndexMap<&'static str, DefinitionFactory> {
    let mut definitions: IndexMap<&'static str, DefinitionFactory> = IndexMap::new();
    definitions.insert("server", || Box::new(ServerDefinition));
    definitions.insert("http-mock", || Box::new(HttpMockDefinition));
    definitions
}

/// Generates a server directory for mocks and proxies. Takes no entity
/// name.
pub struct ServerDefinition;

impl BlueprintDefinition for ServerDefinition {
    fn normalize_entity_name(&self, _name: Option<&str>) -> Result<String> {
        Ok(String::new())
    }

    fn after_install(
        &self,
        ctx: &InstallContext<'_>,
        _locals: &serde_json::Value,
    ) -> Result<()> {
        let mut wanted = Vec::new();
        if ctx.project.is_package_missing("morgan") {
            wanted.push(PackageDescriptor::versioned("morgan", "^1.3.2"));
        }
        if ctx.project.is_package_missing("glob") {
            wanted.push(PackageDescriptor::versioned("glob", "^4.0.5"));
        }

        if !ctx.dry_run && !wanted.is_empty() {
            ctx.add_packages_to_project(&wanted, true)?;
        }
        Ok(())
    }
}

/// Generates a mock api endpoint in the /api prefix. Chain-installs the
/// `server` blueprint first.
pub struct HttpMockDefinition;

impl BlueprintDefinition for HttpMockDefinition {
    fn locals(
        &self,
        _ctx: &InstallContext<'_>,
        module_name: &str,
    ) -> Result<Option<serde_json::Map<String, serde_json::Value>>> {
        let mut locals = serde_json::Map::new();
        locals.insert(
            "path".to_string(),
            serde_json::Value::String(format!("/{}", module_name.trim_start_matches('/'))),
        );
        Ok(Some(locals))
    }

    fn before_install(
        &self,
        ctx: &InstallContext<'_>,
        _locals: &serde_json::Value,
    ) -> Result<()> {
        let server = ctx.registry.lookup("server")?;
        install::install(&ctx.for_blueprint(&server))
    }

    fn after_install(
        &self,
        ctx: &InstallContext<'_>,
        _locals: &serde_json::Value,
    ) -> Result<()> {
        if !ctx.dry_run && ctx.project.is_package_missing("express") {
            ctx.add_packages_to_project(
                &[PackageDescriptor::versioned("express", "^4.8.5")],
                true,
            )?;
        }
        Ok(())
    }
}
