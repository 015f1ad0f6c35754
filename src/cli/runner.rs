use std::env;
use std::path::PathBuf;

use crate::{
    blueprint::Blueprint,
    cli::{Cli, Commands, GenerateArgs, ListArgs},
    constants::{BUILTIN_BLUEPRINTS_ENV, PROJECT_BLUEPRINTS_DIR, TEST_SUFFIX},
    error::Result,
    install::{self, Entity, InstallContext},
    packages::{NullGateway, PackageGateway, ProcessGateway},
    project::Project,
    registry::Registry,
    renderer::MiniJinjaRenderer,
    ui::{TerminalUi, UserInterface},
};

/// Orchestrates one generate or destroy invocation.
pub struct Runner {
    args: GenerateArgs,
    project: Project,
    registry: Registry,
}

impl Runner {
    pub fn new(args: GenerateArgs) -> Result<Self> {
        let root = resolve_target(args.target.clone())?;
        let project = Project::load(&root)?;
        let registry = Registry::new(lookup_paths(&project));
        Ok(Self { args, project, registry })
    }

    pub fn generate(&self) -> Result<()> {
        self.execute(install::install)
    }

    pub fn destroy(&self) -> Result<()> {
        self.execute(install::uninstall)
    }

    /// Runs the operation for the named blueprint and then for its paired
    /// `-test` blueprint when one exists.
    fn execute(&self, op: fn(&InstallContext<'_>) -> Result<()>) -> Result<()> {
        let blueprint = self.registry.lookup(&self.args.blueprint)?;
        let renderer = MiniJinjaRenderer::new();
        let ui = TerminalUi::new();
        let packages = self.package_gateway();

        let ctx = self.context_for(&blueprint, &renderer, &ui, packages.as_ref());
        op(&ctx)?;

        if let Some(paired) = self.registry.lookup_paired(&blueprint.name, TEST_SUFFIX)? {
            let mut paired_ctx =
                self.context_for(&paired, &renderer, &ui, packages.as_ref());
            paired_ctx.inherit_locals_from = Some(&blueprint);
            op(&paired_ctx)?;
        }
        Ok(())
    }

    fn context_for<'a>(
        &'a self,
        blueprint: &'a Blueprint,
        renderer: &'a MiniJinjaRenderer,
        ui: &'a TerminalUi,
        packages: &'a dyn PackageGateway,
    ) -> InstallContext<'a> {
        let mut ctx = InstallContext::new(
            blueprint,
            self.entity_for(blueprint),
            &self.project.root,
            &self.project,
            &self.registry,
            renderer,
            ui,
            packages,
        );
        ctx.dry_run = self.args.dry_run;
        ctx.pod = self.args.pod;
        ctx.in_addon = self.project.is_addon && !self.args.dummy;
        ctx.in_dummy = self.args.dummy;
        ctx.in_repo_addon = self.args.in_repo_addon.clone();
        ctx
    }

    /// Pairs trailing positional values with the blueprint's declared
    /// anonymous options; surplus values are dropped.
    fn entity_for(&self, blueprint: &Blueprint) -> Entity {
        let mut options = serde_json::Map::new();
        for (key, value) in blueprint.anonymous_options().iter().zip(&self.args.extra) {
            options.insert(key.clone(), serde_json::Value::String(value.clone()));
        }
        Entity { name: self.args.entity_name.clone(), options }
    }

    fn package_gateway(&self) -> Box<dyn PackageGateway> {
        if self.args.dry_run || self.args.skip_npm {
            Box::new(NullGateway)
        } else {
            Box::new(ProcessGateway::new(&self.project.root))
        }
    }
}

/// Main entry point for CLI execution.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate(args) => Runner::new(args)?.generate(),
        Commands::Destroy(args) => Runner::new(args)?.destroy(),
        Commands::List(args) => list(args),
    }
}

fn list(args: ListArgs) -> Result<()> {
    let root = resolve_target(args.target)?;
    let project = Project::load(&root)?;
    let registry = Registry::new(lookup_paths(&project));
    let ui = TerminalUi::new();

    for (dir, names) in registry.list() {
        if names.is_empty() {
            continue;
        }
        ui.write_line(&format!("Available blueprints ({}):", dir.display()));
        for name in names {
            let description = registry
                .lookup(&name)
                .map(|blueprint| blueprint.description().to_string())
                .unwrap_or_default();
            if description.is_empty() {
                ui.write_line(&format!("  {name}"));
            } else {
                ui.write_line(&format!("  {name}: {description}"));
            }
        }
    }
    Ok(())
}

fn resolve_target(target: Option<PathBuf>) -> Result<PathBuf> {
    match target {
        Some(dir) => Ok(dir),
        None => Ok(env::current_dir()?),
    }
}

/// Blueprint lookup directories, highest priority first: project-local,
/// then the environment override, then the blueprints shipped next to the
/// executable.
fn lookup_paths(project: &Project) -> Vec<PathBuf> {
    let mut paths = project.blueprint_lookup_paths();
    if let Ok(dir) = env::var(BUILTIN_BLUEPRINTS_ENV) {
        if !dir.is_empty() {
            paths.push(PathBuf::from(dir));
        }
    }
    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            paths.push(dir.join(PROJECT_BLUEPRINTS_DIR));
        }
    }
    paths
}
