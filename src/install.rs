use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::blueprint::Blueprint;
use crate::conflict::{ConflictResolver, Resolution};
use crate::constants::{DEFAULT_IGNORED_FILES, DEFAULT_IGNORED_UPDATE_FILES};
use crate::error::{Error, Result};
use crate::ignore::build_ignore_set;
use crate::locals::{resolve_locals, ResolvedLocals};
use crate::packages::{BowerPackageDescriptor, PackageDescriptor, PackageGateway};
use crate::project::Project;
use crate::registry::Registry;
use crate::renderer::TemplateRenderer;
use crate::ui::UserInterface;
use crate::walker::{FileAction, FileStatus, Walker};

/// The subject of a generation: a name plus options collected from the
/// CLI.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    pub name: Option<String>,
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl Entity {
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self { name: Some(name.into()), options: serde_json::Map::new() }
    }
}

/// Everything one install/uninstall run needs. Owned by a single run;
/// never shared across concurrent installs. Session state such as the
/// overwrite-all choice lives in the run, not in any process-wide global.
pub struct InstallContext<'a> {
    pub blueprint: &'a Blueprint,
    pub entity: Entity,
    pub target: &'a Path,
    pub project: &'a Project,
    pub registry: &'a Registry,
    pub renderer: &'a dyn TemplateRenderer,
    pub ui: &'a dyn UserInterface,
    pub packages: &'a dyn PackageGateway,
    pub dry_run: bool,
    pub pod: bool,
    pub in_addon: bool,
    pub in_dummy: bool,
    pub in_repo_addon: Option<String>,
    /// Glob restriction for partial re-generation; empty means all files.
    pub target_files: Vec<String>,
    pub ignored_files: Vec<String>,
    pub ignored_update_files: Vec<String>,
    /// Paired installs inherit this blueprint's custom locals when their
    /// own definition declares none.
    pub inherit_locals_from: Option<&'a Blueprint>,
}

impl<'a> InstallContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        blueprint: &'a Blueprint,
        entity: Entity,
        target: &'a Path,
        project: &'a Project,
        registry: &'a Registry,
        renderer: &'a dyn TemplateRenderer,
        ui: &'a dyn UserInterface,
        packages: &'a dyn PackageGateway,
    ) -> Self {
        Self {
            blueprint,
            entity,
            target,
            project,
            registry,
            renderer,
            ui,
            packages,
            dry_run: false,
            pod: false,
            in_addon: false,
            in_dummy: false,
            in_repo_addon: None,
            target_files: Vec::new(),
            ignored_files: DEFAULT_IGNORED_FILES.iter().map(|s| s.to_string()).collect(),
            ignored_update_files: DEFAULT_IGNORED_UPDATE_FILES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            inherit_locals_from: None,
        }
    }

    /// A child context for chain-installing another blueprint with the
    /// same collaborators and flags.
    pub fn for_blueprint<'b>(&'b self, blueprint: &'b Blueprint) -> InstallContext<'b> {
        InstallContext {
            blueprint,
            entity: self.entity.clone(),
            target: self.target,
            project: self.project,
            registry: self.registry,
            renderer: self.renderer,
            ui: self.ui,
            packages: self.packages,
            dry_run: self.dry_run,
            pod: self.pod,
            in_addon: self.in_addon,
            in_dummy: self.in_dummy,
            in_repo_addon: self.in_repo_addon.clone(),
            target_files: Vec::new(),
            ignored_files: self.ignored_files.clone(),
            ignored_update_files: self.ignored_update_files.clone(),
            inherit_locals_from: None,
        }
    }

    pub fn add_package_to_project(&self, name: &str, target: Option<&str>) -> Result<()> {
        let package = match target {
            Some(target) => PackageDescriptor::versioned(name, target),
            None => PackageDescriptor::new(name),
        };
        self.add_packages_to_project(&[package], true)
    }

    pub fn add_packages_to_project(
        &self,
        packages: &[PackageDescriptor],
        dev: bool,
    ) -> Result<()> {
        self.ui.write_line(&package_progress("install", "package", packages.iter().map(|p| p.name.as_str())));
        self.packages.add_packages(packages, dev)
    }

    pub fn remove_packages_from_project(
        &self,
        packages: &[PackageDescriptor],
    ) -> Result<()> {
        self.ui.write_line(&package_progress("uninstall", "package", packages.iter().map(|p| p.name.as_str())));
        self.packages.remove_packages(packages)
    }

    pub fn add_bower_packages_to_project(
        &self,
        packages: &[BowerPackageDescriptor],
    ) -> Result<()> {
        self.ui.write_line(&package_progress("install", "bower package", packages.iter().map(|p| p.name.as_str())));
        self.packages.add_bower_packages(packages)
    }

    pub fn remove_bower_packages_from_project(
        &self,
        packages: &[BowerPackageDescriptor],
    ) -> Result<()> {
        self.ui.write_line(&package_progress("uninstall", "bower package", packages.iter().map(|p| p.name.as_str())));
        self.packages.remove_bower_packages(packages)
    }
}

fn package_progress<'n>(
    verb: &str,
    noun: &str,
    names: impl Iterator<Item = &'n str>,
) -> String {
    let names: Vec<&str> = names.collect();
    if names.len() == 1 {
        format!("{verb} {noun} {}", names[0])
    } else {
        format!("{verb} {noun}s {}", names.join(", "))
    }
}

/// Lifecycle hooks, in the order the coordinator runs them.
#[derive(Debug, Clone, Copy)]
enum Hook {
    BeforeInstall,
    AfterInstall,
    BeforeUninstall,
    AfterUninstall,
}

impl Hook {
    fn name(self) -> &'static str {
        match self {
            Hook::BeforeInstall => "beforeInstall",
            Hook::AfterInstall => "afterInstall",
            Hook::BeforeUninstall => "beforeUninstall",
            Hook::AfterUninstall => "afterUninstall",
        }
    }
}

/// Primitive file operations the coordinator may request by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOp {
    Write,
    Remove,
}

fn primitive_actions() -> IndexMap<&'static str, FileOp> {
    let mut actions = IndexMap::new();
    actions.insert("write", FileOp::Write);
    actions.insert("remove", FileOp::Remove);
    actions
}

/// Installs the blueprint into the target tree.
///
/// Phases run strictly in sequence: normalize entity name, resolve
/// locals, beforeInstall, walk/render/apply each file, afterInstall. A
/// failing hook or an abort decision stops the run immediately; files
/// already written stay (no rollback).
pub fn install(ctx: &InstallContext<'_>) -> Result<()> {
    let actions = primitive_actions();
    let module_name =
        ctx.blueprint.definition().normalize_entity_name(ctx.entity.name.as_deref())?;
    let resolved = resolve_locals(ctx, &module_name)?;

    run_hook(ctx, Hook::BeforeInstall, &resolved)?;
    ctx.ui.write_line(&format!("installing {}", ctx.blueprint.name));
    apply_files(ctx, &resolved, &actions)?;
    run_hook(ctx, Hook::AfterInstall, &resolved)?;
    Ok(())
}

/// Removes what [`install`] would produce, using the same token and
/// locals computation so that generate/destroy are symmetric. Directories
/// the install created are pruned once they become empty; directories
/// with surviving content stay.
pub fn uninstall(ctx: &InstallContext<'_>) -> Result<()> {
    let actions = primitive_actions();
    let module_name =
        ctx.blueprint.definition().normalize_entity_name(ctx.entity.name.as_deref())?;
    let resolved = resolve_locals(ctx, &module_name)?;

    run_hook(ctx, Hook::BeforeUninstall, &resolved)?;
    ctx.ui.write_line(&format!("uninstalling {}", ctx.blueprint.name));
    remove_files(ctx, &resolved, &actions)?;
    run_hook(ctx, Hook::AfterUninstall, &resolved)?;
    Ok(())
}

fn run_hook(
    ctx: &InstallContext<'_>,
    hook: Hook,
    resolved: &ResolvedLocals,
) -> Result<()> {
    let definition = ctx.blueprint.definition();
    let result = match hook {
        Hook::BeforeInstall => definition.before_install(ctx, &resolved.locals),
        Hook::AfterInstall => definition.after_install(ctx, &resolved.locals),
        Hook::BeforeUninstall => definition.before_uninstall(ctx, &resolved.locals),
        Hook::AfterUninstall => definition.after_uninstall(ctx, &resolved.locals),
    };
    result.map_err(|e| match e {
        // A user abort inside a chained install stays informational.
        Error::ConflictAbort => Error::ConflictAbort,
        e => Error::Hook {
            blueprint: ctx.blueprint.name.clone(),
            hook: hook.name(),
            source: Box::new(e),
        },
    })
}

fn build_walker<'a>(
    ctx: &'a InstallContext<'_>,
    resolved: &'a ResolvedLocals,
) -> Result<Walker<'a>> {
    let mut ignored = ctx.ignored_files.clone();
    if ctx.project.is_existing() {
        ignored.extend(ctx.ignored_update_files.iter().cloned());
    }
    let ignored = build_ignore_set(&ignored)?;

    let target_filter = if ctx.target_files.is_empty() {
        None
    } else {
        Some(build_ignore_set(&ctx.target_files)?)
    };

    Ok(Walker::new(
        ctx.renderer,
        &resolved.locals,
        &resolved.tokens,
        ctx.blueprint.file_map_rules()?,
        ctx.blueprint.files_path(),
        ctx.target.to_path_buf(),
        target_filter,
        ignored,
    ))
}

fn apply_files(
    ctx: &InstallContext<'_>,
    resolved: &ResolvedLocals,
    actions: &IndexMap<&'static str, FileOp>,
) -> Result<()> {
    let walker = build_walker(ctx, resolved)?;
    let mut resolver =
        ConflictResolver::new(if ctx.dry_run { None } else { Some(ctx.ui) });

    for action in walker.iter() {
        let action = action?;
        match action.status {
            FileStatus::Create => {
                run_action(actions, "write", &action, ctx.dry_run)?;
                ctx.ui.write_line(&format!("  create {}", action.relative.display()));
            }
            FileStatus::Identical => {
                ctx.ui.write_line(&format!("  identical {}", action.relative.display()));
            }
            FileStatus::Conflict => match resolver.resolve(&action)? {
                Resolution::Overwrite => {
                    run_action(actions, "write", &action, ctx.dry_run)?;
                    ctx.ui
                        .write_line(&format!("  overwrite {}", action.relative.display()));
                }
                Resolution::Skip => {
                    ctx.ui.write_line(&format!("  skip {}", action.relative.display()));
                }
            },
        }
    }
    Ok(())
}

fn remove_files(
    ctx: &InstallContext<'_>,
    resolved: &ResolvedLocals,
    actions: &IndexMap<&'static str, FileOp>,
) -> Result<()> {
    let walker = build_walker(ctx, resolved)?;
    let mut parents: Vec<PathBuf> = Vec::new();

    for action in walker.iter() {
        let action = action?;
        if action.output.is_file() {
            run_action(actions, "remove", &action, ctx.dry_run)?;
            ctx.ui.write_line(&format!("  remove {}", action.relative.display()));
            if let Some(parent) = action.output.parent() {
                parents.push(parent.to_path_buf());
            }
        }
    }

    if !ctx.dry_run {
        prune_empty_dirs(&parents, ctx.target);
    }
    Ok(())
}

fn run_action(
    actions: &IndexMap<&'static str, FileOp>,
    name: &str,
    action: &FileAction,
    dry_run: bool,
) -> Result<()> {
    let op = actions
        .get(name)
        .copied()
        .ok_or_else(|| Error::ActionNotFound { action: name.to_string() })?;
    if dry_run {
        return Ok(());
    }
    match op {
        FileOp::Write => {
            if let Some(parent) = action.output.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&action.output, action.content.as_bytes())?;
        }
        FileOp::Remove => {
            fs::remove_file(&action.output)?;
        }
    }
    Ok(())
}

/// Removes now-empty ancestors of removed files, bottom-up, stopping at
/// the target root or the first non-empty directory.
fn prune_empty_dirs(parents: &[PathBuf], root: &Path) {
    for parent in parents {
        let mut dir = parent.as_path();
        while dir != root && dir.starts_with(root) {
            let is_empty = fs::read_dir(dir)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if !is_empty || fs::remove_dir(dir).is_err() {
                break;
            }
            match dir.parent() {
                Some(next) => dir = next,
                None => break,
            }
        }
    }
}
