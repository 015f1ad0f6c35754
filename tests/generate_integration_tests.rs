//! End-to-end install tests driving the library the way the `generate`
//! command does: a registry over fixture blueprint directories, a project
//! root in a temp directory, and a scripted UI capturing output lines.

mod utils;

use std::fs;
use std::path::{Path, PathBuf};

use stencil::blueprint::definition::BlueprintDefinition;
use stencil::error::Error;
use stencil::install::{self, Entity, InstallContext};
use stencil::packages::NullGateway;
use stencil::project::Project;
use stencil::registry::Registry;
use stencil::renderer::MiniJinjaRenderer;
use tempfile::TempDir;
use utils::{write_file, ScriptedUi};

fn component_fixture(blueprints: &Path) {
    write_file(
        &blueprints.join("component/files/app/__path__/__name__.js"),
        "export const name = '{{ dasherizedModuleName }}';\n",
    );
}

struct Harness {
    _ws: TempDir,
    blueprints: PathBuf,
    target: PathBuf,
}

impl Harness {
    fn new() -> Self {
        let ws = TempDir::new().unwrap();
        let blueprints = ws.path().join("blueprints");
        let target = ws.path().join("my-app");
        fs::create_dir_all(&blueprints).unwrap();
        fs::create_dir_all(&target).unwrap();
        Self { _ws: ws, blueprints, target }
    }

    fn registry(&self) -> Registry {
        Registry::new(vec![self.blueprints.clone()])
    }

    fn project(&self) -> Project {
        Project::load(&self.target).unwrap()
    }
}

/// Blueprint structure
/// component/
///   files/
///     app/__path__/__name__.js
///
/// Expected output for entity `x-foo`
/// my-app/
///   app/components/x-foo.js
#[test]
fn installs_files_with_token_mapping_and_rendering() {
    let h = Harness::new();
    component_fixture(&h.blueprints);

    let registry = h.registry();
    let blueprint = registry.lookup("component").unwrap();
    let project = h.project();
    let renderer = MiniJinjaRenderer::new();
    let ui = ScriptedUi::silent();

    let ctx = InstallContext::new(
        &blueprint,
        Entity::named("x-foo"),
        &h.target,
        &project,
        &registry,
        &renderer,
        &ui,
        &NullGateway,
    );
    install::install(&ctx).unwrap();

    let out = h.target.join("app/components/x-foo.js");
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "export const name = 'x-foo';\n"
    );
    assert!(ui.has_line("installing component"));
    assert!(ui.has_line("  create app/components/x-foo.js"));
}

#[test]
fn reinstalling_identical_files_changes_nothing() {
    let h = Harness::new();
    component_fixture(&h.blueprints);

    let registry = h.registry();
    let blueprint = registry.lookup("component").unwrap();
    let project = h.project();
    let renderer = MiniJinjaRenderer::new();

    let first = ScriptedUi::silent();
    let ctx = InstallContext::new(
        &blueprint,
        Entity::named("x-foo"),
        &h.target,
        &project,
        &registry,
        &renderer,
        &first,
        &NullGateway,
    );
    install::install(&ctx).unwrap();

    let second = ScriptedUi::silent();
    let ctx = InstallContext::new(
        &blueprint,
        Entity::named("x-foo"),
        &h.target,
        &project,
        &registry,
        &renderer,
        &second,
        &NullGateway,
    );
    install::install(&ctx).unwrap();

    assert!(second.has_line("  identical app/components/x-foo.js"));
    assert!(!second.lines().iter().any(|l| l.starts_with("  create")));
}

#[test]
fn entity_name_with_trailing_slash_is_rejected() {
    let h = Harness::new();
    component_fixture(&h.blueprints);

    let registry = h.registry();
    let blueprint = registry.lookup("component").unwrap();
    let project = h.project();
    let renderer = MiniJinjaRenderer::new();
    let ui = ScriptedUi::silent();

    let ctx = InstallContext::new(
        &blueprint,
        Entity::named("foo/"),
        &h.target,
        &project,
        &registry,
        &renderer,
        &ui,
        &NullGateway,
    );
    let err = install::install(&ctx).unwrap_err();
    assert!(matches!(err, Error::TrailingSlash { .. }));
    assert!(err.to_string().contains("re-run the command with \"foo\""));

    // Nothing was installed.
    assert!(!h.target.join("app").exists());
}

#[test]
fn missing_entity_name_is_rejected() {
    let h = Harness::new();
    component_fixture(&h.blueprints);

    let registry = h.registry();
    let blueprint = registry.lookup("component").unwrap();
    let project = h.project();
    let renderer = MiniJinjaRenderer::new();
    let ui = ScriptedUi::silent();

    let ctx = InstallContext::new(
        &blueprint,
        Entity::default(),
        &h.target,
        &project,
        &registry,
        &renderer,
        &ui,
        &NullGateway,
    );
    let err = install::install(&ctx).unwrap_err();
    assert!(matches!(err, Error::MissingEntityName));
}

#[test]
fn target_files_restricts_the_install() {
    let h = Harness::new();
    write_file(&h.blueprints.join("scaffold/files/app/kept.txt"), "kept\n");
    write_file(&h.blueprints.join("scaffold/files/docs/skipped.txt"), "skipped\n");

    let registry = h.registry();
    let blueprint = registry.lookup("scaffold").unwrap();
    let project = h.project();
    let renderer = MiniJinjaRenderer::new();
    let ui = ScriptedUi::silent();

    let mut ctx = InstallContext::new(
        &blueprint,
        Entity::named("anything"),
        &h.target,
        &project,
        &registry,
        &renderer,
        &ui,
        &NullGateway,
    );
    ctx.target_files = vec!["app/**".to_string()];
    install::install(&ctx).unwrap();

    assert!(h.target.join("app/kept.txt").is_file());
    assert!(!h.target.join("docs/skipped.txt").exists());
}

#[test]
fn update_ignored_files_are_skipped_in_existing_projects() {
    let h = Harness::new();
    write_file(&h.blueprints.join("scaffold/files/README.md"), "readme\n");
    write_file(&h.blueprints.join("scaffold/files/app/code.js"), "code\n");
    // A manifest makes this an existing project.
    write_file(&h.target.join("package.json"), r#"{"name": "my-app"}"#);

    let registry = h.registry();
    let blueprint = registry.lookup("scaffold").unwrap();
    let project = h.project();
    let renderer = MiniJinjaRenderer::new();
    let ui = ScriptedUi::silent();

    let ctx = InstallContext::new(
        &blueprint,
        Entity::named("anything"),
        &h.target,
        &project,
        &registry,
        &renderer,
        &ui,
        &NullGateway,
    );
    install::install(&ctx).unwrap();

    assert!(h.target.join("app/code.js").is_file());
    assert!(!h.target.join("README.md").exists());
}

#[test]
fn dry_run_previews_without_writing() {
    let h = Harness::new();
    component_fixture(&h.blueprints);

    let registry = h.registry();
    let blueprint = registry.lookup("component").unwrap();
    let project = h.project();
    let renderer = MiniJinjaRenderer::new();
    let ui = ScriptedUi::silent();

    let mut ctx = InstallContext::new(
        &blueprint,
        Entity::named("x-foo"),
        &h.target,
        &project,
        &registry,
        &renderer,
        &ui,
        &NullGateway,
    );
    ctx.dry_run = true;
    install::install(&ctx).unwrap();

    assert!(ui.has_line("  create app/components/x-foo.js"));
    assert!(!h.target.join("app").exists());
}

/// Pod layout: the entity name moves into the path and the pod prefix from
/// the project manifest is prepended.
#[test]
fn pod_layout_places_files_under_the_pod_prefix() {
    let h = Harness::new();
    component_fixture(&h.blueprints);
    write_file(
        &h.target.join("package.json"),
        r#"{"name": "my-app", "podModulePrefix": "my-app/pods"}"#,
    );

    let registry = h.registry();
    let blueprint = registry.lookup("component").unwrap();
    let project = h.project();
    let renderer = MiniJinjaRenderer::new();
    let ui = ScriptedUi::silent();

    let mut ctx = InstallContext::new(
        &blueprint,
        Entity::named("x-foo"),
        &h.target,
        &project,
        &registry,
        &renderer,
        &ui,
        &NullGateway,
    );
    ctx.pod = true;
    install::install(&ctx).unwrap();

    assert!(h.target.join("app/my-app/pods/x-foo/component.js").is_file());
}

struct GreetingDefinition;

impl BlueprintDefinition for GreetingDefinition {
    fn locals(
        &self,
        _ctx: &InstallContext<'_>,
        module_name: &str,
    ) -> stencil::error::Result<Option<serde_json::Map<String, serde_json::Value>>> {
        let mut locals = serde_json::Map::new();
        locals.insert(
            "greeting".to_string(),
            serde_json::Value::String(format!("hello {module_name}")),
        );
        Ok(Some(locals))
    }
}

/// A paired `-test` blueprint with no locals hook of its own inherits the
/// main blueprint's custom locals.
#[test]
fn paired_blueprint_inherits_custom_locals() {
    let h = Harness::new();
    write_file(&h.blueprints.join("widget/files/app/__name__.js"), "{{ greeting }}\n");
    write_file(
        &h.blueprints.join("widget-test/files/tests/__test__.js"),
        "test: {{ greeting }}\n",
    );

    let mut registry = h.registry();
    registry.register("widget", || Box::new(GreetingDefinition));

    let blueprint = registry.lookup("widget").unwrap();
    let paired = registry.lookup_paired("widget", "test").unwrap().unwrap();
    let project = h.project();
    let renderer = MiniJinjaRenderer::new();
    let ui = ScriptedUi::silent();

    let ctx = InstallContext::new(
        &blueprint,
        Entity::named("x-foo"),
        &h.target,
        &project,
        &registry,
        &renderer,
        &ui,
        &NullGateway,
    );
    install::install(&ctx).unwrap();

    let mut paired_ctx = InstallContext::new(
        &paired,
        Entity::named("x-foo"),
        &h.target,
        &project,
        &registry,
        &renderer,
        &ui,
        &NullGateway,
    );
    paired_ctx.inherit_locals_from = Some(&blueprint);
    install::install(&paired_ctx).unwrap();

    assert_eq!(
        fs::read_to_string(h.target.join("app/x-foo.js")).unwrap(),
        "hello x-foo\n"
    );
    assert_eq!(
        fs::read_to_string(h.target.join("tests/x-foo-test.js")).unwrap(),
        "test: hello x-foo\n"
    );
}

/// A blueprint shadowed by a project-local directory of the same name wins
/// the lookup, exactly as a real project's `blueprints/` directory
/// overrides a built-in.
#[test]
fn project_local_blueprint_shadows_lower_priority_sources() {
    let ws = TempDir::new().unwrap();
    let local = ws.path().join("local");
    let builtin = ws.path().join("builtin");
    let target = ws.path().join("my-app");
    fs::create_dir_all(&target).unwrap();
    write_file(&local.join("component/files/marker.txt"), "local\n");
    write_file(&builtin.join("component/files/marker.txt"), "builtin\n");

    let registry = Registry::new(vec![local, builtin]);
    let blueprint = registry.lookup("component").unwrap();
    let project = Project::load(&target).unwrap();
    let renderer = MiniJinjaRenderer::new();
    let ui = ScriptedUi::silent();

    let ctx = InstallContext::new(
        &blueprint,
        Entity::named("x-foo"),
        &target,
        &project,
        &registry,
        &renderer,
        &ui,
        &NullGateway,
    );
    install::install(&ctx).unwrap();

    assert_eq!(fs::read_to_string(target.join("marker.txt")).unwrap(), "local\n");
}

/// Static `file_map` rules from blueprint.yaml apply before token
/// substitution.
#[test]
fn static_file_map_rules_rewrite_paths() {
    let h = Harness::new();
    write_file(&h.blueprints.join("mapped/files/src/__name__.js"), "x\n");
    write_file(
        &h.blueprints.join("mapped/blueprint.yaml"),
        "file_map:\n  '^src/': 'lib/'\n",
    );

    let registry = h.registry();
    let blueprint = registry.lookup("mapped").unwrap();
    let project = h.project();
    let renderer = MiniJinjaRenderer::new();
    let ui = ScriptedUi::silent();

    let ctx = InstallContext::new(
        &blueprint,
        Entity::named("x-foo"),
        &h.target,
        &project,
        &registry,
        &renderer,
        &ui,
        &NullGateway,
    );
    install::install(&ctx).unwrap();

    assert!(h.target.join("lib/x-foo.js").is_file());
}
