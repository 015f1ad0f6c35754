use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::install::InstallContext;
use crate::naming::ModuleNames;
use crate::tokens::{compute_file_map, TokenContext};

/// The fully materialized template variables for one installation, plus
/// the token map the walker applies to paths.
pub struct ResolvedLocals {
    pub locals: Value,
    pub tokens: IndexMap<String, String>,
}

/// Computes the template variables for an installation.
///
/// Runs strictly after entity-name normalization and strictly before any
/// file is rendered. Merge order: built-in casing variants and flags,
/// then the blueprint config's static locals, then the custom locals hook
/// (custom keys win). The `fileMap` key is always recomputed last.
pub fn resolve_locals(
    ctx: &InstallContext<'_>,
    module_name: &str,
) -> Result<ResolvedLocals> {
    let names = ModuleNames::derive(module_name);

    let mut locals = Map::new();
    locals.insert("moduleName".into(), json!(names.module_name));
    locals.insert("camelizedModuleName".into(), json!(names.camelized));
    locals.insert("classifiedModuleName".into(), json!(names.classified));
    locals.insert("dasherizedModuleName".into(), json!(names.dasherized));
    locals.insert("decamelizedModuleName".into(), json!(names.decamelized));
    locals.insert("dasherizedPackageName".into(), json!(names.dasherized_package_name));
    locals.insert("classifiedPackageName".into(), json!(names.classified_package_name));
    locals.insert("blueprintName".into(), json!(ctx.blueprint.name));
    locals.insert("pod".into(), json!(ctx.pod));
    locals.insert(
        "podPath".into(),
        json!(ctx.project.pod_module_prefix.as_deref().unwrap_or("")),
    );
    locals.insert("inAddon".into(), json!(ctx.in_addon));
    locals.insert("inDummy".into(), json!(ctx.in_dummy));
    locals.insert("inRepoAddon".into(), json!(ctx.in_repo_addon));

    for (key, value) in &ctx.blueprint.config().locals {
        if key != "fileMap" {
            locals.insert(key.clone(), value.clone());
        }
    }

    // A paired blueprint without its own locals hook inherits the main
    // blueprint's.
    let mut custom = ctx.blueprint.definition().locals(ctx, module_name)?;
    if custom.is_none() {
        if let Some(main) = ctx.inherit_locals_from {
            custom = main.definition().locals(ctx, module_name)?;
        }
    }
    if let Some(custom) = custom {
        for (key, value) in custom {
            if key != "fileMap" {
                locals.insert(key, value);
            }
        }
    }

    let module_path = locals.get("path").and_then(Value::as_str).map(str::to_string);
    let token_ctx = TokenContext {
        blueprint_name: &ctx.blueprint.name,
        dasherized_module_name: &names.dasherized,
        module_path: module_path.as_deref(),
        pod: ctx.pod,
        pod_path: ctx.project.pod_module_prefix.as_deref().unwrap_or(""),
        has_path_token: ctx.blueprint.has_path_token(),
        in_addon: ctx.in_addon,
        in_dummy: ctx.in_dummy,
        in_repo_addon: ctx.in_repo_addon.as_deref(),
    };
    let tokens = compute_file_map(&token_ctx, ctx.blueprint.definition());
    locals.insert("fileMap".into(), serde_json::to_value(&tokens)?);

    Ok(ResolvedLocals { locals: Value::Object(locals), tokens })
}
