use cruet::string::pluralize::to_plural;
use indexmap::IndexMap;

use crate::blueprint::definition::BlueprintDefinition;

/// Inputs for the token computation, assembled by the locals resolver
/// after entity-name normalization.
#[derive(Debug)]
pub struct TokenContext<'a> {
    pub blueprint_name: &'a str,
    pub dasherized_module_name: &'a str,
    /// A custom `path` local, when the blueprint's locals hook set one.
    pub module_path: Option<&'a str>,
    pub pod: bool,
    /// Project pod prefix (`podModulePrefix`); empty when unset.
    pub pod_path: &'a str,
    /// Whether the blueprint's templates carry a `__path__` token.
    pub has_path_token: bool,
    pub in_addon: bool,
    pub in_dummy: bool,
    pub in_repo_addon: Option<&'a str>,
}

/// The built-in path tokens for one installation.
pub fn builtin_tokens(ctx: &TokenContext<'_>) -> IndexMap<String, String> {
    let mut tokens = IndexMap::new();

    let name = if ctx.pod && ctx.has_path_token {
        ctx.blueprint_name.to_string()
    } else {
        ctx.dasherized_module_name.to_string()
    };
    tokens.insert("__name__".to_string(), name);

    let path = if ctx.pod && ctx.has_path_token {
        let segment = ctx.module_path.unwrap_or(ctx.dasherized_module_name);
        if ctx.pod_path.is_empty() {
            segment.to_string()
        } else {
            format!("{}/{}", ctx.pod_path, segment)
        }
    } else {
        to_plural(ctx.blueprint_name)
    };
    tokens.insert("__path__".to_string(), path);

    let root = if let Some(addon_name) = ctx.in_repo_addon {
        format!("lib/{addon_name}/addon")
    } else if ctx.in_dummy {
        "tests/dummy/app".to_string()
    } else if ctx.in_addon {
        "addon".to_string()
    } else {
        "app".to_string()
    };
    tokens.insert("__root__".to_string(), root);

    tokens.insert(
        "__test__".to_string(),
        format!("{}-test", ctx.dasherized_module_name),
    );

    tokens
}

/// The full file map: built-in tokens plus any the blueprint supplies,
/// with blueprint-supplied tokens overriding on collision. Regenerated per
/// installation, never cached across entities.
pub fn compute_file_map(
    ctx: &TokenContext<'_>,
    definition: &dyn BlueprintDefinition,
) -> IndexMap<String, String> {
    let mut tokens = builtin_tokens(ctx);
    for (token, value) in definition.file_map_tokens(ctx) {
        tokens.insert(token, value);
    }
    tokens
}
