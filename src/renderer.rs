use cruet::{
    case::{
        camel::to_camel_case, kebab::to_kebab_case, pascal::to_pascal_case,
        snake::to_snake_case,
    },
    string::{pluralize::to_plural, singularize::to_singular},
};
use minijinja::Environment;

use crate::error::Result;

/// Trait for template rendering engines.
///
/// The engine treats rendering as a pluggable function from a template
/// source and a locals mapping to a string.
pub trait TemplateRenderer {
    fn render(&self, template: &str, locals: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_filter("camel_case", to_camel_case);
        env.add_filter("kebab_case", to_kebab_case);
        env.add_filter("pascal_case", to_pascal_case);
        env.add_filter("snake_case", to_snake_case);
        env.add_filter("plural", to_plural);
        env.add_filter("singular", to_singular);

        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, locals: &serde_json::Value) -> Result<String> {
        Ok(self.env.render_str(template, locals)?)
    }
}
