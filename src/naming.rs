use cruet::case::{
    camel::to_camel_case, kebab::to_kebab_case, pascal::to_pascal_case,
    snake::to_snake_case,
};

/// Casing variants derived from a normalized module name.
///
/// Computed once per installation and exposed to templates; see
/// [`crate::locals`] for the template-variable names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNames {
    pub module_name: String,
    pub camelized: String,
    pub classified: String,
    pub dasherized: String,
    pub decamelized: String,
    pub dasherized_package_name: String,
    pub classified_package_name: String,
}

impl ModuleNames {
    pub fn derive(name: &str) -> Self {
        let package = package_name(name);
        Self {
            module_name: name.to_string(),
            camelized: to_camel_case(name),
            classified: to_pascal_case(name),
            dasherized: to_kebab_case(name),
            decamelized: to_snake_case(name),
            dasherized_package_name: to_kebab_case(package),
            classified_package_name: to_pascal_case(package),
        }
    }
}

/// Strips the scope from a scoped package name (`@scope/name` -> `name`).
pub fn package_name(name: &str) -> &str {
    if let Some(rest) = name.strip_prefix('@') {
        if let Some((_, unscoped)) = rest.split_once('/') {
            return unscoped;
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_casing_variants() {
        let names = ModuleNames::derive("x-foo");
        assert_eq!(names.module_name, "x-foo");
        assert_eq!(names.camelized, "xFoo");
        assert_eq!(names.classified, "XFoo");
        assert_eq!(names.dasherized, "x-foo");
        assert_eq!(names.decamelized, "x_foo");
    }

    #[test]
    fn package_name_strips_scope() {
        assert_eq!(package_name("@acme/x-foo"), "x-foo");
        assert_eq!(package_name("x-foo"), "x-foo");
        assert_eq!(package_name("@acme"), "@acme");
    }

    #[test]
    fn scoped_name_feeds_package_variants() {
        let names = ModuleNames::derive("@acme/coolThing");
        assert_eq!(names.dasherized_package_name, "cool-thing");
        assert_eq!(names.classified_package_name, "CoolThing");
    }
}
