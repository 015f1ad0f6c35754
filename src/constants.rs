//! Constants used throughout the stencil application

/// Directory inside a blueprint that holds its file templates
pub const FILES_DIR: &str = "files";

/// Optional per-blueprint configuration file
pub const CONFIG_FILE: &str = "blueprint.yaml";

/// Project manifest consulted for name and dependencies
pub const PROJECT_MANIFEST: &str = "package.json";

/// Directory searched for project-local blueprints
pub const PROJECT_BLUEPRINTS_DIR: &str = "blueprints";

/// Environment variable overriding the built-in blueprints directory
pub const BUILTIN_BLUEPRINTS_ENV: &str = "STENCIL_BLUEPRINTS";

/// Suffix convention for paired test blueprints
pub const TEST_SUFFIX: &str = "test";

/// Suffix convention for paired addon re-export blueprints
pub const ADDON_SUFFIX: &str = "addon";

/// Files never installed from a blueprint
pub const DEFAULT_IGNORED_FILES: &[&str] = &["**/.DS_Store"];

/// Files additionally skipped when installing into an existing project
pub const DEFAULT_IGNORED_UPDATE_FILES: &[&str] =
    &[".gitkeep", "app/.gitkeep", "README.md"];

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
