/// Handles argument parsing and command dispatch.
pub mod cli;

/// Defines custom error types.
pub mod error;

/// Constants used throughout the application.
pub mod constants;

/// Blueprint model, on-disk config, and definition hooks.
pub mod blueprint;

/// Ordered blueprint lookup across project, addon, and built-in sources.
pub mod registry;

/// Path token computation (`__name__`, `__path__`, ...).
pub mod tokens;

/// Template-variable resolution for an installation.
pub mod locals;

/// Casing variants of module and package names.
pub mod naming;

/// Template parsing and rendering functionality.
pub mod renderer;

/// Walks blueprint files and classifies them against the target tree.
pub mod walker;

/// Interactive resolution of conflicting files.
pub mod conflict;

/// Install/uninstall orchestration and the hook lifecycle.
pub mod install;

/// Outbound interface for package-manager mutations.
pub mod packages;

/// Project metadata the engine consults during installs.
pub mod project;

/// User interaction handling.
pub mod ui;

/// Ignored-file glob sets.
pub mod ignore;
