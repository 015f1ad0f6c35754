use std::process::ExitStatus;
use thiserror::Error;

use crate::constants::exit_codes;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    Io(#[from] std::io::Error),

    #[error("Unknown blueprint: {name}")]
    UnknownBlueprint { name: String },

    #[error("The `generate <entity-name>` command requires an entity name to be specified.")]
    MissingEntityName,

    #[error("You specified \"{name}\", but you can't use a trailing slash as an entity name with generators. Please re-run the command with \"{suggestion}\".")]
    TrailingSlash { name: String, suggestion: String },

    /// The user chose `abort` at a conflict prompt. Informational, not a defect.
    #[error("Installation aborted.")]
    ConflictAbort,

    #[error("Blueprint '{blueprint}' failed in its {hook} hook: {source}")]
    Hook {
        blueprint: String,
        hook: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to render '{file}'. Original error: {source}")]
    Render {
        file: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("Failed to render. Original error: {0}")]
    Minijinja(#[from] minijinja::Error),

    /// Internal invariant: a primitive file action was requested but is not
    /// in the action table.
    #[error("Tried to call action \"{action}\" but it does not exist")]
    ActionNotFound { action: String },

    #[error("Failed to parse '{path}'. Original error: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON error: {0}.")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse glob pattern. Original error: {0}")]
    Glob(#[from] globset::Error),

    #[error("Invalid file map rule '{pattern}'. Original error: {source}")]
    FileMapRule {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Prompt error: {0}.")]
    Prompt(String),

    #[error("Package manager exited with status: {status}")]
    PackageManager { status: ExitStatus },
}

impl From<dialoguer::Error> for Error {
    fn from(value: dialoguer::Error) -> Self {
        Error::Prompt(value.to_string())
    }
}

impl Error {
    /// User-correctable errors that get a single explanatory line rather
    /// than a propagated failure with context.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Error::UnknownBlueprint { .. }
                | Error::MissingEntityName
                | Error::TrailingSlash { .. }
        )
    }
}

/// Convenience type alias for Results with this crate's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// Usage errors and a user-initiated abort print one line without any
/// further context; an abort is not treated as a failure.
pub fn default_error_handler(err: Error) -> ! {
    match err {
        Error::ConflictAbort => {
            eprintln!("{}", Error::ConflictAbort);
            std::process::exit(exit_codes::SUCCESS);
        }
        err => {
            eprintln!("{}", err);
            std::process::exit(exit_codes::FAILURE);
        }
    }
}
