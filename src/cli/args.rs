use crate::constants::verbosity;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

/// CLI arguments for stencil.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The `-v` count of whichever subcommand was invoked.
    pub fn verbose(&self) -> u8 {
        match &self.command {
            Commands::Generate(args) | Commands::Destroy(args) => args.verbose,
            Commands::List(args) => args.verbose,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a blueprint's files into the project.
    #[command(visible_alias = "g")]
    Generate(GenerateArgs),

    /// Remove the files a blueprint installed.
    #[command(visible_alias = "d")]
    Destroy(GenerateArgs),

    /// List the blueprints available to this project.
    List(ListArgs),
}

/// Arguments shared by `generate` and `destroy`.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Blueprint name, or an explicit path to a blueprint directory.
    #[arg(value_name = "BLUEPRINT")]
    pub blueprint: String,

    /// Name of the entity to generate files for.
    #[arg(value_name = "ENTITY_NAME")]
    pub entity_name: Option<String>,

    /// Further positional values, matched against the blueprint's
    /// anonymous options.
    #[arg(value_name = "ARGS")]
    pub extra: Vec<String>,

    /// Project directory to operate on (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// Preview actions without touching the filesystem.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Generate files in the pod layout.
    #[arg(long)]
    pub pod: bool,

    /// Generate into the addon's dummy app.
    #[arg(long)]
    pub dummy: bool,

    /// Generate into the named in-repo addon.
    #[arg(long = "in-repo-addon", value_name = "NAME")]
    pub in_repo_addon: Option<String>,

    /// Do not run the package manager for blueprint-requested dependencies.
    #[arg(long = "skip-npm")]
    pub skip_npm: bool,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Arguments for `list`.
#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    /// Project directory to operate on (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse command line arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Error,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}
