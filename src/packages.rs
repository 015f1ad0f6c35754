use std::path::PathBuf;
use std::process::Command;

use crate::error::{Error, Result};

/// A package addition/removal request, fully resolved by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    pub target: Option<String>,
}

impl PackageDescriptor {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), target: None }
    }

    pub fn versioned<S: Into<String>, T: Into<String>>(name: S, target: T) -> Self {
        Self { name: name.into(), target: Some(target.into()) }
    }

    /// `name@target` when a target version is set, plain `name` otherwise.
    pub fn spec(&self) -> String {
        match &self.target {
            Some(target) => format!("{}@{}", self.name, target),
            None => self.name.clone(),
        }
    }
}

/// A bower package triple. `source` defaults to the package name and
/// `target` defaults to `"*"` when unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BowerPackageDescriptor {
    pub name: String,
    pub source: Option<String>,
    pub target: Option<String>,
}

impl BowerPackageDescriptor {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), source: None, target: None }
    }

    pub fn spec(&self) -> String {
        let source = self.source.as_deref().unwrap_or(&self.name);
        let target = self.target.as_deref().unwrap_or("*");
        format!("{}={}#{}", self.name, source, target)
    }
}

/// Outbound interface for dependency mutations. The engine never manages
/// package-manager state itself; it only issues fully-resolved requests.
pub trait PackageGateway {
    fn add_packages(&self, packages: &[PackageDescriptor], dev: bool) -> Result<()>;

    fn remove_packages(&self, packages: &[PackageDescriptor]) -> Result<()>;

    fn add_bower_packages(&self, packages: &[BowerPackageDescriptor]) -> Result<()>;

    fn remove_bower_packages(&self, packages: &[BowerPackageDescriptor]) -> Result<()>;
}

/// Gateway that accepts every request without side effects. Used for dry
/// runs and in tests.
pub struct NullGateway;

impl PackageGateway for NullGateway {
    fn add_packages(&self, _packages: &[PackageDescriptor], _dev: bool) -> Result<()> {
        Ok(())
    }

    fn remove_packages(&self, _packages: &[PackageDescriptor]) -> Result<()> {
        Ok(())
    }

    fn add_bower_packages(&self, _packages: &[BowerPackageDescriptor]) -> Result<()> {
        Ok(())
    }

    fn remove_bower_packages(&self, _packages: &[BowerPackageDescriptor]) -> Result<()> {
        Ok(())
    }
}

/// Gateway that spawns `npm`/`bower` in the project root.
pub struct ProcessGateway {
    root: PathBuf,
}

impl ProcessGateway {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        log::debug!("Running {} {}", program, args.join(" "));
        let status =
            Command::new(program).args(args).current_dir(&self.root).status()?;
        if !status.success() {
            return Err(Error::PackageManager { status });
        }
        Ok(())
    }
}

impl PackageGateway for ProcessGateway {
    fn add_packages(&self, packages: &[PackageDescriptor], dev: bool) -> Result<()> {
        let mut args = vec!["install".to_string()];
        args.extend(packages.iter().map(PackageDescriptor::spec));
        if dev {
            args.push("--save-dev".to_string());
        }
        self.run("npm", &args)
    }

    fn remove_packages(&self, packages: &[PackageDescriptor]) -> Result<()> {
        let mut args = vec!["uninstall".to_string()];
        args.extend(packages.iter().map(|p| p.name.clone()));
        self.run("npm", &args)
    }

    fn add_bower_packages(&self, packages: &[BowerPackageDescriptor]) -> Result<()> {
        let mut args = vec!["install".to_string(), "--save".to_string()];
        args.extend(packages.iter().map(BowerPackageDescriptor::spec));
        self.run("bower", &args)
    }

    fn remove_bower_packages(&self, packages: &[BowerPackageDescriptor]) -> Result<()> {
        let mut args = vec!["uninstall".to_string(), "--save".to_string()];
        args.extend(packages.iter().map(|p| p.name.clone()));
        self.run("bower", &args)
    }
}
