//! Shared helpers for the installer integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use stencil::error::Result;
use stencil::packages::{BowerPackageDescriptor, PackageDescriptor, PackageGateway};
use stencil::ui::{ConflictChoice, ConflictQuestion, UserInterface};

/// UI whose conflict answers are scripted up front and whose output lines
/// are captured for assertions.
pub struct ScriptedUi {
    answers: RefCell<VecDeque<ConflictChoice>>,
    output: RefCell<Vec<String>>,
    prompts: RefCell<usize>,
}

impl ScriptedUi {
    pub fn new(answers: Vec<ConflictChoice>) -> Self {
        Self {
            answers: RefCell::new(answers.into()),
            output: RefCell::new(Vec::new()),
            prompts: RefCell::new(0),
        }
    }

    /// A UI for runs that are not expected to hit any conflict.
    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    pub fn lines(&self) -> Vec<String> {
        self.output.borrow().clone()
    }

    pub fn has_line(&self, line: &str) -> bool {
        self.output.borrow().iter().any(|l| l == line)
    }

    pub fn prompt_count(&self) -> usize {
        *self.prompts.borrow()
    }
}

impl UserInterface for ScriptedUi {
    fn write_line(&self, line: &str) {
        self.output.borrow_mut().push(line.to_string());
    }

    fn prompt_conflict(&self, _question: &ConflictQuestion<'_>) -> Result<ConflictChoice> {
        *self.prompts.borrow_mut() += 1;
        Ok(self
            .answers
            .borrow_mut()
            .pop_front()
            .expect("conflict script exhausted"))
    }
}

/// One recorded package-manager request: the package spec plus whether it
/// was a dev dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub verb: &'static str,
    pub spec: String,
    pub dev: bool,
}

/// Gateway that records every request instead of running a package
/// manager.
#[derive(Default)]
pub struct RecordingGateway {
    requests: RefCell<Vec<RecordedRequest>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn requested(&self, verb: &'static str, spec: &str) -> bool {
        self.requests
            .borrow()
            .iter()
            .any(|r| r.verb == verb && r.spec == spec)
    }
}

impl PackageGateway for RecordingGateway {
    fn add_packages(&self, packages: &[PackageDescriptor], dev: bool) -> Result<()> {
        for package in packages {
            self.requests.borrow_mut().push(RecordedRequest {
                verb: "add",
                spec: package.spec(),
                dev,
            });
        }
        Ok(())
    }

    fn remove_packages(&self, packages: &[PackageDescriptor]) -> Result<()> {
        for package in packages {
            self.requests.borrow_mut().push(RecordedRequest {
                verb: "remove",
                spec: package.spec(),
                dev: false,
            });
        }
        Ok(())
    }

    fn add_bower_packages(&self, packages: &[BowerPackageDescriptor]) -> Result<()> {
        for package in packages {
            self.requests.borrow_mut().push(RecordedRequest {
                verb: "add-bower",
                spec: package.spec(),
                dev: false,
            });
        }
        Ok(())
    }

    fn remove_bower_packages(&self, packages: &[BowerPackageDescriptor]) -> Result<()> {
        for package in packages {
            self.requests.borrow_mut().push(RecordedRequest {
                verb: "remove-bower",
                spec: package.spec(),
                dev: false,
            });
        }
        Ok(())
    }
}

/// Writes `content` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
