use dialoguer::Select;

use crate::error::Result;

/// One answer to a conflict prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    Overwrite,
    OverwriteAll,
    Skip,
    SkipAll,
    Diff,
    Abort,
}

/// The question posed for one conflicting file.
#[derive(Debug)]
pub struct ConflictQuestion<'a> {
    /// Target-relative path of the conflicting file.
    pub path: &'a str,
}

/// Collaborator for user-visible output and interactive prompts.
///
/// Installer progress lines go through `write_line` so callers (and tests)
/// can capture them; diagnostics use the `log` facade instead.
pub trait UserInterface {
    fn write_line(&self, line: &str);

    fn prompt_conflict(&self, question: &ConflictQuestion<'_>) -> Result<ConflictChoice>;
}

/// Terminal implementation backed by dialoguer.
pub struct TerminalUi;

impl TerminalUi {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalUi {
    fn default() -> Self {
        Self::new()
    }
}

const CONFLICT_CHOICES: &[(&str, ConflictChoice)] = &[
    ("Overwrite", ConflictChoice::Overwrite),
    ("Overwrite this and all later conflicts", ConflictChoice::OverwriteAll),
    ("Skip", ConflictChoice::Skip),
    ("Skip this and all later conflicts", ConflictChoice::SkipAll),
    ("Diff", ConflictChoice::Diff),
    ("Abort", ConflictChoice::Abort),
];

impl UserInterface for TerminalUi {
    fn write_line(&self, line: &str) {
        println!("{line}");
    }

    fn prompt_conflict(&self, question: &ConflictQuestion<'_>) -> Result<ConflictChoice> {
        let items: Vec<&str> = CONFLICT_CHOICES.iter().map(|(label, _)| *label).collect();
        let selection = Select::new()
            .with_prompt(format!("Overwrite {}?", question.path))
            .default(0)
            .items(&items)
            .interact()?;
        Ok(CONFLICT_CHOICES[selection].1)
    }
}
