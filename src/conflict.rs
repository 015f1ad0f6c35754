use std::fs;

use similar::TextDiff;

use crate::error::{Error, Result};
use crate::ui::{ConflictChoice, ConflictQuestion, UserInterface};
use crate::walker::{FileAction, RenderedContent};

/// What the coordinator should do with one conflicting file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Overwrite,
    Skip,
}

/// Drives the interactive protocol for conflicting files.
///
/// The session-wide "overwrite all"/"skip all" choice lives here, scoped
/// to one installation run; separate runs never share it. Without a
/// prompt capability (dry runs, programmatic use) every conflict resolves
/// to skip.
pub struct ConflictResolver<'a> {
    ui: Option<&'a dyn UserInterface>,
    overwrite_all: bool,
    skip_all: bool,
}

impl<'a> ConflictResolver<'a> {
    pub fn new(ui: Option<&'a dyn UserInterface>) -> Self {
        Self { ui, overwrite_all: false, skip_all: false }
    }

    /// Resolves one conflict. `diff` prints the content diff and
    /// re-prompts; it may be requested again. `abort` surfaces as
    /// [`Error::ConflictAbort`] and the caller stops without writing any
    /// further files.
    pub fn resolve(&mut self, action: &FileAction) -> Result<Resolution> {
        if self.overwrite_all {
            return Ok(Resolution::Overwrite);
        }
        if self.skip_all {
            return Ok(Resolution::Skip);
        }
        let Some(ui) = self.ui else {
            return Ok(Resolution::Skip);
        };

        let path = action.relative.display().to_string();
        loop {
            match ui.prompt_conflict(&ConflictQuestion { path: &path })? {
                ConflictChoice::Overwrite => return Ok(Resolution::Overwrite),
                ConflictChoice::OverwriteAll => {
                    self.overwrite_all = true;
                    return Ok(Resolution::Overwrite);
                }
                ConflictChoice::Skip => return Ok(Resolution::Skip),
                ConflictChoice::SkipAll => {
                    self.skip_all = true;
                    return Ok(Resolution::Skip);
                }
                ConflictChoice::Abort => return Err(Error::ConflictAbort),
                ConflictChoice::Diff => {
                    self.show_diff(ui, action)?;
                }
            }
        }
    }

    fn show_diff(&self, ui: &dyn UserInterface, action: &FileAction) -> Result<()> {
        let existing = fs::read(&action.output)?;
        match (std::str::from_utf8(&existing), &action.content) {
            (Ok(old), RenderedContent::Text(new)) => {
                let diff = TextDiff::from_lines(old, new.as_str());
                let unified = diff
                    .unified_diff()
                    .context_radius(3)
                    .header("existing", "generated")
                    .to_string();
                for line in unified.lines() {
                    ui.write_line(line);
                }
            }
            _ => ui.write_line("(binary files differ)"),
        }
        Ok(())
    }
}
