use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use indexmap::IndexMap;
use regex::Regex;

use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;

/// Classification of one blueprint file against the target tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Nothing exists at the output path.
    Create,
    /// The rendered content equals the existing file byte for byte.
    Identical,
    /// A different file already exists at the output path.
    Conflict,
}

/// Rendered file content. Files that are not valid UTF-8 bypass the
/// renderer and are installed verbatim.
#[derive(Debug, Clone)]
pub enum RenderedContent {
    Text(String),
    Binary(Vec<u8>),
}

impl RenderedContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RenderedContent::Text(text) => text.as_bytes(),
            RenderedContent::Binary(bytes) => bytes,
        }
    }
}

/// One file discovered under the blueprint's file root. Produced by the
/// walker, consumed by the coordinator, discarded when the run finishes.
#[derive(Debug)]
pub struct FileAction {
    /// Path of the template file inside the blueprint.
    pub source: PathBuf,
    /// Target-relative output path, after file-map and token rewrites.
    pub relative: PathBuf,
    /// Absolute output path.
    pub output: PathBuf,
    pub content: RenderedContent,
    pub status: FileStatus,
}

/// Walks a blueprint's file templates in deterministic order, mapping and
/// classifying each against the target tree.
pub struct Walker<'a> {
    renderer: &'a dyn TemplateRenderer,
    locals: &'a serde_json::Value,
    tokens: &'a IndexMap<String, String>,
    rules: Vec<(Regex, String)>,
    files_root: PathBuf,
    target_root: PathBuf,
    target_filter: Option<GlobSet>,
    ignored: GlobSet,
}

impl<'a> Walker<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        renderer: &'a dyn TemplateRenderer,
        locals: &'a serde_json::Value,
        tokens: &'a IndexMap<String, String>,
        rules: Vec<(Regex, String)>,
        files_root: PathBuf,
        target_root: PathBuf,
        target_filter: Option<GlobSet>,
        ignored: GlobSet,
    ) -> Self {
        Self {
            renderer,
            locals,
            tokens,
            rules,
            files_root,
            target_root,
            target_filter,
            ignored,
        }
    }

    /// Lazily yields one [`FileAction`] per template file, directories
    /// before their files and alphabetical within a directory, so that
    /// output lines and prompts are deterministic.
    pub fn iter(&self) -> FileWalk<'_> {
        let inner = if self.files_root.is_dir() {
            Some(walkdir::WalkDir::new(&self.files_root).sort_by_file_name().into_iter())
        } else {
            // A blueprint without a files directory installs nothing.
            None
        };
        FileWalk { walker: self, inner }
    }

    /// Applies the static file-map rules and then the token substitutions
    /// to a blueprint-relative path.
    fn map_relative_path(&self, relative: &Path) -> PathBuf {
        let mut mapped = relative.to_string_lossy().replace('\\', "/");
        for (regex, replacement) in &self.rules {
            mapped = regex.replace_all(&mapped, replacement.as_str()).into_owned();
        }
        for (token, value) in self.tokens {
            mapped = mapped.replace(token, value);
        }
        PathBuf::from(mapped)
    }

    fn render_file(&self, source: &Path) -> Result<RenderedContent> {
        let bytes = fs::read(source)?;
        match String::from_utf8(bytes) {
            Ok(text) => {
                let rendered =
                    self.renderer.render(&text, self.locals).map_err(|e| match e {
                        Error::Minijinja(source_err) => Error::Render {
                            file: source.display().to_string(),
                            source: source_err,
                        },
                        other => other,
                    })?;
                Ok(RenderedContent::Text(rendered))
            }
            Err(raw) => Ok(RenderedContent::Binary(raw.into_bytes())),
        }
    }

    fn classify(&self, output: &Path, content: &RenderedContent) -> Result<FileStatus> {
        if !output.exists() {
            return Ok(FileStatus::Create);
        }
        let existing = fs::read(output)?;
        if existing == content.as_bytes() {
            Ok(FileStatus::Identical)
        } else {
            Ok(FileStatus::Conflict)
        }
    }

    fn action_for(&self, source: &Path) -> Result<FileAction> {
        let relative = source
            .strip_prefix(&self.files_root)
            .expect("walked entry is under the files root")
            .to_path_buf();
        let mapped = self.map_relative_path(&relative);
        let output = self.target_root.join(&mapped);
        let content = self.render_file(source)?;
        let status = self.classify(&output, &content)?;
        Ok(FileAction { source: source.to_path_buf(), relative: mapped, output, content, status })
    }
}

/// Iterator over a walker's file actions.
pub struct FileWalk<'a> {
    walker: &'a Walker<'a>,
    inner: Option<walkdir::IntoIter>,
}

impl Iterator for FileWalk<'_> {
    type Item = Result<FileAction>;

    fn next(&mut self) -> Option<Self::Item> {
        let inner = self.inner.as_mut()?;
        loop {
            let entry = match inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(Error::Io(e.into()))),
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.walker.files_root)
                .expect("walked entry is under the files root");
            if self.walker.ignored.is_match(relative) {
                log::debug!("Ignoring '{}'", relative.display());
                continue;
            }
            if let Some(filter) = &self.walker.target_filter {
                if !filter.is_match(relative) {
                    continue;
                }
            }

            return Some(self.walker.action_for(entry.path()));
        }
    }
}
