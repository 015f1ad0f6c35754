use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::Result;

/// Builds a glob set from ignore patterns. Patterns match against the
/// blueprint-relative source path of each file.
pub fn build_ignore_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern.as_ref())?);
    }
    Ok(builder.build()?)
}
