//! Tree traversal shared by plan and check
//!
//! Uses the ignore crate's walker. Hidden entries are always visited,
//! ignore files only when asked, and version-control metadata never.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::core::paths::is_vcs_entry;
use crate::error::Result;

/// Regular files and directories below a root, each list sorted
#[derive(Debug, Default)]
pub struct TreeEntries {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
}

/// Collect every regular file and directory under `root` (root excluded).
///
/// Symlinks are neither followed nor returned, so link cycles cannot be
/// entered and link targets outside the tree are never rewritten.
pub fn collect_entries(root: &Path, respect_ignore: bool) -> Result<TreeEntries> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .follow_links(false)
        .parents(respect_ignore)
        .ignore(respect_ignore)
        .git_ignore(respect_ignore)
        .git_global(respect_ignore)
        .git_exclude(respect_ignore)
        .require_git(false)
        .filter_entry(|entry| !is_vcs_entry(entry.path()));

    let mut entries = TreeEntries::default();

    for entry in builder.build() {
        let entry = entry?;
        if entry.depth() == 0 {
            continue;
        }

        match entry.file_type() {
            Some(ft) if ft.is_file() => entries.files.push(entry.into_path()),
            Some(ft) if ft.is_dir() => entries.dirs.push(entry.into_path()),
            _ => trace!(path = %entry.path().display(), "skipping non-regular entry"),
        }
    }

    entries.files.sort();
    entries.dirs.sort();
    Ok(entries)
}
