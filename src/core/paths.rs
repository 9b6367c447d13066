//! Path normalization utilities
//!
//! Ensures all paths are normalized to use '/' as separator and are relative to root.

use std::path::Path;

/// Version-control metadata names, never rewritten at any depth
pub const VCS_ENTRIES: &[&str] = &[".git", ".hg", ".svn"];

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Relative display form of `path`, falling back to the full path outside root
pub fn display_relative(path: &Path, root: &Path) -> String {
    make_relative(path, root).unwrap_or_else(|| normalize_path(path))
}

/// Check if a path's final component is version-control metadata
/// (`.git` is a file in worktrees and submodules, so type is not checked)
pub fn is_vcs_entry(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| VCS_ENTRIES.contains(&name))
        .unwrap_or(false)
}

/// Number of components below root, used to order renames deepest first
pub fn depth(path: &Path) -> usize {
    path.components().count()
}
