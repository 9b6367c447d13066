//! Git staging index reset
//!
//! After a rename the template's staged state no longer matches the tree,
//! so the index file is deleted and every file shows up as a fresh change.
//! Only the root itself is inspected; parent repositories are never touched.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::model::ResultItem;
use crate::core::paths::display_relative;
use crate::error::{RenameError, Result};

/// Outcome of resetting (or inspecting) the staging index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexState {
    /// The index file was deleted (or would be, in a dry run)
    Removed(PathBuf),
    /// The repository exists but has no index file
    Missing(PathBuf),
    /// `keep_index` was requested
    Kept,
    /// The root is not a git repository root
    NoRepository,
}

impl IndexState {
    pub fn to_result_item(&self, root: &Path, applied: bool) -> ResultItem {
        match self {
            IndexState::Removed(path) => {
                let note = if applied {
                    "staging index removed"
                } else {
                    "staging index would be removed"
                };
                ResultItem::index(Some(display_relative(path, root)), note).with_applied(applied)
            }
            IndexState::Missing(path) => {
                ResultItem::index(Some(display_relative(path, root)), "no staging index present")
            }
            IndexState::Kept => ResultItem::index(None, "staging index kept"),
            IndexState::NoRepository => {
                ResultItem::index(None, "not a git repository root; index untouched")
            }
        }
    }
}

/// Locate the git directory for `root`.
///
/// `.git` is either the directory itself or, for worktrees and submodules, a
/// file containing `gitdir: <path>` (relative paths resolve against root).
pub fn git_dir(root: &Path) -> Option<PathBuf> {
    let dot_git = root.join(".git");
    let metadata = fs::symlink_metadata(&dot_git).ok()?;

    if metadata.is_dir() {
        return Some(dot_git);
    }

    if metadata.is_file() {
        let content = fs::read_to_string(&dot_git).ok()?;
        let target = content
            .lines()
            .find_map(|line| line.strip_prefix("gitdir:"))
            .map(str::trim)
            .filter(|t| !t.is_empty())?;
        let target = Path::new(target);
        let resolved = if target.is_absolute() {
            target.to_path_buf()
        } else {
            root.join(target)
        };
        return resolved.is_dir().then_some(resolved);
    }

    None
}

/// Inspect the index without modifying it
pub fn index_state(root: &Path) -> IndexState {
    match git_dir(root) {
        Some(dir) => {
            let index = dir.join("index");
            if index.is_file() {
                IndexState::Removed(index)
            } else {
                IndexState::Missing(index)
            }
        }
        None => IndexState::NoRepository,
    }
}

/// Delete the staging index under `root`, if there is one
pub fn reset_index(root: &Path) -> Result<IndexState> {
    let state = index_state(root);
    match &state {
        IndexState::Removed(path) => {
            fs::remove_file(path).map_err(|source| RenameError::Index {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "staging index removed");
        }
        other => debug!(state = ?other, "staging index left as is"),
    }
    Ok(state)
}
