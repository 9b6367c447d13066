//! Rename planning
//!
//! Computes every content edit and directory rename without touching the
//! tree. `apply` executes a plan; `plan` prints one.

use anyhow::Result as AnyResult;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::file_reader::{read_file_with_config, FileReadConfig, FileReadResult, FileWarning};
use crate::core::model::{IssueCode, Meta, ResultItem, ResultSet, Summary};
use crate::core::paths::{depth, display_relative};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::hash_bytes;
use crate::error::{RenameError, Result};
use crate::rename::index::{index_state, IndexState};
use crate::rename::pairs::{apply_to_content, apply_to_name, default_pairs, TokenPair};
use crate::rename::walk::collect_entries;

/// Options shared by plan, apply and check
#[derive(Debug, Clone)]
pub struct RenameOptions {
    /// Pairs applied in order
    pub pairs: Vec<TokenPair>,

    /// Size and binary policy for reading files
    pub read: FileReadConfig,

    /// Honor .gitignore/.ignore files during traversal
    pub respect_ignore: bool,

    /// Delete the git staging index after applying
    pub reset_index: bool,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            pairs: default_pairs(),
            read: FileReadConfig::default(),
            respect_ignore: false,
            reset_index: true,
        }
    }
}

/// A pending rewrite of one file
#[derive(Debug, Clone)]
pub struct FileEdit {
    pub path: PathBuf,
    pub relative: String,
    pub replacements: usize,
    pub new_content: Vec<u8>,
}

impl FileEdit {
    pub fn to_result_item(&self, applied: bool) -> ResultItem {
        ResultItem::edit(&self.relative, self.replacements)
            .with_meta(Meta {
                size: Some(self.new_content.len() as u64),
                hash: Some(hash_bytes(&self.new_content)),
            })
            .with_applied(applied)
    }
}

/// A pending directory rename. `to` keeps the original parent path, which
/// stays valid because renames run deepest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirRename {
    pub from: PathBuf,
    pub to: PathBuf,
    pub relative_from: String,
    pub relative_to: String,
}

impl DirRename {
    pub fn to_result_item(&self, applied: bool) -> ResultItem {
        ResultItem::rename(&self.relative_from, &self.relative_to).with_applied(applied)
    }
}

/// A file left alone by the read policy
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub relative: String,
    pub warning: FileWarning,
}

/// Everything a rename run would change
#[derive(Debug, Clone, Default)]
pub struct RenamePlan {
    pub edits: Vec<FileEdit>,
    /// Ordered deepest first
    pub renames: Vec<DirRename>,
    pub skipped: Vec<SkippedFile>,
}

impl RenamePlan {
    /// True when applying would change nothing in the tree
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty() && self.renames.is_empty()
    }

    /// Fail with `Collision` if any rename would clobber an existing path or
    /// two renames share a destination.
    ///
    /// A path moved away by an earlier rename in the plan counts as free, so
    /// `a -> b` followed by `c -> a` is allowed.
    pub fn check_collisions(&self) -> Result<()> {
        let mut claimed = HashSet::new();
        let mut vacated = HashSet::new();
        for rename in &self.renames {
            let occupied =
                rename.to.symlink_metadata().is_ok() && !vacated.contains(&rename.to);
            if occupied || !claimed.insert(&rename.to) {
                return Err(RenameError::Collision {
                    from: rename.from.clone(),
                    to: rename.to.clone(),
                });
            }
            vacated.insert(&rename.from);
        }
        Ok(())
    }

    pub fn to_result_set(&self, applied: bool) -> ResultSet {
        let mut result_set = ResultSet::new();
        result_set.extend(self.edits.iter().map(|e| e.to_result_item(applied)));
        result_set.extend(self.renames.iter().map(|r| r.to_result_item(applied)));
        result_set.extend(
            self.skipped
                .iter()
                .map(|s| ResultItem::skip(&s.relative, s.warning.to_issue())),
        );
        result_set
    }
}

/// Compute the edits and renames that `options.pairs` imply under `root`.
///
/// Each file is read once and the pairs are applied to it in order, which
/// is equivalent to one whole-tree pass per pair since files are independent.
pub fn plan_rename(root: &Path, options: &RenameOptions) -> Result<RenamePlan> {
    let entries = collect_entries(root, options.respect_ignore)?;
    let mut plan = RenamePlan::default();

    for path in entries.files {
        let relative = display_relative(&path, root);
        let content = match read_file_with_config(&path, &options.read) {
            Ok(FileReadResult::Content(bytes)) => bytes,
            Ok(FileReadResult::Skipped(warning)) => {
                debug!(path = %relative, code = warning.code.as_str(), "skipping file");
                plan.skipped.push(SkippedFile { relative, warning });
                continue;
            }
            Err(source) => return Err(RenameError::Read { path, source }),
        };

        if let Some((new_content, replacements)) = apply_to_content(&options.pairs, &content) {
            debug!(path = %relative, replacements, "planned edit");
            plan.edits.push(FileEdit {
                path,
                relative,
                replacements,
                new_content,
            });
        }
    }

    for from in entries.dirs {
        let Some(name) = from.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(new_name) = apply_to_name(&options.pairs, name) {
            let to = from.with_file_name(&new_name);
            debug!(from = %from.display(), to = %to.display(), "planned rename");
            plan.renames.push(DirRename {
                relative_from: display_relative(&from, root),
                relative_to: display_relative(&to, root),
                from,
                to,
            });
        }
    }

    plan.renames
        .sort_by(|a, b| depth(&b.from).cmp(&depth(&a.from)).then_with(|| a.from.cmp(&b.from)));

    info!(
        edits = plan.edits.len(),
        renames = plan.renames.len(),
        skipped = plan.skipped.len(),
        "rename plan computed"
    );
    Ok(plan)
}

/// Run the plan command (dry run): print what apply would do
pub fn run_plan(root: &Path, options: &RenameOptions, config: RenderConfig) -> AnyResult<Summary> {
    let plan = plan_rename(root, options)?;
    let mut result_set = plan.to_result_set(false);
    result_set.sort();

    let index = if options.reset_index {
        index_state(root)
    } else {
        IndexState::Kept
    };
    result_set.push(index.to_result_item(root, false));

    // Surface collisions as an item; apply would refuse to run
    if let Err(err) = plan.check_collisions() {
        result_set.push(ResultItem::error(IssueCode::new("COLLISION", err.to_string())));
    }

    let renderer = Renderer::with_config(config);
    renderer.render_to(&result_set, std::io::stdout().lock())?;

    Ok(result_set.summary())
}
