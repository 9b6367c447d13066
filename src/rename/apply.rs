//! Apply a rename plan to disk
//!
//! Order: content edits, then directory renames (deepest first), then the
//! staging index. The first failure aborts the run; nothing is rolled back,
//! and re-running finishes an interrupted run because every step only acts
//! on tokens that are still present.

use anyhow::Result as AnyResult;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::core::model::{ResultSet, Summary};
use crate::core::render::{RenderConfig, Renderer};
use crate::error::{RenameError, Result};
use crate::rename::index::{reset_index, IndexState};
use crate::rename::plan::{plan_rename, RenameOptions, RenamePlan};

/// What an apply run changed
#[derive(Debug, Clone)]
pub struct ApplyReport {
    pub plan: RenamePlan,
    pub index: IndexState,
}

impl ApplyReport {
    pub fn to_result_set(&self, root: &Path) -> ResultSet {
        let mut result_set = self.plan.to_result_set(true);
        result_set.sort();
        result_set.push(self.index.to_result_item(root, true));
        result_set
    }
}

/// Write every edit and perform every rename in `plan`
pub fn apply_plan(plan: &RenamePlan) -> Result<()> {
    for edit in &plan.edits {
        fs::write(&edit.path, &edit.new_content).map_err(|source| RenameError::Write {
            path: edit.path.clone(),
            source,
        })?;
        debug!(path = %edit.relative, replacements = edit.replacements, "rewrote file");
    }

    for rename in &plan.renames {
        fs::rename(&rename.from, &rename.to).map_err(|source| RenameError::Rename {
            from: rename.from.clone(),
            to: rename.to.clone(),
            source,
        })?;
        debug!(from = %rename.relative_from, to = %rename.relative_to, "renamed directory");
    }

    Ok(())
}

/// Plan, verify there are no collisions, apply, then reset the index
pub fn apply_rename(root: &Path, options: &RenameOptions) -> Result<ApplyReport> {
    let plan = plan_rename(root, options)?;
    plan.check_collisions()?;
    apply_plan(&plan)?;

    let index = if options.reset_index {
        reset_index(root)?
    } else {
        IndexState::Kept
    };

    info!(
        edits = plan.edits.len(),
        renames = plan.renames.len(),
        "rename applied"
    );
    Ok(ApplyReport { plan, index })
}

/// Run the apply command
pub fn run_apply(root: &Path, options: &RenameOptions, config: RenderConfig) -> AnyResult<Summary> {
    let report = apply_rename(root, options)?;
    let result_set = report.to_result_set(root);

    let renderer = Renderer::with_config(config);
    renderer.render_to(&result_set, std::io::stdout().lock())?;

    Ok(result_set.summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rename::pairs::TokenPair;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Every file under root as (relative path, content), sorted
    fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
        let mut out = Vec::new();
        for entry in ignore::WalkBuilder::new(root)
            .hidden(false)
            .ignore(false)
            .git_ignore(false)
            .build()
        {
            let entry = entry.unwrap();
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                let rel = entry.path().strip_prefix(root).unwrap().to_path_buf();
                out.push((rel, fs::read(entry.path()).unwrap()));
            }
        }
        out.sort();
        out
    }

    #[test]
    fn test_apply_readme_scenario() {
        let temp = tempdir().unwrap();
        write(temp.path(), "README.md", b"# demo-bd\n");

        apply_rename(temp.path(), &RenameOptions::default()).unwrap();

        assert_eq!(fs::read(temp.path().join("README.md")).unwrap(), b"# change-me\n");
    }

    #[test]
    fn test_apply_directory_scenario_keeps_content() {
        let temp = tempdir().unwrap();
        write(temp.path(), "app/demo_bd/config.py", b"DEBUG = True\n");

        apply_rename(temp.path(), &RenameOptions::default()).unwrap();

        assert!(!temp.path().join("app/demo_bd").exists());
        assert_eq!(
            fs::read(temp.path().join("app/change_me/config.py")).unwrap(),
            b"DEBUG = True\n"
        );
    }

    #[test]
    fn test_apply_nested_directories() {
        let temp = tempdir().unwrap();
        write(temp.path(), "demo_bd/demo_bd/demo-bd/x.txt", b"demo_bd");

        apply_rename(temp.path(), &RenameOptions::default()).unwrap();

        assert_eq!(
            fs::read(temp.path().join("change_me/change_me/change-me/x.txt")).unwrap(),
            b"change_me"
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        let temp = tempdir().unwrap();
        write(temp.path(), "README.md", b"# demo-bd\nimport demo_bd\n");
        write(temp.path(), "src/demo_bd/api.py", b"from demo_bd.core import x\n");

        apply_rename(temp.path(), &RenameOptions::default()).unwrap();
        let once = snapshot(temp.path());

        let second = apply_rename(temp.path(), &RenameOptions::default()).unwrap();
        assert!(second.plan.is_empty());
        assert_eq!(snapshot(temp.path()), once);
    }

    #[test]
    fn test_apply_token_free_tree_unchanged() {
        let temp = tempdir().unwrap();
        write(temp.path(), "main.py", b"print('hello')\n");
        write(temp.path(), "assets/logo.bin", b"\x00\x01\x02");
        let before = snapshot(temp.path());

        let report = apply_rename(temp.path(), &RenameOptions::default()).unwrap();

        assert!(report.plan.is_empty());
        assert_eq!(snapshot(temp.path()), before);
    }

    #[test]
    fn test_apply_resets_index_but_not_git_contents() {
        let temp = tempdir().unwrap();
        write(temp.path(), ".git/index", b"DIRC");
        write(temp.path(), ".git/config", b"[remote] url = demo-bd\n");
        write(temp.path(), "README.md", b"demo-bd");

        let report = apply_rename(temp.path(), &RenameOptions::default()).unwrap();

        assert!(matches!(report.index, IndexState::Removed(_)));
        assert!(!temp.path().join(".git/index").exists());
        assert_eq!(
            fs::read(temp.path().join(".git/config")).unwrap(),
            b"[remote] url = demo-bd\n"
        );
    }

    #[test]
    fn test_apply_keep_index() {
        let temp = tempdir().unwrap();
        write(temp.path(), ".git/index", b"DIRC");

        let options = RenameOptions {
            reset_index: false,
            ..Default::default()
        };
        let report = apply_rename(temp.path(), &options).unwrap();

        assert_eq!(report.index, IndexState::Kept);
        assert!(temp.path().join(".git/index").exists());
    }

    #[test]
    fn test_apply_collision_leaves_tree_untouched() {
        let temp = tempdir().unwrap();
        write(temp.path(), "README.md", b"# demo-bd\n");
        write(temp.path(), "demo_bd/a.py", b"x");
        write(temp.path(), "change_me/b.py", b"y");
        let before = snapshot(temp.path());

        let err = apply_rename(temp.path(), &RenameOptions::default()).unwrap_err();

        assert!(matches!(err, RenameError::Collision { .. }));
        assert_eq!(snapshot(temp.path()), before);
    }

    #[test]
    fn test_apply_custom_pairs() {
        let temp = tempdir().unwrap();
        write(temp.path(), "demo-bd/pyproject.toml", b"name = \"demo-bd\"\n");

        let options = RenameOptions {
            pairs: vec![TokenPair::new("demo-bd", "acme-api").unwrap()],
            ..Default::default()
        };
        apply_rename(temp.path(), &options).unwrap();

        assert_eq!(
            fs::read(temp.path().join("acme-api/pyproject.toml")).unwrap(),
            b"name = \"acme-api\"\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_apply_write_failure_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        write(temp.path(), "locked.txt", b"demo-bd");
        let path = temp.path().join("locked.txt");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();

        // root can write read-only files; nothing to assert in that case
        if fs::OpenOptions::new().write(true).open(&path).is_ok() {
            return;
        }

        let err = apply_rename(temp.path(), &RenameOptions::default()).unwrap_err();
        assert!(matches!(err, RenameError::Write { .. }));
        assert!(err.to_string().contains("locked.txt"));
    }

    #[test]
    fn test_report_result_set_ends_with_index() {
        let temp = tempdir().unwrap();
        write(temp.path(), "b.txt", b"demo-bd");
        write(temp.path(), "a.txt", b"demo_bd");

        let report = apply_rename(temp.path(), &RenameOptions::default()).unwrap();
        let set = report.to_result_set(temp.path());

        assert_eq!(set.len(), 3);
        assert_eq!(set.items[0].path, Some("a.txt".to_string()));
        assert_eq!(set.items[2].kind, crate::core::model::Kind::Index);
        assert_eq!(set.summary().edits, 2);
    }
}
