//! Residue check
//!
//! Verifies that a run left no search token behind: not in any file's
//! content and not as any directory's name. Files the read policy skips are
//! still scanned, since apply leaves their tokens in place.

use anyhow::{bail, Result as AnyResult};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::core::file_reader::{read_file_with_config, FileReadResult, FileWarning};
use crate::core::model::{ResultItem, ResultSet, Summary};
use crate::core::paths::display_relative;
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::truncate_string;
use crate::error::{RenameError, Result};
use crate::rename::pairs::TokenPair;
use crate::rename::plan::RenameOptions;
use crate::rename::walk::collect_entries;

/// Longest line excerpt kept in a residue item
const MAX_EXCERPT_BYTES: usize = 200;

/// Residue items for every line of `content` containing a search token
fn content_residue(relative: &str, content: &[u8], pairs: &[TokenPair]) -> Vec<ResultItem> {
    content
        .split(|b| *b == b'\n')
        .enumerate()
        .filter(|(_, line)| pairs.iter().any(|pair| pair.count(line) > 0))
        .map(|(idx, line)| {
            let text = String::from_utf8_lossy(line);
            let (excerpt, _) = truncate_string(text.trim_end_matches('\r'), MAX_EXCERPT_BYTES);
            ResultItem::residue(relative, Some(idx as u32 + 1), excerpt)
        })
        .collect()
}

/// A single residue item for a skipped file that still holds a token.
/// Line detail is omitted since the content is binary or too large to excerpt.
fn skipped_residue(
    path: &Path,
    relative: &str,
    warning: &FileWarning,
    pairs: &[TokenPair],
) -> Result<Option<ResultItem>> {
    let bytes = fs::read(path).map_err(|source| RenameError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(pairs.iter().find(|pair| pair.count(&bytes) > 0).map(|pair| ResultItem {
        errors: vec![warning.to_issue()],
        ..ResultItem::residue(
            relative,
            None,
            format!("skipped file still contains '{}'", pair.old()),
        )
    }))
}

/// Find every remaining occurrence of the options' search tokens under `root`
pub fn find_residue(root: &Path, options: &RenameOptions) -> Result<ResultSet> {
    let entries = collect_entries(root, options.respect_ignore)?;
    let mut result_set = ResultSet::new();

    for dir in &entries.dirs {
        let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(pair) = options.pairs.iter().find(|pair| pair.old() == name) {
            result_set.push(ResultItem::residue(
                display_relative(dir, root),
                None,
                format!("directory still named '{}'", pair.old()),
            ));
        }
    }

    for path in &entries.files {
        let relative = display_relative(path, root);
        match read_file_with_config(path, &options.read) {
            Ok(FileReadResult::Content(bytes)) => {
                result_set.extend(content_residue(&relative, &bytes, &options.pairs));
            }
            Ok(FileReadResult::Skipped(warning)) => {
                debug!(path = %relative, code = warning.code.as_str(), "scanning skipped file");
                result_set.extend(skipped_residue(path, &relative, &warning, &options.pairs)?);
            }
            Err(source) => {
                return Err(RenameError::Read {
                    path: path.clone(),
                    source,
                })
            }
        }
    }

    result_set.sort();
    info!(residues = result_set.len(), "residue check finished");
    Ok(result_set)
}

/// Run the check command; fails when any residue is found
pub fn run_check(root: &Path, options: &RenameOptions, config: RenderConfig) -> AnyResult<Summary> {
    let result_set = find_residue(root, options)?;

    let renderer = Renderer::with_config(config);
    renderer.render_to(&result_set, std::io::stdout().lock())?;

    let summary = result_set.summary();
    if summary.residues > 0 {
        bail!(
            "{} occurrence(s) of search tokens remain under {}",
            summary.residues,
            root.display()
        );
    }
    Ok(summary)
}
