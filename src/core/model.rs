//! Unified Result Model
//!
//! Every command (apply, plan, check) maps what it did or would do onto this
//! model before rendering output.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// File content rewritten (or to be rewritten)
    Edit,
    /// Directory renamed (or to be renamed)
    Rename,
    /// File left alone by policy (binary, oversized)
    Skip,
    /// Staging index outcome
    Index,
    /// Token still present after a run
    Residue,
    Error,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// File size in bytes (after rewriting, for edits)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// XXH3 hash of the rewritten content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Error information for a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCode {
    pub code: String,
    pub message: String,
}

impl IssueCode {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Path relative to root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Rename destination relative to root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// 1-based line number (residue only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// Line excerpt, skip reason or index note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Number of token substitutions in the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacements: Option<usize>,

    /// Whether the change was written to disk
    #[serde(default)]
    pub applied: bool,

    #[serde(default)]
    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<IssueCode>,
}

impl ResultItem {
    fn blank(kind: Kind) -> Self {
        Self {
            kind,
            path: None,
            target: None,
            line: None,
            excerpt: None,
            replacements: None,
            applied: false,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a content edit result
    pub fn edit(path: impl Into<String>, replacements: usize) -> Self {
        Self {
            path: Some(path.into()),
            replacements: Some(replacements),
            ..Self::blank(Kind::Edit)
        }
    }

    /// Create a directory rename result
    pub fn rename(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            path: Some(from.into()),
            target: Some(to.into()),
            ..Self::blank(Kind::Rename)
        }
    }

    /// Create a skipped-file result carrying the warning that caused it
    pub fn skip(path: impl Into<String>, issue: IssueCode) -> Self {
        Self {
            path: Some(path.into()),
            excerpt: Some(issue.message.clone()),
            errors: vec![issue],
            ..Self::blank(Kind::Skip)
        }
    }

    /// Create a staging index result
    pub fn index(path: Option<String>, note: impl Into<String>) -> Self {
        Self {
            path,
            excerpt: Some(note.into()),
            ..Self::blank(Kind::Index)
        }
    }

    /// Create a residue result; `line` is `None` for directory names
    pub fn residue(path: impl Into<String>, line: Option<u32>, excerpt: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            line,
            excerpt: Some(excerpt.into()),
            ..Self::blank(Kind::Residue)
        }
    }

    /// Create a new error result
    pub fn error(error: IssueCode) -> Self {
        Self {
            errors: vec![error],
            ..Self::blank(Kind::Error)
        }
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Mark whether the change reached the disk
    pub fn with_applied(mut self, applied: bool) -> Self {
        self.applied = applied;
        self
    }
}

/// Per-kind counts over a result set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub edits: usize,
    pub replacements: usize,
    pub renames: usize,
    pub skipped: usize,
    pub residues: usize,
    pub errors: usize,
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    /// Sort items by path and line for stable output
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| match (&a.path, &b.path) {
            (Some(pa), Some(pb)) => pa.cmp(pb).then_with(|| match (a.line, b.line) {
                (Some(la), Some(lb)) => la.cmp(&lb),
                (None, Some(_)) => std::cmp::Ordering::Less,
                (Some(_), None) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for item in &self.items {
            match item.kind {
                Kind::Edit => {
                    summary.edits += 1;
                    summary.replacements += item.replacements.unwrap_or(0);
                }
                Kind::Rename => summary.renames += 1,
                Kind::Skip => summary.skipped += 1,
                Kind::Residue => summary.residues += 1,
                Kind::Error => summary.errors += 1,
                Kind::Index => {}
            }
        }
        summary
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
