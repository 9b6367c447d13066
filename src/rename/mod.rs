//! Rename module - Placeholder renaming across a project tree
//!
//! Provides:
//! - pairs: Token pairs and substitution
//! - walk: Tree traversal (VCS metadata excluded)
//! - plan: Dry-run computation of edits and directory renames
//! - apply: Fail-fast execution of a plan
//! - index: Git staging index reset
//! - check: Residue verification

pub mod apply;
pub mod check;
pub mod index;
pub mod pairs;
pub mod plan;
pub mod walk;
