//! Token pairs
//!
//! A token pair maps a placeholder (`demo-bd`) to its replacement
//! (`change-me`). Pairs are always applied in the order given, both to file
//! contents and to directory names.

use once_cell::sync::Lazy;
use regex::bytes::{NoExpand, Regex as BytesRegex};
use regex::Regex;
use std::str::FromStr;

use crate::error::{RenameError, Result};

/// Placeholder names shipped with the project template, hyphenated form first
pub const DEFAULT_PAIRS: &[(&str, &str)] = &[("demo-bd", "change-me"), ("demo_bd", "change_me")];

/// Static regex for `--pair` arguments
/// Format: OLD=NEW (OLD may not contain '=')
static PAIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^=]+)=(.*)$").expect("Invalid PAIR_RE regex"));

/// A literal search token and its replacement
#[derive(Debug, Clone)]
pub struct TokenPair {
    old: String,
    new: String,
    pattern: BytesRegex,
}

impl TokenPair {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Result<Self> {
        let old = old.into();
        let new = new.into();
        validate_token(&old)?;
        validate_token(&new)?;

        let pattern = BytesRegex::new(&regex::escape(&old)).map_err(|_| RenameError::InvalidToken {
            token: old.clone(),
            reason: "cannot be matched literally",
        })?;

        Ok(Self { old, new, pattern })
    }

    pub fn old(&self) -> &str {
        &self.old
    }

    #[allow(dead_code)]
    pub fn new_token(&self) -> &str {
        &self.new
    }

    /// Number of occurrences of the search token in `content`
    pub fn count(&self, content: &[u8]) -> usize {
        self.pattern.find_iter(content).count()
    }

    /// Replace every occurrence in `content`, returning the new bytes and the
    /// number of substitutions, or `None` when the token does not occur.
    pub fn replace_all(&self, content: &[u8]) -> Option<(Vec<u8>, usize)> {
        let count = self.count(content);
        if count == 0 {
            return None;
        }
        let replaced = self
            .pattern
            .replace_all(content, NoExpand(self.new.as_bytes()))
            .into_owned();
        Some((replaced, count))
    }
}

impl PartialEq for TokenPair {
    fn eq(&self, other: &Self) -> bool {
        self.old == other.old && self.new == other.new
    }
}

impl Eq for TokenPair {}

impl FromStr for TokenPair {
    type Err = RenameError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = PAIR_RE
            .captures(s)
            .ok_or_else(|| RenameError::InvalidPair(s.to_string()))?;
        TokenPair::new(&caps[1], &caps[2])
    }
}

impl std::fmt::Display for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.old, self.new)
    }
}

/// Tokens double as directory names, so path separators and NUL are rejected
fn validate_token(token: &str) -> Result<()> {
    let reason = if token.is_empty() {
        Some("must not be empty")
    } else if token.contains(['/', '\\']) {
        Some("must not contain a path separator")
    } else if token.contains('\0') {
        Some("must not contain a NUL byte")
    } else if token == "." || token == ".." {
        Some("must not be a relative path component")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(RenameError::InvalidToken {
            token: token.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// The template's built-in pairs
pub fn default_pairs() -> Vec<TokenPair> {
    DEFAULT_PAIRS
        .iter()
        .filter_map(|(old, new)| TokenPair::new(*old, *new).ok())
        .collect()
}

/// Parse `OLD=NEW` arguments, falling back to the defaults when none are given
pub fn parse_pairs(args: &[String]) -> Result<Vec<TokenPair>> {
    if args.is_empty() {
        return Ok(default_pairs());
    }
    args.iter().map(|arg| arg.parse()).collect()
}

/// Apply every pair in order to file content.
///
/// Returns the rewritten bytes and the total substitution count, or `None`
/// when the content would not change.
pub fn apply_to_content(pairs: &[TokenPair], content: &[u8]) -> Option<(Vec<u8>, usize)> {
    let mut current: Option<Vec<u8>> = None;
    let mut total = 0;

    for pair in pairs {
        let input = current.as_deref().unwrap_or(content);
        if let Some((replaced, count)) = pair.replace_all(input) {
            total += count;
            current = Some(replaced);
        }
    }

    current.filter(|bytes| bytes.as_slice() != content).map(|bytes| (bytes, total))
}

/// Apply every pair in order to a directory name (exact match only).
///
/// Returns the new name, or `None` when no pair matches.
pub fn apply_to_name(pairs: &[TokenPair], name: &str) -> Option<String> {
    let mut current = name;
    for pair in pairs {
        if current == pair.old {
            current = &pair.new;
        }
    }
    (current != name).then(|| current.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pairs_order() {
        let pairs = default_pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].old(), "demo-bd");
        assert_eq!(pairs[0].new_token(), "change-me");
        assert_eq!(pairs[1].old(), "demo_bd");
        assert_eq!(pairs[1].new_token(), "change_me");
    }

    #[test]
    fn test_parse_pair() {
        let pair: TokenPair = "demo-bd=acme-api".parse().unwrap();
        assert_eq!(pair.old(), "demo-bd");
        assert_eq!(pair.new_token(), "acme-api");
        assert_eq!(pair.to_string(), "demo-bd=acme-api");
    }

    #[test]
    fn test_parse_pair_rejects_missing_separator() {
        let err = "demo-bd".parse::<TokenPair>().unwrap_err();
        assert!(matches!(err, RenameError::InvalidPair(_)));
    }

    #[test]
    fn test_parse_pair_rejects_empty_sides() {
        assert!(matches!(
            "=x".parse::<TokenPair>().unwrap_err(),
            RenameError::InvalidPair(_)
        ));
        assert!(matches!(
            "x=".parse::<TokenPair>().unwrap_err(),
            RenameError::InvalidToken { .. }
        ));
    }

    #[test]
    fn test_tokens_reject_path_separators() {
        assert!(TokenPair::new("demo_bd", "a/b").is_err());
        assert!(TokenPair::new("a\\b", "x").is_err());
        assert!(TokenPair::new("..", "x").is_err());
    }

    #[test]
    fn test_parse_pairs_defaults_when_empty() {
        assert_eq!(parse_pairs(&[]).unwrap(), default_pairs());

        let custom = parse_pairs(&["demo_bd=acme".to_string()]).unwrap();
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].old(), "demo_bd");
    }

    #[test]
    fn test_replace_all_is_literal() {
        let pair = TokenPair::new("a.c", "X").unwrap();
        let (out, count) = pair.replace_all(b"abc a.c").unwrap();
        assert_eq!(out, b"abc X");
        assert_eq!(count, 1);

        let pair = TokenPair::new("x", "$1").unwrap();
        let (out, _) = pair.replace_all(b"x").unwrap();
        assert_eq!(out, b"$1");
    }

    #[test]
    fn test_apply_to_content_both_tokens() {
        let pairs = default_pairs();
        let (out, count) =
            apply_to_content(&pairs, b"name = \"demo-bd\"\npackages = [\"demo_bd\"]\n").unwrap();
        assert_eq!(out, b"name = \"change-me\"\npackages = [\"change_me\"]\n");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_apply_to_content_no_match() {
        assert!(apply_to_content(&default_pairs(), b"nothing to see").is_none());
    }

    #[test]
    fn test_apply_to_content_identity_pair_is_no_change() {
        let pairs = vec![TokenPair::new("same", "same").unwrap()];
        assert!(apply_to_content(&pairs, b"same").is_none());
    }

    #[test]
    fn test_apply_to_content_non_utf8() {
        let pairs = default_pairs();
        let (out, _) = apply_to_content(&pairs, b"\xE9 demo_bd \xFF").unwrap();
        assert_eq!(out, b"\xE9 change_me \xFF");
    }

    #[test]
    fn test_apply_to_name_exact_only() {
        let pairs = default_pairs();
        assert_eq!(apply_to_name(&pairs, "demo_bd"), Some("change_me".to_string()));
        assert_eq!(apply_to_name(&pairs, "demo-bd"), Some("change-me".to_string()));
        assert_eq!(apply_to_name(&pairs, "demo_bd_tests"), None);
        assert_eq!(apply_to_name(&pairs, "src"), None);
    }

    #[test]
    fn test_apply_to_name_chains_in_order() {
        let pairs = vec![
            TokenPair::new("a", "b").unwrap(),
            TokenPair::new("b", "c").unwrap(),
        ];
        assert_eq!(apply_to_name(&pairs, "a"), Some("c".to_string()));
    }
}
