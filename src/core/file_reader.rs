//! File reading strategies for in-place rewriting
//!
//! Provides consistent handling for:
//! - Binary files
//! - Oversized files
//!
//! Content is kept as raw bytes: substitution never round-trips through a
//! lossy UTF-8 conversion, so non-UTF-8 text survives a rewrite intact.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::core::model::IssueCode;

/// Default maximum file size in bytes (64 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// How many leading bytes are sniffed for NUL when detecting binary content
pub const BINARY_SNIFF_LEN: usize = 8192;

/// Strategy for handling files that look binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryStrategy {
    /// Leave binary files untouched
    #[default]
    Skip,
    /// Substitute in binary files like any other file
    Rewrite,
}

impl std::str::FromStr for BinaryStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(BinaryStrategy::Skip),
            "rewrite" => Ok(BinaryStrategy::Rewrite),
            _ => Err(format!("Unknown binary strategy: {}", s)),
        }
    }
}

/// Configuration for file reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReadConfig {
    /// Files above this size (bytes) are skipped
    pub max_file_size: u64,

    /// How to handle binary content
    pub binary_strategy: BinaryStrategy,
}

impl Default for FileReadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            binary_strategy: BinaryStrategy::Skip,
        }
    }
}

/// Warning codes for skipped files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningCode {
    /// File was skipped due to size
    FileSkippedSize,
    /// File appears to be binary
    BinaryFile,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::FileSkippedSize => "FILE_SKIPPED_SIZE",
            WarningCode::BinaryFile => "BINARY_FILE",
        }
    }
}

/// A structured warning explaining why a file was not read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileWarning {
    pub code: WarningCode,
    pub message: String,
}

impl FileWarning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Convert to an IssueCode for embedding in ResultItem
    pub fn to_issue(&self) -> IssueCode {
        IssueCode::new(self.code.as_str(), &self.message)
    }
}

/// Result of reading a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileReadResult {
    /// Full file content
    Content(Vec<u8>),
    /// File left alone by policy
    Skipped(FileWarning),
}

/// Whether the leading bytes contain a NUL byte
pub fn looks_binary(bytes: &[u8]) -> bool {
    let check_len = std::cmp::min(BINARY_SNIFF_LEN, bytes.len());
    bytes[..check_len].contains(&0)
}

/// Read a whole file subject to the size and binary policies.
///
/// I/O failures are returned as errors; policy skips are not.
pub fn read_file_with_config(path: &Path, config: &FileReadConfig) -> std::io::Result<FileReadResult> {
    let mut file = fs::File::open(path)?;
    let file_size = file.metadata()?.len();

    if file_size > config.max_file_size {
        return Ok(FileReadResult::Skipped(FileWarning::new(
            WarningCode::FileSkippedSize,
            format!(
                "file exceeds size limit ({} > {} bytes)",
                file_size, config.max_file_size
            ),
        )));
    }

    let mut buffer = Vec::with_capacity(file_size as usize);
    file.read_to_end(&mut buffer)?;

    if config.binary_strategy == BinaryStrategy::Skip && looks_binary(&buffer) {
        return Ok(FileReadResult::Skipped(FileWarning::new(
            WarningCode::BinaryFile,
            "file appears to be binary (contains null bytes)",
        )));
    }

    Ok(FileReadResult::Content(buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_read_config_default() {
        let config = FileReadConfig::default();
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.binary_strategy, BinaryStrategy::Skip);
    }

    #[test]
    fn test_read_text_file() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("README.md");
        fs::write(&file_path, "# demo-bd\n").unwrap();

        let result = read_file_with_config(&file_path, &FileReadConfig::default()).unwrap();
        assert_eq!(result, FileReadResult::Content(b"# demo-bd\n".to_vec()));
    }

    #[test]
    fn test_read_non_utf8_text_is_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("latin1.txt");
        let bytes = vec![0xE9, b' ', b'd', b'e', b'm', b'o'];
        fs::write(&file_path, &bytes).unwrap();

        let result = read_file_with_config(&file_path, &FileReadConfig::default()).unwrap();
        assert_eq!(result, FileReadResult::Content(bytes));
    }

    #[test]
    fn test_read_binary_skipped() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("logo.png");
        fs::write(&file_path, [0x89, b'P', 0x00, b'd', b'e', b'm', b'o']).unwrap();

        let result = read_file_with_config(&file_path, &FileReadConfig::default()).unwrap();
        match result {
            FileReadResult::Skipped(warning) => assert_eq!(warning.code, WarningCode::BinaryFile),
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn test_read_binary_rewrite_strategy() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("blob.bin");
        fs::write(&file_path, [0x00, 0x01]).unwrap();

        let config = FileReadConfig {
            binary_strategy: BinaryStrategy::Rewrite,
            ..Default::default()
        };
        let result = read_file_with_config(&file_path, &config).unwrap();
        assert_eq!(result, FileReadResult::Content(vec![0x00, 0x01]));
    }

    #[test]
    fn test_read_oversized_skipped() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("big.txt");
        fs::write(&file_path, "demo-bd demo-bd").unwrap();

        let config = FileReadConfig {
            max_file_size: 4,
            ..Default::default()
        };
        let result = read_file_with_config(&file_path, &config).unwrap();
        match result {
            FileReadResult::Skipped(warning) => {
                assert_eq!(warning.code, WarningCode::FileSkippedSize);
                assert_eq!(warning.to_issue().code, "FILE_SKIPPED_SIZE");
            }
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn test_looks_binary_only_sniffs_prefix() {
        let mut bytes = vec![b'a'; BINARY_SNIFF_LEN];
        bytes.push(0);
        assert!(!looks_binary(&bytes));
        assert!(looks_binary(&[b'a', 0]));
        assert!(!looks_binary(&[]));
    }

    #[test]
    fn test_binary_strategy_parse() {
        assert_eq!("skip".parse::<BinaryStrategy>().unwrap(), BinaryStrategy::Skip);
        assert_eq!("REWRITE".parse::<BinaryStrategy>().unwrap(), BinaryStrategy::Rewrite);
        assert!("maybe".parse::<BinaryStrategy>().is_err());
    }

    #[test]
    fn test_read_nonexistent_file_is_error() {
        let result = read_file_with_config(Path::new("/nonexistent/file.txt"), &FileReadConfig::default());
        assert!(result.is_err());
    }
}
