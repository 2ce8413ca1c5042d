use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a single dependency source could not be used
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unrecognized dependency file: {}", path.display())]
    UnrecognizedSource { path: PathBuf },

    #[error("Failed to read dependency file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

impl ExtractError {
    /// The source path this error is about
    pub fn path(&self) -> &Path {
        match self {
            ExtractError::UnrecognizedSource { path }
            | ExtractError::Read { path, .. }
            | ExtractError::Malformed { path, .. } => path,
        }
    }
}

/// A file's content does not follow its format's grammar
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid Python syntax at line {line}, column {column}")]
    Syntax { line: usize, column: usize },

    #[error("tree-sitter error: {0}")]
    TreeSitter(String),

    #[error("invalid requirement on line {line}: {text:?}")]
    InvalidRequirement { line: usize, text: String },

    #[error("invalid INI: {0}")]
    Ini(String),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
