//! Deciding which parser handles a dependency file.

use crate::error::ExtractError;
use crate::parsers::parser_for;
use declared_deps_core::ParserChoice;
use std::fmt;
use std::path::{Path, PathBuf};

/// The parser that automatically applies to `path`, judged by its base name
///
/// Rules are tried in `ParserChoice::ALL` order and the first match wins.
/// Leading directories are ignored, so `requirements.txt/wat` matches nothing.
pub fn first_applicable_parser(path: &Path) -> Option<ParserChoice> {
    let file_name = path.file_name()?.to_str()?;

    ParserChoice::ALL
        .into_iter()
        .find(|choice| parser_for(*choice).can_parse(file_name))
}

/// An explicit parser choice that disagrees with the file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserMismatch {
    pub path: PathBuf,
    /// The parser requested by the caller (and used)
    pub applied: ParserChoice,
    /// What the file name alone would have selected
    pub inferred: Option<ParserChoice>,
}

impl fmt::Display for ParserMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Manually applying parser '{}' to dependencies: {}",
            self.applied,
            self.path.display()
        )
    }
}

/// A path paired with the parser that will read it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub path: PathBuf,
    pub parser: ParserChoice,
    /// Set when an explicit choice overrode a different (or no) inference
    pub mismatch: Option<ParserMismatch>,
}

/// Finalize the parser for `path`
///
/// An explicit `parser_choice` always wins; if the file name points to a
/// different parser (or none), the result carries a [`ParserMismatch`].
/// Without an explicit choice the file name must be recognized.
pub fn validate_deps_source(
    path: &Path,
    parser_choice: Option<ParserChoice>,
) -> Result<ResolvedSource, ExtractError> {
    let inferred = first_applicable_parser(path);

    let (parser, mismatch) = match (parser_choice, inferred) {
        (Some(applied), inferred) if inferred != Some(applied) => (
            applied,
            Some(ParserMismatch {
                path: path.to_path_buf(),
                applied,
                inferred,
            }),
        ),
        (Some(applied), _) => (applied, None),
        (None, Some(inferred)) => (inferred, None),
        (None, None) => {
            return Err(ExtractError::UnrecognizedSource {
                path: path.to_path_buf(),
            });
        }
    };

    tracing::debug!("Using parser '{}' for {}", parser, path.display());

    Ok(ResolvedSource {
        path: path.to_path_buf(),
        parser,
        mismatch,
    })
}
