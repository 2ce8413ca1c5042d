use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown dependency parser: {0} (expected one of: {list})", list = ParserChoice::names().join(", "))]
pub struct ParserChoiceError(pub String);

/// Supported dependency declaration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParserChoice {
    #[serde(rename = "requirements.txt")]
    RequirementsTxt,
    #[serde(rename = "setup.py")]
    SetupPy,
    #[serde(rename = "setup.cfg")]
    SetupCfg,
    #[serde(rename = "pyproject.toml")]
    PyprojectToml,
    #[serde(rename = "pixi.toml")]
    PixiToml,
    #[serde(rename = "environment.yml")]
    EnvironmentYml,
}

impl ParserChoice {
    /// Every format, in resolution priority order
    pub const ALL: [ParserChoice; 6] = [
        ParserChoice::RequirementsTxt,
        ParserChoice::SetupPy,
        ParserChoice::SetupCfg,
        ParserChoice::PyprojectToml,
        ParserChoice::PixiToml,
        ParserChoice::EnvironmentYml,
    ];

    /// The canonical file name of this format
    pub fn as_str(&self) -> &'static str {
        match self {
            ParserChoice::RequirementsTxt => "requirements.txt",
            ParserChoice::SetupPy => "setup.py",
            ParserChoice::SetupCfg => "setup.cfg",
            ParserChoice::PyprojectToml => "pyproject.toml",
            ParserChoice::PixiToml => "pixi.toml",
            ParserChoice::EnvironmentYml => "environment.yml",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(ParserChoice::as_str).collect()
    }
}

impl fmt::Display for ParserChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParserChoice {
    type Err = ParserChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|choice| choice.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParserChoiceError(s.to_string()))
    }
}

/// A candidate dependency declaration file, optionally pinned to a parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepsSource {
    /// Location of the file (need not exist until it is parsed)
    pub path: PathBuf,
    /// Parser requested by the caller, overriding filename inference
    pub parser_choice: Option<ParserChoice>,
}

impl DepsSource {
    pub fn new(path: impl Into<PathBuf>, parser_choice: Option<ParserChoice>) -> Self {
        Self {
            path: path.into(),
            parser_choice,
        }
    }

    /// A source whose parser is inferred from its file name
    pub fn inferred(path: impl Into<PathBuf>) -> Self {
        Self::new(path, None)
    }
}

/// A dependency declared by a project (generic across formats)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredDependency {
    /// Package name (canonical key, or the raw conda package name)
    pub name: String,
    /// File this dependency was declared in
    pub source: PathBuf,
}

impl DeclaredDependency {
    pub fn new(name: impl Into<String>, source: &Path) -> Self {
        Self {
            name: name.into(),
            source: source.to_path_buf(),
        }
    }
}
