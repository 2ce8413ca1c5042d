pub mod conda;
pub mod pixi;
pub mod pyproject;
pub mod requirements;
pub mod setup_cfg;
pub mod setup_py;

pub use conda::CondaParser;
pub use pixi::PixiParser;
pub use pyproject::PyProjectParser;
pub use requirements::{RequirementsParser, canonical_name};
pub use setup_cfg::SetupCfgParser;
pub use setup_py::SetupPyParser;

// Re-export shared types from core for use by parsers
pub use declared_deps_core::{DeclaredDependency, ParserChoice};

use crate::error::FormatError;
use std::path::Path;

/// Trait for dependency file parsers
pub trait DependencyParser {
    /// Extract the declared dependencies from a file's contents
    ///
    /// `path` is only used to attribute the records; no I/O happens here.
    fn parse(&self, text: &str, path: &Path) -> Result<Vec<DeclaredDependency>, FormatError>;

    /// Check if this parser handles files with the given base name
    fn can_parse(&self, file_name: &str) -> bool;
}

/// The parser implementing a format
pub fn parser_for(choice: ParserChoice) -> &'static dyn DependencyParser {
    match choice {
        ParserChoice::RequirementsTxt => &RequirementsParser,
        ParserChoice::SetupPy => &SetupPyParser,
        ParserChoice::SetupCfg => &SetupCfgParser,
        ParserChoice::PyprojectToml => &PyProjectParser,
        ParserChoice::PixiToml => &PixiParser,
        ParserChoice::EnvironmentYml => &CondaParser,
    }
}
