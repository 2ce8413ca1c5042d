pub mod cli;
pub mod detector;
pub mod error;
pub mod extract;
pub mod parsers;
pub mod resolve;

pub use cli::Args;
pub use detector::ProjectDetector;
pub use error::{ExtractError, FormatError};
pub use extract::{ExtractEvent, ParseSources, ParsedSource, parse_source, parse_sources};
pub use resolve::{ParserMismatch, ResolvedSource, first_applicable_parser, validate_deps_source};

// Re-export core types for convenience
pub use declared_deps_core::{
    DeclaredDependency, DepsSource, ParserChoice, ParserChoiceError, TableRenderer,
};
