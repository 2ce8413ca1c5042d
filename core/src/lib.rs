pub mod output;
pub mod types;

// Re-export commonly used types at crate root
pub use output::TableRenderer;
pub use types::{DeclaredDependency, DepsSource, ParserChoice, ParserChoiceError};
