//! Turning dependency sources into a stream of declared dependencies.

use crate::error::ExtractError;
use crate::parsers::parser_for;
use crate::resolve::{ParserMismatch, ResolvedSource, validate_deps_source};
use declared_deps_core::{DeclaredDependency, DepsSource, ParserChoice};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

/// Read a resolved source and run its parser over the contents
fn extract(resolved: &ResolvedSource) -> Result<Vec<DeclaredDependency>, ExtractError> {
    tracing::debug!("Extracting dependencies from {}", resolved.path.display());

    // The file is fully read (and closed) before parsing starts
    let text = fs::read_to_string(&resolved.path).map_err(|source| ExtractError::Read {
        path: resolved.path.clone(),
        source,
    })?;

    parser_for(resolved.parser)
        .parse(&text, &resolved.path)
        .map_err(|source| ExtractError::Malformed {
            path: resolved.path.clone(),
            source,
        })
}

/// Dependencies extracted from a single source
///
/// Iterating consumes the records; call [`parse_source`] again to re-read
/// the file.
#[derive(Debug)]
pub struct ParsedSource {
    resolved: ResolvedSource,
    dependencies: std::vec::IntoIter<DeclaredDependency>,
}

impl ParsedSource {
    pub fn path(&self) -> &Path {
        &self.resolved.path
    }

    pub fn parser(&self) -> ParserChoice {
        self.resolved.parser
    }

    /// Present when an explicit parser choice disagreed with the file name
    pub fn mismatch(&self) -> Option<&ParserMismatch> {
        self.resolved.mismatch.as_ref()
    }
}

impl Iterator for ParsedSource {
    type Item = DeclaredDependency;

    fn next(&mut self) -> Option<Self::Item> {
        self.dependencies.next()
    }
}

/// Resolve, read and parse one dependency source
pub fn parse_source(source: &DepsSource) -> Result<ParsedSource, ExtractError> {
    let resolved = validate_deps_source(&source.path, source.parser_choice)?;
    let dependencies = extract(&resolved)?;

    Ok(ParsedSource {
        resolved,
        dependencies: dependencies.into_iter(),
    })
}

/// One item of the stream produced by [`parse_sources`]
#[derive(Debug)]
pub enum ExtractEvent {
    /// A declared dependency, attributed to its source file
    Dependency(DeclaredDependency),
    /// An explicit parser choice disagreed with a file name (not an error)
    Mismatch(ParserMismatch),
    /// A source that could not be used; later sources are still processed
    Failed(ExtractError),
}

impl ExtractEvent {
    pub fn into_dependency(self) -> Option<DeclaredDependency> {
        match self {
            ExtractEvent::Dependency(dep) => Some(dep),
            _ => None,
        }
    }
}

/// Lazy iterator over the events of several sources, see [`parse_sources`]
pub struct ParseSources<I> {
    sources: I,
    pending: VecDeque<ExtractEvent>,
}

impl<I> ParseSources<I>
where
    I: Iterator<Item = DepsSource>,
{
    fn load(&mut self, source: &DepsSource) {
        let resolved = match validate_deps_source(&source.path, source.parser_choice) {
            Ok(resolved) => resolved,
            Err(err) => {
                self.pending.push_back(ExtractEvent::Failed(err));
                return;
            }
        };

        if let Some(mismatch) = &resolved.mismatch {
            self.pending.push_back(ExtractEvent::Mismatch(mismatch.clone()));
        }

        match extract(&resolved) {
            Ok(dependencies) => self
                .pending
                .extend(dependencies.into_iter().map(ExtractEvent::Dependency)),
            Err(err) => self.pending.push_back(ExtractEvent::Failed(err)),
        }
    }
}

impl<I> Iterator for ParseSources<I>
where
    I: Iterator<Item = DepsSource>,
{
    type Item = ExtractEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            let source = self.sources.next()?;
            self.load(&source);
        }
    }
}

/// Extract dependencies from every source, in order
///
/// Each source is read only when the iterator reaches it. A source's
/// mismatch event (if any) comes before its dependencies; a failing source
/// yields one `Failed` event and iteration moves on to the next source.
pub fn parse_sources<S>(sources: S) -> ParseSources<S::IntoIter>
where
    S: IntoIterator<Item = DepsSource>,
{
    ParseSources {
        sources: sources.into_iter(),
        pending: VecDeque::new(),
    }
}
