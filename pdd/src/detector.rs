use crate::resolve::first_applicable_parser;
use anyhow::{Context, Result};
use declared_deps_core::{DepsSource, ParserChoice};
use std::fs;
use std::path::{Path, PathBuf};

/// Directories that never contain a project's own declarations
const SKIPPED_DIRS: [&str; 3] = ["__pycache__", "node_modules", "site-packages"];

/// Collects dependency sources from files and project directories
pub struct ProjectDetector {
    parser_choice: Option<ParserChoice>,
}

impl ProjectDetector {
    /// `parser_choice` overrides file name inference for every source
    pub fn new(parser_choice: Option<ParserChoice>) -> Self {
        Self { parser_choice }
    }

    /// Sources for the given paths, in order
    ///
    /// Files are used as given. Directories are walked recursively (hidden
    /// directories skipped, entries sorted by name) and every recognized file
    /// becomes a source; with a parser override, only files of that kind are
    /// picked up from directories.
    pub fn detect(&self, paths: &[PathBuf]) -> Result<Vec<DepsSource>> {
        let mut sources = Vec::new();

        for path in paths {
            if path.is_dir() {
                self.walk(path, &mut sources)?;
            } else if path.exists() {
                sources.push(DepsSource::new(path.clone(), self.parser_choice));
            } else {
                anyhow::bail!("Path does not exist: {}", path.display());
            }
        }

        Ok(sources)
    }

    fn walk(&self, dir: &Path, sources: &mut Vec<DepsSource>) -> Result<()> {
        let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
            .flatten()
            .collect();
        entries.sort_by_key(fs::DirEntry::file_name);

        for entry in entries {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                if name.starts_with('.') || SKIPPED_DIRS.contains(&&*name) {
                    continue;
                }
                self.walk(&path, sources)?;
            } else if file_type.is_file() {
                let Some(inferred) = first_applicable_parser(&path) else {
                    continue;
                };
                if self.parser_choice.is_none_or(|choice| choice == inferred) {
                    sources.push(DepsSource::new(path, self.parser_choice));
                }
            }
        }

        Ok(())
    }
}
