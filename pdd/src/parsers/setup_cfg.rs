use super::requirements::parse_requirements;
use super::{DeclaredDependency, DependencyParser};
use crate::error::FormatError;
use configparser::ini::Ini;
use std::path::Path;

const OPTIONS_SECTION: &str = "options";
const EXTRAS_SECTION: &str = "options.extras_require";
const OPTIONS_KEYS: [&str; 2] = ["install_requires", "tests_require"];

/// Parser for setuptools' declarative setup.cfg
pub struct SetupCfgParser;

impl SetupCfgParser {
    /// Values before any `[section]` header are not valid INI
    fn check_leading_section(text: &str) -> Result<(), FormatError> {
        let first = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .find(|(_, line)| !line.is_empty() && !line.starts_with(['#', ';']));

        match first {
            Some((line_number, line)) if !(line.starts_with('[') && line.ends_with(']')) => {
                Err(FormatError::Ini(format!(
                    "line {line_number}: expected a [section] header, found {line:?}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Parse one multi-line value as a small requirements file
    ///
    /// `file:`/`attr:` directives point elsewhere and are skipped.
    fn parse_value(value: &str, path: &Path) -> Result<Vec<DeclaredDependency>, FormatError> {
        let trimmed = value.trim_start();
        if trimmed.starts_with("file:") || trimmed.starts_with("attr:") {
            tracing::debug!("Skipping indirect requirements {:?} in {}", trimmed, path.display());
            return Ok(Vec::new());
        }
        parse_requirements(value, path)
    }
}

impl DependencyParser for SetupCfgParser {
    fn parse(&self, text: &str, path: &Path) -> Result<Vec<DeclaredDependency>, FormatError> {
        Self::check_leading_section(text)?;

        let mut config = Ini::new();
        config.set_multiline(true);
        config.read(text.to_string()).map_err(FormatError::Ini)?;

        let mut dependencies = Vec::new();

        // [options] install_requires / tests_require
        for key in OPTIONS_KEYS {
            if let Some(value) = config.get(OPTIONS_SECTION, key) {
                dependencies.extend(Self::parse_value(&value, path)?);
            }
        }

        // [options.extras_require] - one requirements list per extra
        if let Some(extras) = config.get_map_ref().get(EXTRAS_SECTION) {
            let mut extra_names: Vec<&String> = extras.keys().collect();
            extra_names.sort();

            for extra in extra_names {
                if let Some(Some(value)) = extras.get(extra) {
                    dependencies.extend(Self::parse_value(value, path)?);
                }
            }
        }

        Ok(dependencies)
    }

    fn can_parse(&self, file_name: &str) -> bool {
        file_name == "setup.cfg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        SetupCfgParser
            .parse(text, Path::new("setup.cfg"))
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect()
    }

    #[test]
    fn test_install_requires() {
        let text = r#"[metadata]
name = MyLib

[options]
install_requires =
    dependencyA
    dependencyB>=1.0
"#;
        assert_eq!(names(text), vec!["dependencya", "dependencyb"]);
    }

    #[test]
    fn test_extras_and_tests_require() {
        let text = r#"[options]
install_requires = pandas
tests_require =
    pytest

[options.extras_require]
test =
    hypothesis
    tox
docs = sphinx
"#;
        assert_eq!(
            names(text),
            vec!["pandas", "pytest", "sphinx", "hypothesis", "tox"]
        );
    }

    #[test]
    fn test_missing_sections_yield_nothing() {
        assert!(names("[metadata]\nname = MyLib\n").is_empty());
        assert!(names("").is_empty());
    }

    #[test]
    fn test_missing_section_header_is_malformed() {
        let err = SetupCfgParser
            .parse("not an ini at all ]]][[\n", Path::new("setup.cfg"))
            .unwrap_err();
        assert!(matches!(err, FormatError::Ini(_)), "{err}");

        let err = SetupCfgParser
            .parse("# header comment\ninstall_requires = pandas\n", Path::new("setup.cfg"))
            .unwrap_err();
        assert!(matches!(err, FormatError::Ini(ref message) if message.starts_with("line 2")));
    }

    #[test]
    fn test_leading_comments_before_section() {
        let text = "# generated\n; legacy comment\n\n[options]\ninstall_requires = pandas\n";
        assert_eq!(names(text), vec!["pandas"]);
    }

    #[test]
    fn test_file_directive_is_skipped() {
        let text = "[options]\ninstall_requires = file: requirements.in\n";
        assert!(names(text).is_empty());
    }

    #[test]
    fn test_can_parse() {
        assert!(SetupCfgParser.can_parse("setup.cfg"));
        assert!(!SetupCfgParser.can_parse("setup.py"));
    }
}
