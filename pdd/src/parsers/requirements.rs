use super::{DeclaredDependency, DependencyParser};
use crate::error::FormatError;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// A PEP 508 project name at the start of a requirement
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?").expect("valid name regex")
});

static SEPARATOR_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9.]+").expect("valid separator regex"));

/// `#` at line start or after whitespace starts a comment
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s+)#.*$").expect("valid comment regex"));

/// Canonical key of a distribution name: runs of anything other than
/// alphanumerics and `.` collapse to `-`, then everything is lower-cased.
pub fn canonical_name(name: &str) -> String {
    SEPARATOR_RUN_RE
        .replace_all(name.trim(), "-")
        .to_lowercase()
}

/// Parser for requirements.txt files and other files in pip's requirements format
pub struct RequirementsParser;

impl RequirementsParser {
    /// Join backslash continuations, returning each logical line with its
    /// 1-indexed starting line number
    fn logical_lines(text: &str) -> Vec<(usize, String)> {
        let mut lines = Vec::new();
        let mut pending: Option<(usize, String)> = None;

        for (idx, raw) in text.lines().enumerate() {
            let (start, mut buf) = pending.take().unwrap_or((idx + 1, String::new()));

            if let Some(head) = raw.strip_suffix('\\') {
                buf.push_str(head);
                pending = Some((start, buf));
            } else {
                buf.push_str(raw);
                lines.push((start, buf));
            }
        }

        // A trailing backslash on the last line continues into nothing
        if let Some(last) = pending {
            lines.push(last);
        }

        lines
    }

    /// Extract the project name from a single requirement line
    ///
    /// Returns `Ok(None)` for blank lines, comments and pip options.
    fn parse_line(line: &str, line_number: usize) -> Result<Option<String>, FormatError> {
        let without_comment = COMMENT_RE.replace(line, "");
        let line = without_comment.trim();

        if line.is_empty() {
            return Ok(None);
        }

        // -r/-c includes, -e editables and --index-url style options are not
        // name declarations and are never followed
        if line.starts_with('-') {
            return Ok(None);
        }

        let invalid = || FormatError::InvalidRequirement {
            line: line_number,
            text: line.to_string(),
        };

        let name = NAME_RE.find(line).ok_or_else(invalid)?;

        // Whatever follows the name must be extras, a specifier, a URL, markers
        // or per-requirement options such as `--hash`
        let rest = line[name.end()..].trim_start();
        let follows_name = rest
            .chars()
            .next()
            .is_none_or(|c| "[(<>=!~;@,-".contains(c));

        if !follows_name {
            return Err(invalid());
        }

        Ok(Some(canonical_name(name.as_str())))
    }

    /// Names of every requirement in `text`, in file order
    pub fn requirement_names(text: &str) -> Result<Vec<String>, FormatError> {
        let mut names = Vec::new();

        for (line_number, line) in Self::logical_lines(text) {
            if let Some(name) = Self::parse_line(&line, line_number)? {
                names.push(name);
            }
        }

        Ok(names)
    }
}

/// Parse requirements-format text into dependencies attributed to `path`
///
/// Also used for single requirement strings taken from other formats.
pub fn parse_requirements(text: &str, path: &Path) -> Result<Vec<DeclaredDependency>, FormatError> {
    Ok(RequirementsParser::requirement_names(text)?
        .into_iter()
        .map(|name| DeclaredDependency::new(name, path))
        .collect())
}

impl DependencyParser for RequirementsParser {
    fn parse(&self, text: &str, path: &Path) -> Result<Vec<DeclaredDependency>, FormatError> {
        parse_requirements(text, path)
    }

    fn can_parse(&self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        name.contains("requirements") && (name.ends_with(".txt") || name.ends_with(".in"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        RequirementsParser::requirement_names(text).unwrap()
    }

    #[test]
    fn test_parse_simple_packages() {
        assert_eq!(names("pandas\nclick\n"), vec!["pandas", "click"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        assert_eq!(names("click\npandas\nclick\n"), vec!["click", "pandas", "click"]);
    }

    #[test]
    fn test_parse_version_specifiers() {
        let text = "requests==2.28.0\nnumpy>=1.24.0\ndjango>=2.0,<3.0\npytest~=7.0\nclick!=8.0.0\n";
        assert_eq!(names(text), vec!["requests", "numpy", "django", "pytest", "click"]);
    }

    #[test]
    fn test_parse_with_extras() {
        let text = "requests[security]>=2.0.0\ncelery[redis,msgpack]==5.2.0\n";
        assert_eq!(names(text), vec!["requests", "celery"]);
    }

    #[test]
    fn test_parse_with_comments() {
        let text = "# This is a comment\nrequests==2.28.0  # inline comment\n\nnumpy>=1.24.0\n";
        assert_eq!(names(text), vec!["requests", "numpy"]);
    }

    #[test]
    fn test_parse_with_environment_markers() {
        let text = "dataclasses>=0.6; python_version < '3.7'\ntyping-extensions ; python_version >= '3.8'\n";
        assert_eq!(names(text), vec!["dataclasses", "typing-extensions"]);
    }

    #[test]
    fn test_parse_url_requirement() {
        assert_eq!(
            names("pip @ https://github.com/pypa/pip/archive/22.0.zip\n"),
            vec!["pip"]
        );
    }

    #[test]
    fn test_parse_skip_directives() {
        let text = "--index-url https://pypi.org/simple\n-r requirements-dev.txt\n-e .\nrequests==2.28.0\n";
        assert_eq!(names(text), vec!["requests"]);
    }

    #[test]
    fn test_line_continuation() {
        let text = "requests \\\n    >=2.0\nnumpy\n";
        assert_eq!(names(text), vec!["requests", "numpy"]);
    }

    #[test]
    fn test_names_are_canonicalized() {
        let text = "Foo_Bar\nPyYAML\nzope.interface\nruamel--yaml\n";
        assert_eq!(
            names(text),
            vec!["foo-bar", "pyyaml", "zope.interface", "ruamel-yaml"]
        );
    }

    #[test]
    fn test_invalid_requirement_reports_line() {
        let err = RequirementsParser::requirement_names("pandas\n./local/package\n").unwrap_err();
        match err {
            FormatError::InvalidRequirement { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, "./local/package");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_words_after_name_are_invalid() {
        for text in ["pandas click\n", "name with spaces\n"] {
            let err = RequirementsParser::requirement_names(text).unwrap_err();
            assert!(
                matches!(err, FormatError::InvalidRequirement { line: 1, .. }),
                "{text:?}: {err}"
            );
        }
    }

    #[test]
    fn test_per_requirement_options_are_allowed() {
        let text = "requests==2.28.0 --hash=sha256:abcdef\nclick --hash=sha256:012345\n";
        assert_eq!(names(text), vec!["requests", "click"]);
    }

    #[test]
    fn test_bare_url_is_invalid() {
        assert!(RequirementsParser::requirement_names("https://example.com/pkg.zip\n").is_err());
    }

    #[test]
    fn test_parse_attributes_path() {
        let deps = parse_requirements("pandas\n", Path::new("sub/requirements.txt")).unwrap();
        assert_eq!(deps, vec![DeclaredDependency::new("pandas", Path::new("sub/requirements.txt"))]);
    }

    #[test]
    fn test_can_parse() {
        let parser = RequirementsParser;
        for name in [
            "requirements.txt",
            "requirements.in",
            "requirements-dev.txt",
            "test-requirements.txt",
            "extra-requirements-dev.txt",
            "abc_requirements.txt",
            "requirements_abc.txt",
            "more_requirements_stuff.txt",
            "evenrequirementsthis.txt",
            "REQUIREMENTS.TXT",
        ] {
            assert!(parser.can_parse(name), "{name}");
        }
        assert!(!parser.can_parse("pyproject.toml"));
        assert!(!parser.can_parse("setup.py"));
        assert!(!parser.can_parse("requirements.md"));
        assert!(!parser.can_parse("reqs.txt"));
    }
}
