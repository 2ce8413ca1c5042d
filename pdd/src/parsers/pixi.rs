use super::requirements::canonical_name;
use super::{DeclaredDependency, DependencyParser};
use crate::error::FormatError;
use std::path::Path;
use toml::Value;

/// Parser for pixi.toml project manifests
pub struct PixiParser;

/// Dependencies declared in a pixi manifest table
///
/// `manifest` is either the whole pixi.toml or the `[tool.pixi]` table of a
/// pyproject.toml. Conda names are kept as declared, PyPI names are
/// canonicalized. `python` is the interpreter, not a dependency.
pub(super) fn pixi_dependencies(manifest: &Value, path: &Path) -> Vec<DeclaredDependency> {
    let mut dependencies = Vec::new();

    collect_tables(manifest, path, &mut dependencies);

    // [feature.<name>.dependencies] / [feature.<name>.pypi-dependencies]
    if let Some(features) = manifest.get("feature").and_then(|f| f.as_table()) {
        for (_feature_name, feature) in features {
            collect_tables(feature, path, &mut dependencies);
        }
    }

    dependencies
}

fn collect_tables(table: &Value, path: &Path, dependencies: &mut Vec<DeclaredDependency>) {
    if let Some(conda) = table.get("dependencies").and_then(|d| d.as_table()) {
        dependencies.extend(
            conda
                .keys()
                .filter(|name| name.as_str() != "python")
                .map(|name| DeclaredDependency::new(name.as_str(), path)),
        );
    }

    if let Some(pypi) = table.get("pypi-dependencies").and_then(|d| d.as_table()) {
        dependencies.extend(
            pypi.keys()
                .filter(|name| name.as_str() != "python")
                .map(|name| DeclaredDependency::new(canonical_name(name), path)),
        );
    }
}

impl DependencyParser for PixiParser {
    fn parse(&self, text: &str, path: &Path) -> Result<Vec<DeclaredDependency>, FormatError> {
        let manifest: Value = toml::from_str(text)?;
        Ok(pixi_dependencies(&manifest, path))
    }

    fn can_parse(&self, file_name: &str) -> bool {
        file_name == "pixi.toml"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        PixiParser
            .parse(text, Path::new("pixi.toml"))
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect()
    }

    #[test]
    fn test_conda_and_pypi_dependencies() {
        let text = r#"[project]
name = "demo"
channels = ["conda-forge"]
platforms = ["linux-64"]

[dependencies]
python = ">=3.10"
numpy = ">=1.24"

[pypi-dependencies]
Flask_Login = "*"
"#;
        assert_eq!(names(text), vec!["numpy", "flask-login"]);
    }

    #[test]
    fn test_feature_dependencies() {
        let text = r#"[dependencies]
pandas = "*"

[feature.test.dependencies]
pytest = "*"

[feature.docs.pypi-dependencies]
mkdocs = { version = ">=1.5" }
"#;
        let mut found = names(text);
        found.sort();
        assert_eq!(found, vec!["mkdocs", "pandas", "pytest"]);
    }

    #[test]
    fn test_no_dependency_tables() {
        assert!(names("[project]\nname = \"demo\"\n").is_empty());
    }

    #[test]
    fn test_invalid_toml() {
        let err = PixiParser
            .parse("[dependencies\n", Path::new("pixi.toml"))
            .unwrap_err();
        assert!(matches!(err, FormatError::Toml(_)));
    }
}
