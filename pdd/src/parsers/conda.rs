use super::requirements::parse_requirements;
use super::{DeclaredDependency, DependencyParser};
use crate::error::FormatError;
use serde_yaml::Value;
use std::path::Path;

/// Parser for conda environment.yml files
pub struct CondaParser;

impl CondaParser {
    /// Package name of a conda match spec
    /// Examples:
    /// - "numpy" -> numpy
    /// - "numpy=1.24.0" -> numpy
    /// - "conda-forge::pandas>=1.5" -> pandas
    /// - "python 3.9.*" -> python
    fn conda_package_name(spec: &str) -> Option<&str> {
        let spec = spec.trim();

        // Drop the channel, if any
        let spec = spec.rsplit_once("::").map_or(spec, |(_, rest)| rest);

        let end = spec
            .find(|c: char| c.is_whitespace() || "=<>!~[".contains(c))
            .unwrap_or(spec.len());
        let name = spec[..end].trim();

        (!name.is_empty()).then_some(name)
    }
}

impl DependencyParser for CondaParser {
    fn parse(&self, text: &str, path: &Path) -> Result<Vec<DeclaredDependency>, FormatError> {
        let yaml: Value = serde_yaml::from_str(text)?;

        let mut dependencies = Vec::new();

        let Some(deps) = yaml.get("dependencies").and_then(|v| v.as_sequence()) else {
            return Ok(dependencies);
        };

        for dep in deps {
            // Dependencies can be either strings or objects (for pip section)
            if let Some(dep_str) = dep.as_str() {
                if let Some(name) = Self::conda_package_name(dep_str)
                    && name != "python"
                {
                    dependencies.push(DeclaredDependency::new(name, path));
                }
            } else if let Some(pip_deps) = dep.get("pip").and_then(|v| v.as_sequence()) {
                // pip entries follow pip's requirement format, not conda's
                for pip_dep in pip_deps.iter().filter_map(Value::as_str) {
                    dependencies.extend(parse_requirements(pip_dep, path)?);
                }
            }
        }

        Ok(dependencies)
    }

    fn can_parse(&self, file_name: &str) -> bool {
        file_name == "environment.yml"
    }
}
