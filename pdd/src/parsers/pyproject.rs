use super::pixi::pixi_dependencies;
use super::requirements::{canonical_name, parse_requirements};
use super::{DeclaredDependency, DependencyParser};
use crate::error::FormatError;
use std::path::Path;
use toml::Value;

/// Parser for pyproject.toml files (PEP 621, PEP 735, Poetry, PDM, pixi)
pub struct PyProjectParser;

impl PyProjectParser {
    /// Parse an array of requirement strings, e.g. `["requests>=2.28", "numpy"]`
    fn parse_requirement_array(
        value: &Value,
        path: &Path,
    ) -> Result<Vec<DeclaredDependency>, FormatError> {
        let mut dependencies = Vec::new();

        // Non-string entries such as PEP 735 `{include-group = "..."}` are skipped
        if let Some(deps) = value.as_array() {
            for dep_str in deps.iter().filter_map(Value::as_str) {
                dependencies.extend(parse_requirements(dep_str, path)?);
            }
        }

        Ok(dependencies)
    }

    /// Parse a table of requirement arrays, e.g. `[project.optional-dependencies]`
    fn parse_requirement_groups(
        value: Option<&Value>,
        path: &Path,
    ) -> Result<Vec<DeclaredDependency>, FormatError> {
        let mut dependencies = Vec::new();

        if let Some(groups) = value.and_then(|v| v.as_table()) {
            for (_group_name, deps_value) in groups {
                dependencies.extend(Self::parse_requirement_array(deps_value, path)?);
            }
        }

        Ok(dependencies)
    }

    /// Parse PEP 621 format dependencies
    fn parse_pep621_dependencies(
        toml_value: &Value,
        path: &Path,
    ) -> Result<Vec<DeclaredDependency>, FormatError> {
        let mut dependencies = Vec::new();

        let Some(project) = toml_value.get("project") else {
            return Ok(dependencies);
        };

        // [project.dependencies] - array of strings
        if let Some(deps) = project.get("dependencies") {
            dependencies.extend(Self::parse_requirement_array(deps, path)?);
        }

        // [project.optional-dependencies] - tables of arrays
        dependencies.extend(Self::parse_requirement_groups(
            project.get("optional-dependencies"),
            path,
        )?);

        Ok(dependencies)
    }

    /// Parse Poetry format dependencies; table keys are the package names
    fn parse_poetry_dependencies(toml_value: &Value, path: &Path) -> Vec<DeclaredDependency> {
        let mut dependencies = Vec::new();

        let Some(poetry) = toml_value.get("tool").and_then(|t| t.get("poetry")) else {
            return dependencies;
        };

        let mut collect = |table: Option<&Value>| {
            if let Some(deps) = table.and_then(|d| d.as_table()) {
                dependencies.extend(
                    deps.keys()
                        // Skip python itself
                        .filter(|name| name.as_str() != "python")
                        .map(|name| DeclaredDependency::new(canonical_name(name), path)),
                );
            }
        };

        // [tool.poetry.dependencies]
        collect(poetry.get("dependencies"));

        // [tool.poetry.dev-dependencies] (legacy)
        collect(poetry.get("dev-dependencies"));

        // [tool.poetry.group.*.dependencies]
        if let Some(groups) = poetry.get("group").and_then(|g| g.as_table()) {
            for (_group_name, group_value) in groups {
                collect(group_value.get("dependencies"));
            }
        }

        dependencies
    }

    /// Parse PDM format dev dependencies
    fn parse_pdm_dependencies(
        toml_value: &Value,
        path: &Path,
    ) -> Result<Vec<DeclaredDependency>, FormatError> {
        // [tool.pdm.dev-dependencies] - table of arrays
        Self::parse_requirement_groups(
            toml_value
                .get("tool")
                .and_then(|t| t.get("pdm"))
                .and_then(|p| p.get("dev-dependencies")),
            path,
        )
    }
}

impl DependencyParser for PyProjectParser {
    fn parse(&self, text: &str, path: &Path) -> Result<Vec<DeclaredDependency>, FormatError> {
        let toml_value: Value = toml::from_str(text)?;

        let mut dependencies = Self::parse_pep621_dependencies(&toml_value, path)?;

        // [dependency-groups] (PEP 735) - tables of arrays
        dependencies.extend(Self::parse_requirement_groups(
            toml_value.get("dependency-groups"),
            path,
        )?);

        dependencies.extend(Self::parse_poetry_dependencies(&toml_value, path));
        dependencies.extend(Self::parse_pdm_dependencies(&toml_value, path)?);

        // [tool.pixi.*] follows pixi.toml's layout
        if let Some(pixi) = toml_value.get("tool").and_then(|t| t.get("pixi")) {
            dependencies.extend(pixi_dependencies(pixi, path));
        }

        Ok(dependencies)
    }

    fn can_parse(&self, file_name: &str) -> bool {
        file_name == "pyproject.toml"
    }
}
