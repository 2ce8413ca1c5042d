#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a temporary project directory
pub struct TempProject {
    pub dir: TempDir,
}

impl TempProject {
    /// Create a new temporary project
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        Self { dir }
    }

    /// Get the path to the project directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a file in the project with the given content
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let file_path = self.dir.path().join(relative_path);

        // Create parent directories if needed
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Get the absolute path to a file in the project
    pub fn file_path(&self, relative_path: &str) -> PathBuf {
        self.dir.path().join(relative_path)
    }
}

impl Default for TempProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Contents of a valid dependency file named `file_name` declaring `deps`
pub fn declared_deps_contents(file_name: &str, deps: &[&str]) -> String {
    let quoted: Vec<String> = deps.iter().map(|d| format!("{d:?}")).collect();
    match file_name {
        "setup.py" => format!(
            "from setuptools import setup\n\nsetup(\n    name=\"MyLib\",\n    install_requires=[{}],\n)\n",
            quoted.join(", ")
        ),
        "setup.cfg" => format!(
            "[metadata]\nname = MyLib\n\n[options]\ninstall_requires =\n{}\n",
            deps.iter().map(|d| format!("    {d}")).collect::<Vec<_>>().join("\n")
        ),
        "pyproject.toml" => format!(
            "[project]\nname = \"MyLib\"\ndependencies = [{}]\n",
            quoted.join(", ")
        ),
        "pixi.toml" => format!(
            "[project]\nname = \"MyLib\"\nchannels = [\"conda-forge\"]\nplatforms = [\"linux-64\"]\n\n[dependencies]\n{}\n",
            deps.iter().map(|d| format!("{d} = \"*\"")).collect::<Vec<_>>().join("\n")
        ),
        "environment.yml" => format!(
            "name: MyLib\ndependencies:\n{}\n",
            deps.iter().map(|d| format!("  - {d}")).collect::<Vec<_>>().join("\n")
        ),
        // requirements.txt and its variants
        _ => deps.iter().map(|d| format!("{d}\n")).collect(),
    }
}

/// Create a TempProject with a single dependency file declaring `deps`
pub fn create_project_with_declared_deps(file_name: &str, deps: &[&str]) -> TempProject {
    let project = TempProject::new();
    project.create_file(file_name, &declared_deps_contents(file_name, deps));
    project
}

/// Sample setup.py whose dependencies are not statically declared
pub fn sample_setup_py_without_static_deps() -> &'static str {
    r#"from setuptools import setup

with open("requirements.txt") as f:
    requirements = f.read().splitlines()

setup(
    name="MyLib",
    install_requires=requirements,
)
"#
}

/// Sample setup.cfg declaring dependencyA and dependencyB
pub fn sample_setup_cfg() -> &'static str {
    r#"[metadata]
name = MyLib

[options]
install_requires =
    dependencyA
    dependencyB
"#
}

/// Sample pyproject.toml with PEP 621 dependencies
pub fn sample_pyproject_pep621() -> &'static str {
    r#"[project]
name = "MyLib"
version = "0.1.0"
dependencies = [
    "pandas>=1.5.0",
    "pydantic",
]

[project.optional-dependencies]
dev = ["pylint"]

[build-system]
requires = ["setuptools>=61.0"]
build-backend = "setuptools.build_meta"
"#
}

/// Create a project with setup.py, setup.cfg, pyproject.toml and requirements.txt
pub fn create_project_with_setup_cfg_pyproject_and_requirements() -> TempProject {
    let project = TempProject::new();
    project.create_file("requirements.txt", "pandas\nclick\n");
    project.create_file("setup.py", sample_setup_py_without_static_deps());
    project.create_file("setup.cfg", sample_setup_cfg());
    project.create_file("pyproject.toml", sample_pyproject_pep621());
    project
}
