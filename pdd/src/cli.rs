use clap::Parser;
use declared_deps_core::ParserChoice;
use std::path::PathBuf;

/// List the dependencies a Python project declares
#[derive(Parser, Debug, Clone)]
#[command(name = "python-declared-deps")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Dependency files or project directories (defaults to current directory)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Parse dependency files with this parser instead of inferring it from
    /// the file name (requirements.txt, setup.py, setup.cfg, pyproject.toml,
    /// pixi.toml, environment.yml)
    #[arg(long, value_name = "PARSER")]
    pub deps_parser_choice: Option<ParserChoice>,

    /// Print dependencies as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Get the paths to scan, defaulting to current directory
    pub fn project_paths(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.paths.clone()
        }
    }

    /// Default log filter when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
