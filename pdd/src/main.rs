use anyhow::{Context, Result};
use clap::Parser;
use declared_deps_core::TableRenderer;
use pdd::cli::Args;
use pdd::detector::ProjectDetector;
use pdd::extract::{ExtractEvent, parse_sources};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays machine readable
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    let detector = ProjectDetector::new(args.deps_parser_choice);
    let sources = detector
        .detect(&args.project_paths())
        .context("Failed to collect dependency files")?;

    let mut dependencies = Vec::new();
    let mut failed_sources = 0usize;

    for event in parse_sources(sources) {
        match event {
            ExtractEvent::Dependency(dep) => dependencies.push(dep),
            ExtractEvent::Mismatch(mismatch) => tracing::warn!("{mismatch}"),
            ExtractEvent::Failed(err) => {
                failed_sources += 1;
                tracing::error!("{err}");
            }
        }
    }

    if args.json {
        println!("{}", TableRenderer::render_json(&dependencies)?);
    } else {
        TableRenderer::new(!args.no_color).render(&dependencies);
    }

    if failed_sources > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
