use crate::types::DeclaredDependency;
use colored::Colorize;

/// Renders declared dependencies as an aligned `name  source` table
pub struct TableRenderer {
    show_colors: bool,
}

impl TableRenderer {
    pub fn new(show_colors: bool) -> Self {
        Self { show_colors }
    }

    /// Print all dependencies, one per row
    pub fn render(&self, deps: &[DeclaredDependency]) {
        if deps.is_empty() {
            println!("No declared dependencies found.");
            return;
        }

        println!("Declared dependencies:\n");

        for row in self.rows(deps) {
            println!("{row}");
        }
    }

    /// Format the table rows without printing them
    pub fn rows(&self, deps: &[DeclaredDependency]) -> Vec<String> {
        let name_width = deps.iter().map(|d| d.name.len()).max().unwrap_or(0);

        deps.iter()
            .map(|dep| self.format_row(dep, name_width))
            .collect()
    }

    fn format_row(&self, dep: &DeclaredDependency, name_width: usize) -> String {
        // Pad before colorizing so escape codes don't skew alignment
        let name = format!("{:<name_width$}", dep.name);
        let source = dep.source.display().to_string();

        if self.show_colors {
            format!("  {}  {}", name.green(), source.dimmed())
        } else {
            format!("  {name}  {source}")
        }
    }

    /// Render dependencies as a pretty-printed JSON array
    pub fn render_json(deps: &[DeclaredDependency]) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(deps)
    }
}
