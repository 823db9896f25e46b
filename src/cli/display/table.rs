//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::config::{ConfigKey, DeployConfig};
use crate::domain::render::RenderReport;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render the per-manifest summary of a render run
    pub fn render_report(&self, report: &RenderReport) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "╭─ {} {} ─╮\n",
            report.output_dir.display(),
            format!("[{} manifests]", report.manifests.len()).bright_black()
        ));

        if report.manifests.is_empty() {
            output.push_str("No manifests found, apply.sh has nothing to apply\n");
        } else {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    Cell::new("MANIFEST").set_alignment(CellAlignment::Left),
                    Cell::new("REPLACED").set_alignment(CellAlignment::Center),
                    Cell::new("STATUS").set_alignment(CellAlignment::Left),
                ]);

            for manifest in &report.manifests {
                let unresolved = manifest.unresolved.len();
                let color = self
                    .theme
                    .get_manifest_color(manifest.replacements, unresolved);
                let mut status = format!(
                    "{} {}",
                    StatusIcon::get_manifest_icon(manifest.replacements, unresolved),
                    StatusIcon::get_manifest_text(manifest.replacements, unresolved)
                );
                if unresolved > 0 {
                    status.push_str(&format!(" ({})", manifest.unresolved.join(", ")));
                }

                table.add_row(vec![
                    Cell::new(manifest.path.display()),
                    Cell::new(manifest.replacements).set_alignment(CellAlignment::Center),
                    Cell::new(status).fg(color),
                ]);
            }

            output.push_str(&table.to_string());
            output.push('\n');
        }

        let unresolved = report.unresolved_count();
        let summary = format!(
            "{} replacements, {} unresolved",
            report.total_replacements(),
            unresolved
        );
        if unresolved > 0 {
            output.push_str(&format!("{} {}\n", StatusIcon::WARNING.yellow(), summary));
        } else {
            output.push_str(&format!("{} {}\n", StatusIcon::SUCCESS.green(), summary));
        }
        output.push_str(&format!("Apply with: {}", report.apply_script.display()));

        output
    }

    /// Render the placeholder table with resolved values
    pub fn render_placeholders(&self, config: &DeployConfig) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("TOKEN"),
                Cell::new("KEY"),
                Cell::new("VALUE"),
            ]);

        for key in ConfigKey::ALL {
            let is_set = config.is_set(key);
            let value = match key {
                ConfigKey::ImagePullSecret if !is_set => "(no imagePullSecrets block)".to_string(),
                _ if !is_set && key.is_required() => format!("{} unset", StatusIcon::ERROR),
                _ if !is_set => "(empty)".to_string(),
                _ => config.value_or_empty(key).to_string(),
            };

            table.add_row(vec![
                Cell::new(key.placeholder()),
                Cell::new(key.as_str()),
                Cell::new(value).fg(self.theme.get_value_color(is_set, key.is_required())),
            ]);
        }

        let mut output = table.to_string();
        if !config.extra().is_empty() {
            let names: Vec<&str> = config.extra().keys().map(String::as_str).collect();
            output.push_str(&format!(
                "\n{}",
                format!("Ignored keys: {}", names.join(", ")).bright_black()
            ));
        }
        output
    }
}
