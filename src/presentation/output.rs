//! Output Rendering
//!
//! Final reports for each command, as console text or a single JSON line.

use crate::application::{DeployReport, PruneReport};
use crate::domain::entities::{DesiredInventory, Inventory};
use crate::domain::value_objects::Namespace;
use crate::ui::theme::Icons;
use crate::ui::{ColoredText, TerminalCapabilities};

/// Trait for rendering command results
pub trait ReportRenderer {
    fn render_deploy(&self, report: &DeployReport, namespace: &Namespace) -> String;
    fn render_prune(&self, report: &PruneReport, namespace: &Namespace) -> String;
    fn render_inventory(&self, inventory: &DesiredInventory) -> String;
    fn render_error(&self, message: &str) -> String;
}

/// Text renderer for command results
pub struct TextRenderer {
    caps: TerminalCapabilities,
    icons: Icons,
}

impl TextRenderer {
    pub fn new(caps: TerminalCapabilities) -> Self {
        Self {
            caps,
            icons: Icons::new(caps.supports_unicode),
        }
    }

    fn paint(&self, text: ColoredText) -> String {
        text.render(self.caps.supports_color)
    }

    fn inventory_lines(&self, inventory: &Inventory, out: &mut Vec<String>) {
        for (kind, names) in inventory.iter() {
            out.push(format!("  {} ({}):", kind, names.len()));
            for name in names {
                out.push(format!("    {} {}", self.icons.arrow, name));
            }
        }
    }
}

impl ReportRenderer for TextRenderer {
    fn render_deploy(&self, report: &DeployReport, namespace: &Namespace) -> String {
        let mut out = vec![
            self.paint(
                ColoredText::success(format!("{} Deploy Complete", self.icons.success)).bold(),
            ),
            String::new(),
            format!("  Namespace: {}", namespace),
            format!("  Groups applied: {}", report.groups_applied.len()),
        ];
        for group in &report.groups_applied {
            out.push(format!("    {} {}", self.icons.arrow, group.display()));
        }
        if !report.ordered_files.is_empty() {
            out.push(format!("  Applied in dependency order ({}):", report.ordered_files.len()));
            for file in &report.ordered_files {
                out.push(format!("    {} {}", self.icons.arrow, file.display()));
            }
        }
        if !report.groups_skipped.is_empty() {
            out.push(self.paint(ColoredText::dim(format!(
                "  Skipped (not present): {}",
                report
                    .groups_skipped
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))));
        }
        out.push(format!("  Jobs drained: {}", report.jobs_deleted));
        out.push(self.render_prune(&report.prune, namespace));
        out.join("\n")
    }

    fn render_prune(&self, report: &PruneReport, namespace: &Namespace) -> String {
        if report.orphans.is_empty() {
            return format!("  No orphans in namespace '{}'", namespace);
        }
        let verb = if report.deleted { "Pruned" } else { "Would prune" };
        let mut out = vec![self.paint(ColoredText::warning(format!(
            "  {} {} orphans:",
            verb,
            report.orphans.len()
        )))];
        self.inventory_lines(&report.orphans, &mut out);
        out.join("\n")
    }

    fn render_inventory(&self, inventory: &DesiredInventory) -> String {
        if inventory.is_empty() {
            return "No tracked resources declared".to_string();
        }
        let mut out = vec![format!("Declared resources ({}):", inventory.len())];
        self.inventory_lines(inventory, &mut out);
        out.join("\n")
    }

    fn render_error(&self, message: &str) -> String {
        self.paint(ColoredText::error(format!("{} error: {}", self.icons.error, message)))
    }
}

/// JSON renderer for command results
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render_deploy(&self, report: &DeployReport, namespace: &Namespace) -> String {
        serde_json::json!({
            "event": "report",
            "command": "deploy",
            "namespace": namespace.as_str(),
            "report": report,
        })
        .to_string()
    }

    fn render_prune(&self, report: &PruneReport, namespace: &Namespace) -> String {
        serde_json::json!({
            "event": "report",
            "command": "prune",
            "namespace": namespace.as_str(),
            "report": report,
        })
        .to_string()
    }

    fn render_inventory(&self, inventory: &DesiredInventory) -> String {
        serde_json::json!({
            "event": "report",
            "command": "inventory",
            "inventory": inventory,
        })
        .to_string()
    }

    fn render_error(&self, message: &str) -> String {
        serde_json::json!({
            "event": "error",
            "message": message,
        })
        .to_string()
    }
}

/// Create a renderer based on format
pub fn create_renderer(json: bool, caps: TerminalCapabilities) -> Box<dyn ReportRenderer> {
    if json {
        Box::new(JsonRenderer)
    } else {
        Box::new(TextRenderer::new(caps))
    }
}
