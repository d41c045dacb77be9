//! Report generation.
//!
//! Wraps a rendered view in the page header and footer, or serializes
//! the whole dashboard as JSON.

use crate::cli::View;
use crate::models::Dashboard;
use crate::report::map::{build_map, MapView};
use crate::report::views::render_view;
use anyhow::Result;
use serde::Serialize;

/// JSON document for one view.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    dashboard: &'a Dashboard,
    /// Map layers, present for the global presence view only.
    #[serde(skip_serializing_if = "Option::is_none")]
    map: Option<MapView>,
}

/// Generate a complete Markdown page for `view`.
pub fn generate_markdown_report(view: View, dashboard: &Dashboard) -> String {
    let mut output = String::new();

    output.push_str(&generate_header());
    output.push_str(&generate_metadata_section(dashboard));
    output.push_str(&render_view(view, dashboard));
    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report for `view`.
pub fn generate_json_report(view: View, dashboard: &Dashboard) -> Result<String> {
    let report = JsonReport {
        dashboard,
        map: (view == View::GlobalPresence).then(|| build_map(&dashboard.records)),
    };
    serde_json::to_string_pretty(&report).map_err(Into::into)
}

fn generate_header() -> String {
    let mut header = String::new();

    header.push_str("# 🛰️ ORBIT - Financial Detective System\n\n");
    header.push_str("*Unmasking global corporate truths*\n\n");

    header
}

/// Generate the metadata line under the title.
fn generate_metadata_section(dashboard: &Dashboard) -> String {
    let metadata = &dashboard.metadata;
    let mut section = String::new();

    section.push_str(&format!(
        "**Company:** {} | **View:** {} | **Seed:** `{}` | **Generated:** {}",
        metadata.company,
        metadata.view,
        metadata.seed,
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(ref model) = metadata.model_used {
        section.push_str(&format!(" | **Model:** `{}`", model));
    }
    section.push_str("\n\n");

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(
        "*© 2025 ORBIT Intelligence - all figures are synthetic and generated per report*\n",
    );

    footer
}
