//! Markdown renderers for the four dashboard views.
//!
//! Each view is a plain function of the [`Dashboard`]; [`render_view`]
//! picks one through a lookup table.

use crate::cli::View;
use crate::indicators::{avoidance_shares, format_change};
use crate::models::{Dashboard, DetectiveOutcome, CURRENT_YEAR, PRIOR_YEAR};
use crate::report::map::{column_elevation, OPERATIONS_RADIUS_M, TAX_COLUMN_RADIUS_M};

type Renderer = fn(&Dashboard) -> String;

const RENDERERS: [(View, Renderer); 4] = [
    (View::Overview, render_overview),
    (View::FinancialInsights, render_financial_insights),
    (View::GlobalPresence, render_global_presence),
    (View::AiDetective, render_ai_detective),
];

/// Render the body of one view.
pub fn render_view(view: View, dashboard: &Dashboard) -> String {
    RENDERERS
        .iter()
        .find(|(v, _)| *v == view)
        .map(|(_, render)| render(dashboard))
        .unwrap_or_default()
}

fn render_overview(dashboard: &Dashboard) -> String {
    let company = &dashboard.metadata.company;
    let aggregates = &dashboard.aggregates;
    let mut section = String::new();

    section.push_str(&format!("## 🏢 {} - Global Overview\n\n", company));
    section.push_str(&format!(
        "{} is a multinational company with operations across {} major economies. \
         ORBIT models its income, tax strategy and global footprint from a synthetic \
         dataset generated for this report (seed `{}`).\n\n",
        company,
        dashboard.records.len(),
        dashboard.metadata.seed
    ));

    section.push_str("| Metric | Value | Change |\n");
    section.push_str("|:---|---:|:---:|\n");
    section.push_str(&format!(
        "| Estimated Global Income ({}) | ${} B | {} |\n",
        CURRENT_YEAR,
        aggregates.total_income,
        format_change(aggregates.year_over_year.income_change_pct)
    ));
    section.push_str(&format!(
        "| Tax Paid ({}) | ${} B | {} |\n",
        CURRENT_YEAR,
        aggregates.total_tax_paid,
        format_change(aggregates.year_over_year.tax_paid_change_pct)
    ));
    if let Some(headline) = dashboard.headline_estimate {
        section.push_str(&format!(
            "| Potential Tax Avoidance Estimate | {} | |\n",
            headline
        ));
    }
    section.push('\n');

    section.push_str("---\n\n");
    section.push_str(
        "> Use `--view financial-insights`, `--view global-presence` or \
         `--view ai-detective` to explore deeper insights and AI-driven reports.\n\n",
    );

    section
}

fn render_financial_insights(dashboard: &Dashboard) -> String {
    let records = &dashboard.records;
    let aggregates = &dashboard.aggregates;
    let mut section = String::new();

    section.push_str(&format!(
        "## 📊 {} - Financial Analysis\n\n",
        dashboard.metadata.company
    ));

    section.push_str(&format!(
        "### Income Comparison ({} vs {})\n\n",
        PRIOR_YEAR, CURRENT_YEAR
    ));
    section.push_str(&format!(
        "| Country | Income {} | Income {} | Change |\n",
        PRIOR_YEAR, CURRENT_YEAR
    ));
    section.push_str("|:---|---:|---:|---:|\n");
    for r in records {
        section.push_str(&format!(
            "| {} | {} | {} | {:+} |\n",
            r.country,
            r.income_prior_year,
            r.income_current_year,
            r.income_change()
        ));
    }
    section.push('\n');

    section.push_str("### Tax Avoidance by Country\n\n");
    section.push_str("| Country | Avoidance ($ B) | Share |\n");
    section.push_str("|:---|---:|---:|\n");
    for (country, value, share) in avoidance_shares(records) {
        section.push_str(&format!("| {} | {} | {:.1}% |\n", country, value, share));
    }
    section.push_str(&format!(
        "| **Total** | **{}** | |\n\n",
        aggregates.total_avoidance()
    ));

    section.push_str("#### 💼 Financial Summary\n\n");
    section.push_str(&format!(
        "| Country | Income {p} | Income {c} | Tax Paid {p} | Tax Paid {c} | Tax Change |\n",
        p = PRIOR_YEAR,
        c = CURRENT_YEAR
    ));
    section.push_str("|:---|---:|---:|---:|---:|---:|\n");
    for r in records {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {:+} |\n",
            r.country,
            r.income_prior_year,
            r.income_current_year,
            r.tax_paid_prior_year,
            r.tax_paid_current_year,
            r.tax_paid_change()
        ));
    }
    section.push_str(&format!(
        "| **Total** | **{}** | **{}** | **{}** | **{}** | **{:+}** |\n\n",
        aggregates.total_income_prior,
        aggregates.total_income,
        aggregates.total_tax_paid_prior,
        aggregates.total_tax_paid,
        aggregates.total_tax_paid as i64 - aggregates.total_tax_paid_prior as i64
    ));

    section
}

fn render_global_presence(dashboard: &Dashboard) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## 🌎 {} - Global Map Network\n\n",
        dashboard.metadata.company
    ));

    section.push_str("### 🗺️ Headquarters & Operations Map\n\n");
    section.push_str(&format!(
        "*Scatterplot layer, marker radius {} km.*\n\n",
        OPERATIONS_RADIUS_M / 1000
    ));
    section.push_str("| Country | Latitude | Longitude |\n");
    section.push_str("|:---|---:|---:|\n");
    for r in &dashboard.records {
        section.push_str(&format!(
            "| {} | {:.4} | {:.4} |\n",
            r.country, r.latitude, r.longitude
        ));
    }
    section.push('\n');

    section.push_str("### 💰 Tax Haven Locations (3D Globe)\n\n");
    section.push_str(&format!(
        "*Column layer, column radius {} km, height proportional to tax paid in {}.*\n\n",
        TAX_COLUMN_RADIUS_M / 1000,
        CURRENT_YEAR
    ));
    section.push_str("| Country | Tax Paid ($ B) | Column Height (m) |\n");
    section.push_str("|:---|---:|---:|\n");
    for r in &dashboard.records {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            r.country,
            r.tax_paid_current_year,
            column_elevation(r.tax_paid_current_year)
        ));
    }
    section.push('\n');

    section
}

fn render_ai_detective(dashboard: &Dashboard) -> String {
    let mut section = String::new();

    section.push_str("## 🕵️ ORBIT AI - Financial Intelligence Assistant\n\n");
    section.push_str("This AI detective specializes in:\n\n");
    section.push_str("- Corporate Financial Law\n");
    section.push_str("- International Tax Frameworks\n");
    section.push_str("- Shell Company Tracing\n");
    section.push_str("- Income & Loss Pattern Recognition\n\n");

    if let Some(ref query) = dashboard.query {
        if !query.trim().is_empty() {
            section.push_str(&format!("**Query:** {}\n\n", query));
        }
    }

    match dashboard.detective {
        Some(DetectiveOutcome::Insight(ref text)) => {
            section.push_str("🧠 **AI Detective Insight:**\n\n");
            section.push_str(&blockquote(text));
            section.push_str("\n\n");
        }
        Some(DetectiveOutcome::Unavailable(ref message)) => {
            section.push_str(&format!("⚠️ {}\n\n", message));
        }
        Some(DetectiveOutcome::Skipped) | None => {
            section.push_str("*No query given; the AI detective was not consulted.*\n\n");
        }
    }

    if dashboard.include_disclaimer {
        section.push_str("---\n\n");
        section.push_str(
            "> ⚖️ Note: AI outputs are for research and analytical insight — not legal conclusions.\n\n",
        );
    }

    section
}

/// Quote every line of `text`.
fn blockquote(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::aggregate;
    use crate::models::{Country, HeadlineEstimate, JurisdictionRecord, ReportMetadata};
    use chrono::Utc;

    fn create_test_dashboard() -> Dashboard {
        let records = vec![
            JurisdictionRecord {
                country: Country::Usa,
                latitude: 37.0902,
                longitude: -95.7129,
                income_prior_year: 80,
                income_current_year: 100,
                tax_paid_prior_year: 15,
                tax_paid_current_year: 20,
            },
            JurisdictionRecord {
                country: Country::Ireland,
                latitude: 53.4129,
                longitude: -8.2439,
                income_prior_year: 120,
                income_current_year: 150,
                tax_paid_prior_year: 25,
                tax_paid_current_year: 30,
            },
        ];
        let aggregates = aggregate(&records);

        Dashboard {
            metadata: ReportMetadata {
                company: "Apple".to_string(),
                view: View::Overview.title().to_string(),
                seed: 42,
                generated_at: Utc::now(),
                model_used: None,
            },
            records,
            aggregates,
            headline_estimate: Some(HeadlineEstimate::new(12)),
            query: None,
            detective: None,
            include_disclaimer: true,
        }
    }

    #[test]
    fn test_every_view_has_a_renderer() {
        let dashboard = create_test_dashboard();
        for view in [
            View::Overview,
            View::FinancialInsights,
            View::GlobalPresence,
            View::AiDetective,
        ] {
            assert!(!render_view(view, &dashboard).is_empty(), "{:?}", view);
        }
    }

    #[test]
    fn test_overview_metrics() {
        let dashboard = create_test_dashboard();
        let body = render_view(View::Overview, &dashboard);

        assert!(body.contains("Apple - Global Overview"));
        assert!(body.contains("| Estimated Global Income (2025) | $250 B | +25.0% YoY |"));
        assert!(body.contains("| Tax Paid (2025) | $50 B | +25.0% YoY |"));
        assert!(body.contains("$12 B (illustrative"));
        assert!(!body.contains("**Ireland**"));
    }

    #[test]
    fn test_overview_without_headline() {
        let mut dashboard = create_test_dashboard();
        dashboard.headline_estimate = None;

        let body = render_view(View::Overview, &dashboard);
        assert!(!body.contains("Potential Tax Avoidance Estimate"));
    }

    #[test]
    fn test_financial_insights_tables() {
        let dashboard = create_test_dashboard();
        let body = render_view(View::FinancialInsights, &dashboard);

        assert!(body.contains("### Income Comparison (2024 vs 2025)"));
        assert!(body.contains("| USA | 80 | 100 | +20 |"));
        assert!(body.contains("| USA | 80 | 40.0% |"));
        assert!(body.contains("| Ireland | 120 | 60.0% |"));
        assert!(body.contains("| **Total** | **200** | |\n"));
        assert!(body.contains("| USA | 80 | 100 | 15 | 20 | +5 |"));
        assert!(body.contains("| **Total** | **200** | **250** | **40** | **50** | **+10** |"));
    }

    #[test]
    fn test_global_presence_layers() {
        let dashboard = create_test_dashboard();
        let body = render_view(View::GlobalPresence, &dashboard);

        assert!(body.contains("Headquarters & Operations Map"));
        assert!(body.contains("| USA | 37.0902 | -95.7129 |"));
        assert!(body.contains("| Ireland | 30 | 600000 |"));
    }

    #[test]
    fn test_ai_detective_insight_is_quoted() {
        let mut dashboard = create_test_dashboard();
        dashboard.query = Some("Analyze Apple's tax strategy in Ireland".to_string());
        dashboard.detective = Some(DetectiveOutcome::Insight("Line one\n\nLine two".to_string()));

        let body = render_view(View::AiDetective, &dashboard);

        assert!(body.contains("**Query:** Analyze Apple's tax strategy in Ireland"));
        assert!(body.contains("> Line one\n>\n> Line two"));
        assert!(body.contains("not legal conclusions"));
    }

    #[test]
    fn test_ai_detective_unavailable_and_skipped() {
        let mut dashboard = create_test_dashboard();
        dashboard.detective = Some(DetectiveOutcome::Unavailable(
            "The AI detective is unavailable: timeout".to_string(),
        ));
        let body = render_view(View::AiDetective, &dashboard);
        assert!(body.contains("⚠️ The AI detective is unavailable: timeout"));

        dashboard.detective = Some(DetectiveOutcome::Skipped);
        dashboard.include_disclaimer = false;
        let body = render_view(View::AiDetective, &dashboard);
        assert!(body.contains("was not consulted"));
        assert!(!body.contains("legal conclusions"));
    }
}
