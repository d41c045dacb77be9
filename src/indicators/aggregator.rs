//! Aggregate figures over a record set.
//!
//! Everything here is a pure function of its input.

use crate::models::{Aggregates, Country, JurisdictionRecord, YearOverYear};

/// Compute totals, per-country avoidance and year-over-year change.
///
/// Empty input yields zero totals and an empty mapping.
pub fn aggregate(records: &[JurisdictionRecord]) -> Aggregates {
    let mut aggregates = Aggregates::default();

    for record in records {
        aggregates.total_income += u64::from(record.income_current_year);
        aggregates.total_tax_paid += u64::from(record.tax_paid_current_year);
        aggregates.total_income_prior += u64::from(record.income_prior_year);
        aggregates.total_tax_paid_prior += u64::from(record.tax_paid_prior_year);

        *aggregates
            .per_record_avoidance
            .entry(record.country)
            .or_insert(0) += record.tax_avoidance_estimate();
    }

    aggregates.year_over_year = YearOverYear {
        income_change_pct: percent_change(aggregates.total_income_prior, aggregates.total_income),
        tax_paid_change_pct: percent_change(
            aggregates.total_tax_paid_prior,
            aggregates.total_tax_paid,
        ),
    };

    aggregates
}

/// Percentage change from `prior` to `current`; `None` when `prior` is zero.
pub fn percent_change(prior: u64, current: u64) -> Option<f64> {
    if prior == 0 {
        return None;
    }
    Some((current as f64 - prior as f64) * 100.0 / prior as f64)
}

/// Each country's share of the total avoidance, in percent, in record order.
///
/// Shares are zero when the total is not positive.
pub fn avoidance_shares(records: &[JurisdictionRecord]) -> Vec<(Country, i64, f64)> {
    let total: i64 = records.iter().map(|r| r.tax_avoidance_estimate()).sum();

    records
        .iter()
        .map(|r| {
            let value = r.tax_avoidance_estimate();
            let share = if total > 0 {
                value as f64 * 100.0 / total as f64
            } else {
                0.0
            };
            (r.country, value, share)
        })
        .collect()
}

/// Format a percentage change the way the metrics line shows it.
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(pct) => format!("{:+.1}% YoY", pct),
        None => "n/a YoY".to_string(),
    }
}
