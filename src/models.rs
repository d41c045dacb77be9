//! Data models for the ORBIT dashboard.
//!
//! This module contains the core data structures shared by the indicator
//! generator, the detective client and the report renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Display label for the prior reporting year.
pub const PRIOR_YEAR: u16 = 2024;

/// Display label for the current reporting year.
pub const CURRENT_YEAR: u16 = 2025;

/// A jurisdiction the company is modelled to operate in.
///
/// The set is closed: records are never added or removed at runtime,
/// only their numeric fields are resampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Country {
    #[serde(rename = "USA")]
    Usa,
    India,
    Ireland,
    Singapore,
    Netherlands,
    #[serde(rename = "UK")]
    Uk,
    Switzerland,
}

impl Country {
    /// All countries, in the order the dashboard lists them.
    pub const ALL: [Country; 7] = [
        Country::Usa,
        Country::India,
        Country::Ireland,
        Country::Singapore,
        Country::Netherlands,
        Country::Uk,
        Country::Switzerland,
    ];

    /// Returns the display name of the country.
    pub fn name(&self) -> &'static str {
        match self {
            Country::Usa => "USA",
            Country::India => "India",
            Country::Ireland => "Ireland",
            Country::Singapore => "Singapore",
            Country::Netherlands => "Netherlands",
            Country::Uk => "UK",
            Country::Switzerland => "Switzerland",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Country {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Country::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown country: {}", wanted))
    }
}

impl TryFrom<String> for Country {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Lookup from country to its geocoordinates.
pub type CoordinateTable = HashMap<Country, Coordinates>;

/// The built-in coordinate table, one pair per country.
pub fn default_coordinates() -> CoordinateTable {
    Country::ALL
        .into_iter()
        .map(|c| (c, builtin_coordinates(c)))
        .collect()
}

fn builtin_coordinates(country: Country) -> Coordinates {
    match country {
        Country::Usa => Coordinates::new(37.0902, -95.7129),
        Country::India => Coordinates::new(20.5937, 78.9629),
        Country::Ireland => Coordinates::new(53.4129, -8.2439),
        Country::Singapore => Coordinates::new(1.3521, 103.8198),
        Country::Netherlands => Coordinates::new(52.3676, 4.9041),
        Country::Uk => Coordinates::new(55.3781, -3.4360),
        Country::Switzerland => Coordinates::new(46.8182, 8.2275),
    }
}

/// Synthetic financial figures for one jurisdiction, in billions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionRecord {
    pub country: Country,
    pub latitude: f64,
    pub longitude: f64,
    pub income_prior_year: u32,
    pub income_current_year: u32,
    pub tax_paid_prior_year: u32,
    pub tax_paid_current_year: u32,
}

impl JurisdictionRecord {
    /// Current-year income minus current-year tax paid.
    pub fn tax_avoidance_estimate(&self) -> i64 {
        i64::from(self.income_current_year) - i64::from(self.tax_paid_current_year)
    }

    /// Year-over-year change in income.
    pub fn income_change(&self) -> i64 {
        i64::from(self.income_current_year) - i64::from(self.income_prior_year)
    }

    /// Year-over-year change in tax paid.
    pub fn tax_paid_change(&self) -> i64 {
        i64::from(self.tax_paid_current_year) - i64::from(self.tax_paid_prior_year)
    }
}

/// Percentage change of current-year totals over prior-year totals.
///
/// A figure is `None` when its prior-year total is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YearOverYear {
    pub income_change_pct: Option<f64>,
    pub tax_paid_change_pct: Option<f64>,
}

/// Aggregate figures derived from a record set. Never cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    /// Sum of current-year income.
    pub total_income: u64,
    /// Sum of current-year tax paid.
    pub total_tax_paid: u64,
    /// Sum of prior-year income.
    pub total_income_prior: u64,
    /// Sum of prior-year tax paid.
    pub total_tax_paid_prior: u64,
    /// Avoidance estimate per country.
    pub per_record_avoidance: BTreeMap<Country, i64>,
    pub year_over_year: YearOverYear,
}

impl Aggregates {
    /// Sum of all per-country avoidance estimates.
    pub fn total_avoidance(&self) -> i64 {
        self.per_record_avoidance.values().sum()
    }
}

/// The headline "potential tax avoidance" figure.
///
/// Pure noise, unrelated to the records: it is only ever shown
/// labelled as illustrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineEstimate {
    pub billions: u32,
    pub illustrative: bool,
}

impl HeadlineEstimate {
    pub fn new(billions: u32) -> Self {
        Self {
            billions,
            illustrative: true,
        }
    }
}

impl fmt::Display for HeadlineEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${} B (illustrative, not derived from the dataset)",
            self.billions
        )
    }
}

/// Result of consulting the AI detective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum DetectiveOutcome {
    /// Generated text, unmodified.
    Insight(String),
    /// The model could not be reached or answered with an error.
    Unavailable(String),
    /// No query was given, so no call was made.
    Skipped,
}

/// Metadata about a rendered dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Company name typed by the user.
    pub company: String,
    /// Name of the rendered view.
    pub view: String,
    /// Seed the records were generated from.
    pub seed: u64,
    /// Date and time of generation.
    pub generated_at: DateTime<Utc>,
    /// Name of the text model, when the detective was consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

/// Everything a view needs to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub metadata: ReportMetadata,
    pub records: Vec<JurisdictionRecord>,
    pub aggregates: Aggregates,
    /// Omitted when disabled in the report settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline_estimate: Option<HeadlineEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detective: Option<DetectiveOutcome>,
    /// Whether to print the research disclaimer on the detective page.
    #[serde(skip)]
    pub include_disclaimer: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(income: u32, tax: u32) -> JurisdictionRecord {
        JurisdictionRecord {
            country: Country::Usa,
            latitude: 37.0902,
            longitude: -95.7129,
            income_prior_year: 90,
            income_current_year: income,
            tax_paid_prior_year: 12,
            tax_paid_current_year: tax,
        }
    }

    #[test]
    fn test_country_from_str() {
        assert_eq!("usa".parse::<Country>(), Ok(Country::Usa));
        assert_eq!(" UK ".parse::<Country>(), Ok(Country::Uk));
        assert_eq!("netherlands".parse::<Country>(), Ok(Country::Netherlands));
        assert!("Atlantis".parse::<Country>().is_err());
    }

    #[test]
    fn test_country_serde_uses_display_name() {
        let json = serde_json::to_string(&Country::Usa).unwrap();
        assert_eq!(json, "\"USA\"");
        let parsed: Country = serde_json::from_str("\"UK\"").unwrap();
        assert_eq!(parsed, Country::Uk);
    }

    #[test]
    fn test_country_deserialize_ignores_case() {
        let parsed: Vec<Country> = serde_json::from_str(r#"["usa", "uk", "SWITZERLAND"]"#).unwrap();
        assert_eq!(parsed, vec![Country::Usa, Country::Uk, Country::Switzerland]);

        let err = serde_json::from_str::<Country>("\"Atlantis\"").unwrap_err();
        assert!(err.to_string().contains("Unknown country: Atlantis"));
    }

    #[test]
    fn test_every_country_has_coordinates() {
        let table = default_coordinates();
        assert_eq!(table.len(), Country::ALL.len());
        assert_eq!(table[&Country::India], Coordinates::new(20.5937, 78.9629));
    }

    #[test]
    fn test_record_derived_figures() {
        let r = record(100, 20);
        assert_eq!(r.tax_avoidance_estimate(), 80);
        assert_eq!(r.income_change(), 10);
        assert_eq!(r.tax_paid_change(), 8);
    }

    #[test]
    fn test_headline_display_is_labelled() {
        let headline = HeadlineEstimate::new(12);
        assert!(headline.illustrative);
        assert!(headline.to_string().contains("illustrative"));
    }
}
