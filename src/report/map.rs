//! Map layers for the global presence view.
//!
//! Layers are plain data keyed by `[lon, lat]`; drawing them is up to
//! whatever consumes the report.

use crate::models::{Country, JurisdictionRecord};
use serde::{Deserialize, Serialize};

/// Basemap style the layers are designed for.
pub const MAP_STYLE_URL: &str = "https://basemaps.cartocdn.com/gl/positron-gl-style/style.json";

/// Radius of an operations marker, in metres.
pub const OPERATIONS_RADIUS_M: u32 = 700_000;

/// Radius of a tax column, in metres.
pub const TAX_COLUMN_RADIUS_M: u32 = 400_000;

/// Metres of column height per billion of tax paid.
pub const ELEVATION_PER_BILLION: u64 = 20_000;

/// Initial camera position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    pub pitch: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            latitude: 20.0,
            longitude: 0.0,
            zoom: 1.3,
            pitch: 40.0,
        }
    }
}

/// One marker on the operations layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub country: Country,
    /// `[longitude, latitude]`
    pub position: [f64; 2],
}

/// One column on the tax layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub country: Country,
    /// `[longitude, latitude]`
    pub position: [f64; 2],
    pub tax_paid: u32,
    /// Height in metres.
    pub elevation: u64,
}

/// A map layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MapLayer {
    /// Headquarters and operations markers.
    Scatterplot {
        radius: u32,
        /// RGBA fill.
        color: [u8; 4],
        points: Vec<ScatterPoint>,
    },
    /// Tax paid per country, extruded.
    Column {
        radius: u32,
        /// RGBA fill.
        color: [u8; 4],
        columns: Vec<Column>,
    },
}

/// Everything needed to draw the global presence maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub map_style: String,
    pub view_state: ViewState,
    pub layers: Vec<MapLayer>,
}

/// Build the operations and tax layers from a record set.
pub fn build_map(records: &[JurisdictionRecord]) -> MapView {
    let points = records
        .iter()
        .map(|r| ScatterPoint {
            country: r.country,
            position: [r.longitude, r.latitude],
        })
        .collect();

    let columns = records
        .iter()
        .map(|r| Column {
            country: r.country,
            position: [r.longitude, r.latitude],
            tax_paid: r.tax_paid_current_year,
            elevation: column_elevation(r.tax_paid_current_year),
        })
        .collect();

    MapView {
        map_style: MAP_STYLE_URL.to_string(),
        view_state: ViewState::default(),
        layers: vec![
            MapLayer::Scatterplot {
                radius: OPERATIONS_RADIUS_M,
                color: [0, 100, 255, 200],
                points,
            },
            MapLayer::Column {
                radius: TAX_COLUMN_RADIUS_M,
                color: [255, 0, 0, 180],
                columns,
            },
        ],
    }
}

/// Column height for a tax figure.
pub fn column_elevation(tax_paid: u32) -> u64 {
    u64::from(tax_paid) * ELEVATION_PER_BILLION
}
