//! Indicator generation and aggregation.
//!
//! Produces the synthetic per-jurisdiction dataset and the figures the
//! views derive from it.

pub mod aggregator;
pub mod generator;

pub use aggregator::*;
pub use generator::*;
