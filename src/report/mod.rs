//! Report rendering: the four dashboard views as Markdown or JSON.

pub mod generator;
pub mod map;
pub mod views;

pub use generator::{generate_json_report, generate_markdown_report};
