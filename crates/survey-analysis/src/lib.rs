//! # survey-analysis
//!
//! Read-only aggregation over uploaded surveys (demographic distributions,
//! instrument response distributions, department scores) and their
//! presentation as tables, chart specs, and dashboard panels.

pub mod analyzer;
pub mod queries;
pub mod render;

pub use analyzer::Analyzer;
pub use queries::context::ContextKind;
pub use render::{Cell, ChartSpec, Metric, Panel, Table, TableFormat};
