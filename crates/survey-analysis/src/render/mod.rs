//! Presentation of query results: tables, chart specs, and panels.

pub mod builders;
pub mod chart;
pub mod panel;
pub mod table;

pub use chart::{BarMode, ChartKind, ChartSpec, Series, SeriesStyle};
pub use panel::{Metric, Panel};
pub use table::{format_count, Cell, Table, TableFormat};

use chrono::{DateTime, Local};

/// Render unix seconds as local `YYYY-MM-DD HH:MM`.
pub fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}
