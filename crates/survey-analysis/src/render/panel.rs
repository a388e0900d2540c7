//! Dashboard panels: headline metrics, a table, charts, and narrative text.

use serde::Serialize;
use survey_core::errors::AnalysisError;
use survey_core::types::AnalysisKey;

use super::chart::ChartSpec;
use super::table::{Cell, Table, TableFormat};

/// A headline number such as "Total respondents: 1,204".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: Cell,
    /// Secondary line under the value, e.g. "max 4.20 / min 2.10".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: Cell) -> Self {
        Self {
            label: label.into(),
            value,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub metrics: Vec<Metric>,
    pub tables: Vec<Table>,
    pub charts: Vec<ChartSpec>,
    /// The narrative slot this panel reads and writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_key: Option<AnalysisKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
}

impl Panel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            metrics: Vec::new(),
            tables: Vec::new(),
            charts: Vec::new(),
            narrative_key: None,
            narrative: None,
        }
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_chart(mut self, chart: ChartSpec) -> Self {
        self.charts.push(chart);
        self
    }

    pub fn with_narrative_key(mut self, key: AnalysisKey) -> Self {
        self.narrative_key = Some(key);
        self
    }

    /// Attach stored narrative text; blank text is treated as absent.
    pub fn with_narrative(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.narrative = (!text.trim().is_empty()).then_some(text);
        self
    }

    /// True when the underlying data had no rows.
    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(Table::is_empty)
    }

    pub fn to_json(&self) -> Result<String, AnalysisError> {
        serde_json::to_string_pretty(self).map_err(|e| AnalysisError::Render(e.to_string()))
    }

    /// Human-readable rendering. Charts are listed by title only.
    pub fn render(&self, format: TableFormat) -> String {
        let markdown = format == TableFormat::Markdown;
        let mut out = String::new();
        if markdown {
            out.push_str(&format!("## {}\n\n", self.title));
        } else {
            out.push_str(&format!("{}\n{}\n\n", self.title, "=".repeat(self.title.chars().count())));
        }

        if !self.metrics.is_empty() {
            for m in &self.metrics {
                let bullet = if markdown { "- " } else { "  " };
                out.push_str(&format!("{bullet}{}: {}", m.label, m.value));
                if let Some(detail) = &m.detail {
                    out.push_str(&format!(" ({detail})"));
                }
                out.push('\n');
            }
            out.push('\n');
        }

        for table in &self.tables {
            if table.is_empty() {
                out.push_str("(no data)\n\n");
                continue;
            }
            out.push_str(&table.render(format));
            out.push('\n');
        }

        if !self.charts.is_empty() && format != TableFormat::Csv {
            let titles: Vec<&str> = self.charts.iter().map(|c| c.title.as_str()).collect();
            out.push_str(&format!("Charts: {}\n\n", titles.join("; ")));
        }

        if let Some(text) = &self.narrative {
            if markdown {
                out.push_str("### Analysis\n\n");
            } else {
                out.push_str("Analysis\n--------\n");
            }
            out.push_str(text.trim_end());
            out.push('\n');
        }
        out
    }
}
