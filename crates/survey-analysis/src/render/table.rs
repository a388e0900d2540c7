//! Tabular output: aligned plain text, Markdown, and CSV.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// One table cell. Numeric kinds carry their formatting rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Cell {
    Text(String),
    /// Rendered with thousands separators.
    Count(i64),
    /// Rendered with one decimal and a `%` suffix.
    Percent(f64),
    /// Rendered with two decimals.
    Score(f64),
    Empty,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn opt_score(value: Option<f64>) -> Self {
        value.map_or(Self::Empty, Self::Score)
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Self::Count(_) | Self::Percent(_) | Self::Score(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Count(n) => f.write_str(&format_count(*n)),
            Self::Percent(p) => write!(f, "{p:.1}%"),
            Self::Score(s) => write!(f, "{s:.2}"),
            Self::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Format an integer with `,` every three digits.
pub fn format_count(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Output format for [`Table::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    #[default]
    Text,
    Markdown,
    Csv,
}

impl FromStr for TableFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown table format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with empty cells.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        if row.len() < self.headers.len() {
            row.resize(self.headers.len(), Cell::Empty);
        }
        self.rows.push(row);
    }

    pub fn with_row(mut self, row: Vec<Cell>) -> Self {
        self.push_row(row);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self, format: TableFormat) -> String {
        match format {
            TableFormat::Text => self.to_text(),
            TableFormat::Markdown => self.to_markdown(),
            TableFormat::Csv => self.to_csv(),
        }
    }

    fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    fn rendered(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Cell::to_string).collect())
            .collect()
    }

    /// Space-aligned columns; numeric cells are right-aligned.
    pub fn to_text(&self) -> String {
        let cols = self.column_count();
        let body = self.rendered();
        let mut widths = vec![0usize; cols];
        for (i, h) in self.headers.iter().enumerate() {
            widths[i] = widths[i].max(h.chars().count());
        }
        for row in &body {
            for (i, s) in row.iter().enumerate() {
                widths[i] = widths[i].max(s.chars().count());
            }
        }

        let mut out = String::new();
        let header: Vec<String> = (0..cols)
            .map(|i| pad_right(self.headers.get(i).map_or("", String::as_str), widths[i]))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("  "));
        out.push('\n');

        for (cells, texts) in self.rows.iter().zip(&body) {
            let line: Vec<String> = (0..cols)
                .map(|i| {
                    let s = texts.get(i).map_or("", String::as_str);
                    if cells.get(i).is_some_and(Cell::is_numeric) {
                        pad_left(s, widths[i])
                    } else {
                        pad_right(s, widths[i])
                    }
                })
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }
        out
    }

    pub fn to_markdown(&self) -> String {
        let cols = self.column_count();
        let mut out = String::new();
        let header: Vec<String> = (0..cols)
            .map(|i| escape_markdown(self.headers.get(i).map_or("", String::as_str)))
            .collect();
        out.push_str(&format!("| {} |\n", header.join(" | ")));

        let align: Vec<&str> = (0..cols)
            .map(|i| {
                let numeric = self
                    .rows
                    .first()
                    .and_then(|r| r.get(i))
                    .is_some_and(Cell::is_numeric);
                if numeric {
                    "---:"
                } else {
                    "---"
                }
            })
            .collect();
        out.push_str(&format!("| {} |\n", align.join(" | ")));

        for row in self.rendered() {
            let cells: Vec<String> = (0..cols)
                .map(|i| escape_markdown(row.get(i).map_or("", String::as_str)))
                .collect();
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
        out
    }

    /// RFC 4180 style: fields containing a comma, quote, or newline are quoted.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        let header: Vec<String> = self.headers.iter().map(|h| escape_csv(h)).collect();
        out.push_str(&header.join(","));
        out.push('\n');
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|c| escape_csv(&csv_value(c))).collect();
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }
}

// CSV keeps numbers machine-readable: no separators, no `%`.
fn csv_value(cell: &Cell) -> String {
    match cell {
        Cell::Count(n) => n.to_string(),
        Cell::Percent(p) => format!("{p:.1}"),
        other => other.to_string(),
    }
}

fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

fn pad_right(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(len)))
}

fn pad_left(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{s}", " ".repeat(width.saturating_sub(len)))
}
