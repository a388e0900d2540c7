//! Serializable chart descriptions for an external plotting front end.

use serde::Serialize;
use survey_core::errors::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Group,
    Stack,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartKind {
    /// `hole` is the inner radius fraction; 0 draws a plain pie.
    Pie { hole: f64 },
    Bar { mode: BarMode },
    Line,
    Box,
    Radar,
}

/// How a series is drawn when it differs from the chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStyle {
    Default,
    /// A line drawn over another chart kind.
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Per-point colors, used by pie slices.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub point_colors: Vec<String>,
    pub style: SeriesStyle,
    pub secondary_axis: bool,
}

impl Series {
    pub fn new(name: impl Into<String>, labels: Vec<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            labels,
            values,
            color: None,
            point_colors: Vec::new(),
            style: SeriesStyle::Default,
            secondary_axis: false,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_point_colors(mut self, colors: Vec<String>) -> Self {
        self.point_colors = colors;
        self
    }

    /// Draw as a line on the secondary y axis.
    pub fn as_overlay_line(mut self) -> Self {
        self.style = SeriesStyle::Line;
        self.secondary_axis = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y2_title: Option<String>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    fn new(title: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            title: title.into(),
            kind,
            x_title: None,
            y_title: None,
            y2_title: None,
            series: Vec::new(),
        }
    }

    pub fn pie(title: impl Into<String>, hole: f64) -> Self {
        Self::new(title, ChartKind::Pie { hole })
    }

    pub fn bar(title: impl Into<String>, mode: BarMode) -> Self {
        Self::new(title, ChartKind::Bar { mode })
    }

    pub fn line(title: impl Into<String>) -> Self {
        Self::new(title, ChartKind::Line)
    }

    pub fn box_plot(title: impl Into<String>) -> Self {
        Self::new(title, ChartKind::Box)
    }

    pub fn radar(title: impl Into<String>) -> Self {
        Self::new(title, ChartKind::Radar)
    }

    pub fn with_axes(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_title = Some(x.into());
        self.y_title = Some(y.into());
        self
    }

    pub fn with_secondary_axis(mut self, title: impl Into<String>) -> Self {
        self.y2_title = Some(title.into());
        self
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn has_overlay(&self) -> bool {
        self.series.iter().any(|s| s.secondary_axis)
    }

    pub fn to_json(&self) -> Result<String, AnalysisError> {
        serde_json::to_string_pretty(self).map_err(|e| AnalysisError::Render(e.to_string()))
    }
}
