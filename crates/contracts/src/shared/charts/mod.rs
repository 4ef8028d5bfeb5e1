//! Renderer-agnostic chart specifications.
//!
//! The backend only decides *what* to draw (data series, titles, reference
//! lines); a client maps a [`ChartSpec`] onto its plotting library.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const PRIMARY_COLOR: &str = "#13957b";
pub const SECONDARY_COLORS: [&str; 5] = ["#13957b", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd"];

/// Single data point of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Number(f64),
    Date(NaiveDate),
    Text(String),
    Null,
}

impl CellValue {
    /// `Number` for finite values, `Null` otherwise (NaN is not valid JSON)
    pub fn number(value: f64) -> Self {
        if value.is_finite() {
            CellValue::Number(value)
        } else {
            CellValue::Null
        }
    }

    pub fn maybe(value: Option<f64>) -> Self {
        value.map(CellValue::number).unwrap_or(CellValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        CellValue::Integer(value as i64)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        CellValue::maybe(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Area,
    Bar,
    Pie,
    Scatter,
    Box,
    Heatmap,
    Choropleth,
    Treemap,
    Sunburst,
    Funnel,
    Waterfall,
    Radar,
    Table,
    /// Several trace kinds sharing axes (bars + line, dual y axis)
    Combo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSide {
    #[default]
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    Group,
    Stack,
}

// ---------------------------------------------------------------------------
// Traces
// ---------------------------------------------------------------------------

/// One data series. Only the fields relevant for `kind` are filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub x: Vec<CellValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub y: Vec<CellValue>,
    /// Heatmap matrix, rows follow `y`, columns follow `x`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub z: Vec<Vec<CellValue>>,
    /// Pie/treemap/sunburst/funnel labels, choropleth locations, radar axes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<CellValue>,
    /// Values mapped onto a continuous colour scale
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub color_values: Vec<CellValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_data: Vec<Vec<CellValue>>,
    /// Marker sizes (bubble charts)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub size: Vec<CellValue>,
    /// Symmetric error bars
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_y: Vec<CellValue>,
    /// Pie slice offsets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pull: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scale: Option<String>,
    /// Value mapped to the middle of `color_scale`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_mid: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_template: Option<String>,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub axis: AxisSide,
    /// 1-based subplot row for stacked layouts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Donut hole as a fraction of the pie radius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hole: Option<f64>,
    /// Draw point markers on line traces
    #[serde(default)]
    pub markers: bool,
}

impl Trace {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            name: None,
            x: vec![],
            y: vec![],
            z: vec![],
            labels: vec![],
            parents: vec![],
            values: vec![],
            color_values: vec![],
            text: vec![],
            custom_data: vec![],
            size: vec![],
            error_y: vec![],
            pull: vec![],
            color: None,
            colors: vec![],
            color_scale: None,
            color_mid: None,
            hover_template: None,
            orientation: Orientation::Vertical,
            axis: AxisSide::Primary,
            row: None,
            dash: None,
            opacity: None,
            hole: None,
            markers: false,
        }
    }

    /// x/y series of the given kind
    pub fn xy<X, Y>(kind: ChartKind, name: &str, x: Vec<X>, y: Vec<Y>) -> Self
    where
        X: Into<CellValue>,
        Y: Into<CellValue>,
    {
        let mut trace = Self::new(kind);
        trace.name = Some(name.to_string());
        trace.x = x.into_iter().map(Into::into).collect();
        trace.y = y.into_iter().map(Into::into).collect();
        trace
    }

    /// labels/values series (pie, funnel, treemap...)
    pub fn labeled<V: Into<CellValue>>(kind: ChartKind, labels: Vec<String>, values: Vec<V>) -> Self {
        let mut trace = Self::new(kind);
        trace.labels = labels;
        trace.values = values.into_iter().map(Into::into).collect();
        trace
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_colors(mut self, colors: Vec<String>) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_color_scale(mut self, scale: &str) -> Self {
        self.color_scale = Some(scale.to_string());
        self
    }

    pub fn with_color_mid(mut self, mid: f64) -> Self {
        self.color_mid = Some(mid);
        self
    }

    pub fn with_text(mut self, text: Vec<String>) -> Self {
        self.text = text;
        self
    }

    pub fn with_hover(mut self, template: &str) -> Self {
        self.hover_template = Some(template.to_string());
        self
    }

    pub fn horizontal(mut self) -> Self {
        self.orientation = Orientation::Horizontal;
        self
    }

    pub fn on_secondary_axis(mut self) -> Self {
        self.axis = AxisSide::Secondary;
        self
    }

    pub fn in_row(mut self, row: u8) -> Self {
        self.row = Some(row);
        self
    }

    pub fn dashed(mut self, dash: &str) -> Self {
        self.dash = Some(dash.to_string());
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_hole(mut self, hole: f64) -> Self {
        self.hole = Some(hole);
        self
    }

    pub fn with_markers(mut self) -> Self {
        self.markers = true;
        self
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineAxis {
    X,
    Y,
    Y2,
}

/// Horizontal/vertical guide line (averages, 80% Pareto mark, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub axis: LineAxis,
    pub value: f64,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartLayout {
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y2_axis_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_mode: Option<BarMode>,
    /// Shared hover label across all traces at one x
    #[serde(default)]
    pub unified_hover: bool,
    #[serde(default)]
    pub show_legend: bool,
    /// Date range slider and 1m/3m/6m/All buttons under the x axis
    #[serde(default)]
    pub range_selector: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_lines: Vec<ReferenceLine>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subplot_titles: Vec<String>,
    /// Geographic scope for choropleths ("usa")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radial_range: Option<(f64, f64)>,
}

/// Tabular payload for `ChartKind::Table`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub header: Vec<String>,
    /// Row-major cells
    pub rows: Vec<Vec<CellValue>>,
    /// Cells rendered in the warning colour (row, column)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlighted: Vec<(usize, usize)>,
}

/// Complete description of one chart view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Stable identifier, e.g. "revenue_trend"
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub traces: Vec<Trace>,
    pub layout: ChartLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableData>,
}

impl ChartSpec {
    pub fn new(id: &str, title: &str, kind: ChartKind, height: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            traces: vec![],
            layout: ChartLayout {
                height,
                ..Default::default()
            },
            table: None,
        }
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn with_axes(mut self, x_title: &str, y_title: &str) -> Self {
        self.layout.x_axis_title = Some(x_title.to_string());
        self.layout.y_axis_title = Some(y_title.to_string());
        self
    }

    pub fn with_reference_line(mut self, axis: LineAxis, value: f64, label: Option<String>) -> Self {
        self.layout.reference_lines.push(ReferenceLine { axis, value, label });
        self
    }

    pub fn legend(mut self) -> Self {
        self.layout.show_legend = true;
        self
    }

    pub fn unified_hover(mut self) -> Self {
        self.layout.unified_hover = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_numbers_become_null() {
        assert_eq!(CellValue::number(f64::NAN), CellValue::Null);
        assert_eq!(CellValue::from(f64::INFINITY), CellValue::Null);
        assert_eq!(CellValue::from(1.5), CellValue::Number(1.5));
    }

    #[test]
    fn test_trace_skips_empty_fields() {
        let trace = Trace::xy(ChartKind::Bar, "Revenue", vec!["West"], vec![10.0]);
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["x"], serde_json::json!(["West"]));
        assert!(json.get("z").is_none());
        assert!(json.get("labels").is_none());
    }
}
