//! Line chart layout: evenly spaced X positions, value-proportional Y
//! positions inside a padded range, joined by a straight polyline.

use campaign_core::config::LineConfig;
use campaign_core::types::LabeledValue;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveTo { x, y } => write!(f, "M {x} {y}"),
            Self::LineTo { x, y } => write!(f, "L {x} {y}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub points: Vec<ChartPoint>,
    pub path: Vec<PathCommand>,
    pub adjusted_max: f64,
    pub adjusted_min: f64,
    /// Y-axis labels, top to bottom.
    pub y_ticks: Vec<f64>,
    /// X positions of the vertical grid lines between the first and last point.
    pub grid_x: Vec<f64>,
}

impl LineChart {
    /// SVG path data, e.g. `M 10 260 L 95 40`.
    pub fn svg_path(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Lays out `series` in order inside the frame described by `frame`.
pub fn layout_line(series: &[LabeledValue], frame: &LineConfig) -> LineChart {
    if series.is_empty() {
        return LineChart::default();
    }

    let (min, max) = series.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.value), hi.max(p.value))
    });
    let padding = (max - min) * frame.padding_ratio;
    let adjusted_max = max + padding;
    let adjusted_min = (min - padding).max(0.0);
    let divisor = (adjusted_max - adjusted_min).max(1.0);

    let plot_height = frame.plot_height();
    let steps = series.len().saturating_sub(1).max(1) as f64;
    let x_at = |i: usize| frame.left + (i as f64 / steps) * frame.width;

    let points: Vec<ChartPoint> = series
        .iter()
        .enumerate()
        .map(|(i, p)| ChartPoint {
            x: x_at(i),
            y: frame.top + plot_height - ((p.value - adjusted_min) / divisor) * plot_height,
            value: p.value,
            label: p.label.clone(),
        })
        .collect();

    let path = points
        .iter()
        .enumerate()
        .map(|(i, p)| match i {
            0 => PathCommand::MoveTo { x: p.x, y: p.y },
            _ => PathCommand::LineTo { x: p.x, y: p.y },
        })
        .collect();

    let grid_x = (1..series.len().saturating_sub(1)).map(x_at).collect();

    LineChart {
        points,
        path,
        adjusted_max,
        adjusted_min,
        y_ticks: vec![
            adjusted_max,
            adjusted_max * 0.75,
            adjusted_max * 0.5,
            adjusted_max * 0.25,
            adjusted_min,
        ],
        grid_x,
    }
}
