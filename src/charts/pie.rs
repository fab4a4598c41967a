// Pie-slice geometry
// Converts the category distribution into SVG arc paths on the unit circle,
// starting at 12 o'clock and running clockwise.

use std::f64::consts::PI;

use serde::Serialize;

use crate::analytics::CategorySlice;
use crate::constants::{NO_DATA_COLOR, NO_DATA_LABEL};

/// Path for a slice covering the whole circle. A single arc degenerates at
/// 360 degrees, so the full circle is two semicircular arcs.
pub const FULL_CIRCLE_PATH: &str = "M 1 0 A 1 1 0 1 1 -1 0 A 1 1 0 1 1 1 0 Z";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice {
    pub path: String,
    pub color: String,
    pub label: String,
    pub percentage: i64,
}

/// One slice per category, in distribution order, with cumulative angles.
/// An empty distribution yields a single neutral "no data" circle so the
/// chart never renders blank.
pub fn pie_slices(distribution: &[CategorySlice]) -> Vec<PieSlice> {
    if distribution.is_empty() {
        return vec![PieSlice {
            path: slice_path(0.0, 100.0),
            color: NO_DATA_COLOR.to_string(),
            label: NO_DATA_LABEL.to_string(),
            percentage: 100,
        }];
    }

    let mut current = 0.0;
    distribution
        .iter()
        .map(|cat| {
            let start = current;
            let end = current + cat.percentage as f64;
            current = end;

            PieSlice {
                path: slice_path(start, end),
                color: cat.color.clone(),
                label: cat.label.clone(),
                percentage: cat.percentage,
            }
        })
        .collect()
}

/// Arc path for the [start, end] percentage span on the unit circle.
pub fn slice_path(start_percent: f64, end_percent: f64) -> String {
    if end_percent - start_percent >= 100.0 {
        return FULL_CIRCLE_PATH.to_string();
    }

    // 12 o'clock start, clockwise
    let (start_x, start_y) = point_at(start_percent);
    let (end_x, end_y) = point_at(end_percent);

    let large_arc_flag = if end_percent - start_percent > 50.0 { 1 } else { 0 };

    format!(
        "M 0 0 L {} {} A 1 1 0 {} 1 {} {} Z",
        start_x, start_y, large_arc_flag, end_x, end_y
    )
}

fn point_at(percent: f64) -> (f64, f64) {
    let angle = 2.0 * PI * (percent / 100.0) - PI / 2.0;
    (angle.cos(), angle.sin())
}
