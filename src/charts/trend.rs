// Synthetic trend curve
// The app keeps no valuation history, so the dashboard shows an explicitly
// estimated "growth so far" curve derived from the single current total:
// a ramp from 50% to 100% of the current value across twelve months, with
// a little jitter, anchored so the final point is the exact current total.

use rand::Rng;
use serde::Serialize;

use crate::constants::{
    TREND_HEADROOM, TREND_JITTER, TREND_MONTHS, TREND_VIEWPORT_HEIGHT, TREND_VIEWPORT_WIDTH,
};

/// One labeled point on the estimated trend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub month: &'static str,
    pub value: f64,
}

/// The trend plus its SVG rendering over a 300x100 viewport
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendChart {
    pub points: Vec<TrendPoint>,
    /// Space-separated "x,y" pairs for an SVG polyline
    pub polyline: String,
    /// Closed path for the shaded area under the curve
    pub area_path: String,
}

/// Derive the estimated trend from the current total value.
pub fn synthesize_trend(current_value: f64) -> TrendChart {
    synthesize_with(current_value, &mut rand::thread_rng())
}

pub fn synthesize_with<R: Rng>(current_value: f64, rng: &mut R) -> TrendChart {
    let last = TREND_MONTHS.len() - 1;
    let points: Vec<TrendPoint> = TREND_MONTHS
        .iter()
        .enumerate()
        .map(|(i, month)| {
            let value = if i == last {
                // The final month is the true current total, not an estimate
                current_value
            } else {
                let factor = 0.5 + (i as f64 / last as f64) * 0.5;
                let jitter = rng.gen_range(-TREND_JITTER..TREND_JITTER);
                (current_value * (factor + jitter)).max(0.0)
            };
            TrendPoint { month, value }
        })
        .collect();

    let (polyline, area_path) = render_paths(&points);
    TrendChart { points, polyline, area_path }
}

fn render_paths(points: &[TrendPoint]) -> (String, String) {
    let width = TREND_VIEWPORT_WIDTH;
    let height = TREND_VIEWPORT_HEIGHT;

    let max_value = points.iter().map(|p| p.value).fold(0.0, f64::max) * TREND_HEADROOM;
    // Zero-max guard: an all-zero curve draws flat along the baseline
    let scale = if max_value > 0.0 { max_value } else { 1.0 };

    let polyline = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = (i as f64 / (points.len() - 1) as f64) * width;
            let y = height - (p.value / scale) * height;
            format!("{},{}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ");

    let area_path = format!("M0,{} {} L{},{} Z", height, polyline, width, height);
    (polyline, area_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_last_point_is_exact_current_value() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let chart = synthesize_with(1234.56, &mut rng);
            assert_eq!(chart.points.len(), 12);
            assert_eq!(chart.points.last().unwrap().value, 1234.56);
            assert_eq!(chart.points.last().unwrap().month, "Dec");
        }
    }

    #[test]
    fn test_zero_current_value_stays_non_negative() {
        let mut rng = StdRng::seed_from_u64(7);
        let chart = synthesize_with(0.0, &mut rng);
        for point in &chart.points {
            assert!(point.value >= 0.0);
        }
        // Zero-max guard keeps the geometry finite
        assert!(!chart.polyline.contains("NaN"));
        assert!(!chart.polyline.contains("inf"));
    }

    #[test]
    fn test_curve_ramps_toward_current_value() {
        let mut rng = StdRng::seed_from_u64(42);
        let chart = synthesize_with(1000.0, &mut rng);
        // Jitter is at most 2.5%, so the first point stays near 50% and
        // every point stays within the ramp's envelope.
        let first = chart.points[0].value;
        assert!((450.0..=550.0).contains(&first), "first point {} outside envelope", first);
        for point in &chart.points {
            assert!(point.value <= 1000.0 * 1.025 + 1e-9);
        }
    }

    #[test]
    fn test_polyline_spans_viewport() {
        let mut rng = StdRng::seed_from_u64(1);
        let chart = synthesize_with(500.0, &mut rng);

        let pairs: Vec<&str> = chart.polyline.split(' ').collect();
        assert_eq!(pairs.len(), 12);
        assert!(pairs[0].starts_with("0,"));
        assert!(pairs[11].starts_with("300,"));
        assert!(chart.area_path.starts_with("M0,100 "));
        assert!(chart.area_path.ends_with(" L300,100 Z"));
    }
}
