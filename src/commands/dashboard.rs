// Dashboard commands
// The two read surfaces from the dashboard spec, plus the composed view
// (stats + derived chart geometry) and the recent-activity feed.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::analytics::details::{metric_details, Metric, MetricDetailRow};
use crate::analytics::{dashboard_stats, DashboardStats};
use crate::charts::{pie_slices, synthesize_trend, PieSlice, TrendChart};
use crate::constants::RECENT_ACTIVITY_LIMIT;
use crate::error::Result;

/// Dashboard statistics for one owner. Recomputed from the store on every
/// call; zeroed (never failing) when the owner has no items.
pub fn get_dashboard(conn: &Connection, owner_id: &str) -> Result<DashboardStats> {
    dashboard_stats(conn, owner_id)
}

/// Stats plus everything a renderer needs: the estimated value trend,
/// the pie geometry, and the ROI figures.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub stats: DashboardStats,
    /// Synthetic curve labeled as an estimate; there is no real history
    pub trend: TrendChart,
    pub pie: Vec<PieSlice>,
    pub roi_value: f64,
    pub roi_percentage: f64,
}

pub fn get_dashboard_view(conn: &Connection, owner_id: &str) -> Result<DashboardView> {
    let stats = dashboard_stats(conn, owner_id)?;
    let trend = synthesize_trend(stats.total_value);
    let pie = pie_slices(&stats.category_distribution);
    let roi_value = stats.total_value - stats.total_cost;
    let roi_percentage = stats.roi() * 100.0;
    Ok(DashboardView { stats, trend, pie, roi_value, roi_percentage })
}

/// Drill-down detail rows for a metric given as a path segment.
/// An unknown metric fails with `InvalidMetric` before any query runs.
pub fn get_metric_details(
    conn: &Connection,
    owner_id: &str,
    metric: &str,
) -> Result<Vec<MetricDetailRow>> {
    let metric: Metric = metric.parse()?;
    metric_details(conn, owner_id, metric)
}

/// One entry in the recent-activity feed
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub action: String,
    pub item: String,
    pub time: String,
}

/// Newest additions with a humanized timestamp, derived from the items
/// drill-down (which already sorts by creation time descending).
pub fn recent_activity(conn: &Connection, owner_id: &str) -> Result<Vec<ActivityEntry>> {
    let rows = metric_details(conn, owner_id, Metric::Items)?;
    let now = Utc::now();
    Ok(rows
        .into_iter()
        .take(RECENT_ACTIVITY_LIMIT)
        .map(|row| ActivityEntry {
            action: "added".to_string(),
            item: row.name,
            time: row.date.as_deref().map(|d| time_ago(d, now)).unwrap_or_default(),
        })
        .collect())
}

/// Humanize a stored timestamp relative to `now`. Store timestamps are
/// SQLite's `datetime('now')` format and are UTC.
fn time_ago(stored: &str, now: DateTime<Utc>) -> String {
    let parsed = NaiveDateTime::parse_from_str(stored, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc());
    let Ok(then) = parsed else {
        return stored.to_string();
    };

    let seconds = (now - then).num_seconds().max(0);
    if seconds >= 86_400 {
        format!("{} day(s) ago", seconds / 86_400)
    } else if seconds >= 3_600 {
        format!("{} hour(s) ago", seconds / 3_600)
    } else if seconds >= 60 {
        format!("{} min ago", seconds / 60)
    } else {
        "just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::items::{create_item, ItemPayload};
    use crate::commands::templates::create_template;
    use crate::db::migrations;
    use crate::db::schema::Acquisition;
    use crate::error::CurioError;
    use chrono::TimeZone;
    use serde_json::Map;

    fn setup_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        migrations::run_migrations(&conn).unwrap();
        conn
    }

    fn seed(conn: &Connection) {
        create_template(conn, "u1", "Sneakers", vec![]).unwrap();
        create_item(
            conn,
            "u1",
            "Sneakers",
            ItemPayload {
                name: "Jordan 1".into(),
                dynamic_data: Map::new(),
                acquisition: Acquisition { price: 100.0, estimated_value: 250.0, ..Default::default() },
                images: vec![],
            },
        )
        .unwrap();
    }

    #[test]
    fn test_dashboard_view_composes_all_derivations() {
        let conn = setup_test_db();
        seed(&conn);

        let view = get_dashboard_view(&conn, "u1").unwrap();
        assert_eq!(view.stats.item_count, 1);
        assert_eq!(view.trend.points.len(), 12);
        assert_eq!(view.trend.points.last().unwrap().value, 250.0);
        assert_eq!(view.pie.len(), 1);
        assert_eq!(view.roi_value, 150.0);
        assert!((view.roi_percentage - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_owner_view_has_no_data_pie() {
        let conn = setup_test_db();
        let view = get_dashboard_view(&conn, "nobody").unwrap();
        assert_eq!(view.pie.len(), 1);
        assert_eq!(view.pie[0].label, crate::constants::NO_DATA_LABEL);
        assert_eq!(view.roi_value, 0.0);
    }

    #[test]
    fn test_metric_details_rejects_unknown_segment() {
        let conn = setup_test_db();
        let err = get_metric_details(&conn, "u1", "networth").unwrap_err();
        assert!(matches!(err, CurioError::InvalidMetric(_)));
    }

    #[test]
    fn test_recent_activity_lists_newest_first() {
        let conn = setup_test_db();
        seed(&conn);
        let feed = recent_activity(&conn, "u1").unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].action, "added");
        assert_eq!(feed[0].item, "Jordan 1");
        assert_eq!(feed[0].time, "just now");
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(time_ago("2024-06-15 11:59:40", now), "just now");
        assert_eq!(time_ago("2024-06-15 11:45:00", now), "15 min ago");
        assert_eq!(time_ago("2024-06-15 06:00:00", now), "6 hour(s) ago");
        assert_eq!(time_ago("2024-06-10 12:00:00", now), "5 day(s) ago");
        // Unparseable input falls back to the raw string
        assert_eq!(time_ago("not-a-date", now), "not-a-date");
    }
}
