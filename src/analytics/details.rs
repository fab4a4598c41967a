// Drill-down reporter
// Detail listings behind a single dashboard metric, reusing the same
// owner-scoping join as the dashboard aggregates.

use std::fmt;
use std::str::FromStr;

use rusqlite::{params, Connection};
use serde::Serialize;

use crate::error::{CurioError, Result};

/// The dashboard metrics a drill-down can be requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Acquisition price, most expensive first
    Cost,
    /// Estimated value, most valuable first
    Value,
    /// Item count, most recently added first
    Items,
}

impl FromStr for Metric {
    type Err = CurioError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cost" => Ok(Metric::Cost),
            "value" => Ok(Metric::Value),
            "items" => Ok(Metric::Items),
            other => Err(CurioError::InvalidMetric(other.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Metric::Cost => "cost",
            Metric::Value => "value",
            Metric::Items => "items",
        };
        f.write_str(s)
    }
}

/// One row of a metric drill-down. `value` is absent for the items metric,
/// where only recency is meaningful.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDetailRow {
    pub name: String,
    pub collection_name: String,
    pub value: Option<f64>,
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// All of the owner's items projected and ordered for the given metric.
/// Unbounded, unlike the dashboard's top-items ranking.
pub fn metric_details(
    conn: &Connection,
    owner_id: &str,
    metric: Metric,
) -> Result<Vec<MetricDetailRow>> {
    // Per-metric projection: (value expression, date expression, sort key)
    let (value_expr, date_expr, sort_expr) = match metric {
        Metric::Cost => ("i.price", "i.acquired_at", "i.price"),
        Metric::Value => ("i.estimated_value", "i.acquired_at", "i.estimated_value"),
        Metric::Items => ("NULL", "i.created_at", "i.created_at"),
    };

    let sql = format!(
        "SELECT i.name, t.name, {value_expr}, {date_expr}, i.images
         FROM items i
         JOIN templates t ON i.template_id = t.id
         WHERE t.owner_id = ?1
         ORDER BY {sort_expr} DESC, i.id DESC"
    );

    let mut stmt = conn.prepare(&sql).map_err(CurioError::Aggregation)?;
    let rows = stmt
        .query_map(params![owner_id], |row| {
            let images_json: String = row.get(4)?;
            Ok(MetricDetailRow {
                name: row.get(0)?,
                collection_name: row.get(1)?,
                value: row.get(2)?,
                date: row.get(3)?,
                image: super::first_image(&images_json),
            })
        })
        .map_err(CurioError::Aggregation)?;

    let mut details = Vec::new();
    for row in rows {
        details.push(row.map_err(CurioError::Aggregation)?);
    }
    Ok(details)
}
