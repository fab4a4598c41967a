// Analytics aggregation engine
// Turns the per-owner item set into dashboard statistics. Everything here is
// derived on demand from the store; nothing is persisted or cached.

pub mod details;


use rusqlite::{params, Connection};
use serde::Serialize;

use crate::constants::{CATEGORY_PALETTE, TOP_ITEMS_LIMIT};
use crate::error::{CurioError, Result};

/// One category (template) in the spend breakdown
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySlice {
    pub label: String,
    pub value: f64,
    pub percentage: i64,
    pub color: String,
}

/// One entry in the top-items ranking
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopItem {
    pub name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub collection_name: String,
}

/// The full dashboard payload. Zeroed fields, never null, when the owner
/// has no items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_cost: f64,
    pub total_value: f64,
    pub item_count: i64,
    pub category_distribution: Vec<CategorySlice>,
    pub top_items: Vec<TopItem>,
}

impl DashboardStats {
    /// Return on investment as a fraction; 0 when nothing was spent.
    pub fn roi(&self) -> f64 {
        if self.total_cost > 0.0 {
            (self.total_value - self.total_cost) / self.total_cost
        } else {
            0.0
        }
    }
}

/// One row of the owner-scoped snapshot every aggregate is computed from
struct ScopedItem {
    name: String,
    price: f64,
    estimated_value: f64,
    first_image: Option<String>,
    template_name: String,
}

/// Fetch the owner's item set in a single statement. The Item->Template join
/// with the owner filter is the ownership boundary: every aggregate below
/// works off this one snapshot, so the four numbers can never disagree about
/// which items exist.
fn fetch_scoped_items(conn: &Connection, owner_id: &str) -> Result<Vec<ScopedItem>> {
    let mut stmt = conn
        .prepare(
            "SELECT i.name, i.price, i.estimated_value, i.images, t.name
             FROM items i
             JOIN templates t ON i.template_id = t.id
             WHERE t.owner_id = ?1",
        )
        .map_err(CurioError::Aggregation)?;

    let rows = stmt
        .query_map(params![owner_id], |row| {
            let images_json: String = row.get(3)?;
            Ok(ScopedItem {
                name: row.get(0)?,
                price: row.get(1)?,
                estimated_value: row.get(2)?,
                first_image: first_image(&images_json),
                template_name: row.get(4)?,
            })
        })
        .map_err(CurioError::Aggregation)?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row.map_err(CurioError::Aggregation)?);
    }
    Ok(items)
}

/// First entry of the stored image list, tolerating malformed JSON.
fn first_image(images_json: &str) -> Option<String> {
    serde_json::from_str::<Vec<String>>(images_json)
        .ok()
        .and_then(|mut images| {
            if images.is_empty() {
                None
            } else {
                Some(images.remove(0))
            }
        })
}

/// Compute the dashboard statistics for one owner.
pub fn dashboard_stats(conn: &Connection, owner_id: &str) -> Result<DashboardStats> {
    let items = fetch_scoped_items(conn, owner_id)?;

    let total_cost: f64 = items.iter().map(|i| i.price).sum();
    let total_value: f64 = items.iter().map(|i| i.estimated_value).sum();
    let item_count = items.len() as i64;

    Ok(DashboardStats {
        total_cost,
        total_value,
        item_count,
        category_distribution: category_distribution(&items, total_cost),
        top_items: top_items(&items),
    })
}

/// Group the snapshot by template name, summing price per group. Sorted
/// descending by summed cost; percentages use a denominator floor of 1 so a
/// zero-cost inventory yields 0% slices instead of a division fault.
fn category_distribution(items: &[ScopedItem], total_cost: f64) -> Vec<CategorySlice> {
    let mut groups: Vec<(String, f64)> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|(label, _)| *label == item.template_name) {
            Some((_, value)) => *value += item.price,
            None => groups.push((item.template_name.clone(), item.price)),
        }
    }

    groups.sort_by(|a, b| b.1.total_cmp(&a.1));

    let denominator = total_cost.max(1.0);
    groups
        .into_iter()
        .enumerate()
        .map(|(idx, (label, value))| CategorySlice {
            label,
            value,
            percentage: ((value / denominator) * 100.0).round() as i64,
            color: CATEGORY_PALETTE[idx % CATEGORY_PALETTE.len()].to_string(),
        })
        .collect()
}

/// The five most valuable items by estimated value, descending. Ties keep
/// their snapshot order (stable sort).
fn top_items(items: &[ScopedItem]) -> Vec<TopItem> {
    let mut ranked: Vec<&ScopedItem> = items.iter().collect();
    ranked.sort_by(|a, b| b.estimated_value.total_cmp(&a.estimated_value));

    ranked
        .into_iter()
        .take(TOP_ITEMS_LIMIT)
        .map(|item| TopItem {
            name: item.name.clone(),
            value: item.estimated_value,
            image: item.first_image.clone(),
            collection_name: item.template_name.clone(),
        })
        .collect()
}
