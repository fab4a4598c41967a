// Database schema types and query helpers

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

// ----- Settings (app KV) -----

pub fn get_setting(conn: &Connection, key: &str) -> anyhow::Result<Option<String>> {
    let result = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(result)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

// ----- Template -----

/// One custom field declared by a collection template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    /// Loose type hint ("text", "number", "date"); informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A user-defined collection schema ("Sneakers", "Comics")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub created_at: String,
}

pub fn insert_template(
    conn: &Connection,
    owner_id: &str,
    name: &str,
    fields: &[FieldDef],
) -> Result<i64> {
    let fields_json = serde_json::to_string(fields)?;
    conn.execute(
        "INSERT INTO templates (owner_id, name, fields) VALUES (?1, ?2, ?3)",
        params![owner_id, name, fields_json],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_template(conn: &Connection, owner_id: &str, id: i64) -> Result<Option<Template>> {
    let result = conn
        .query_row(
            "SELECT id, owner_id, name, fields, created_at
             FROM templates WHERE id = ?1 AND owner_id = ?2",
            params![id, owner_id],
            template_from_row,
        )
        .optional()?;
    Ok(result)
}

pub fn get_template_by_name(
    conn: &Connection,
    owner_id: &str,
    name: &str,
) -> Result<Option<Template>> {
    let result = conn
        .query_row(
            "SELECT id, owner_id, name, fields, created_at
             FROM templates WHERE owner_id = ?1 AND name = ?2",
            params![owner_id, name],
            template_from_row,
        )
        .optional()?;
    Ok(result)
}

pub fn list_templates(conn: &Connection, owner_id: &str) -> Result<Vec<Template>> {
    let mut stmt = conn.prepare(
        "SELECT id, owner_id, name, fields, created_at
         FROM templates WHERE owner_id = ?1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![owner_id], template_from_row)?;
    let mut templates = Vec::new();
    for row in rows {
        templates.push(row?);
    }
    Ok(templates)
}

pub fn delete_template(conn: &Connection, owner_id: &str, id: i64) -> Result<usize> {
    let deleted = conn.execute(
        "DELETE FROM templates WHERE id = ?1 AND owner_id = ?2",
        params![id, owner_id],
    )?;
    Ok(deleted)
}

pub fn count_items_for_template(conn: &Connection, template_id: i64) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM items WHERE template_id = ?1",
        params![template_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn template_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Template> {
    let fields_json: String = row.get(3)?;
    Ok(Template {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        fields: parse_json_col(3, &fields_json)?,
        created_at: row.get(4)?,
    })
}

// ----- Item -----

/// Financial facts recorded when an item entered the collection
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Acquisition {
    pub price: f64,
    pub estimated_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub template_id: i64,
    pub name: String,
    pub dynamic_data: Map<String, Value>,
    pub acquisition: Acquisition,
    pub images: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub template_id: i64,
    pub name: String,
    pub dynamic_data: Map<String, Value>,
    pub acquisition: Acquisition,
    pub images: Vec<String>,
}

pub fn insert_item(conn: &Connection, item: &NewItem) -> Result<i64> {
    let data_json = serde_json::to_string(&item.dynamic_data)?;
    let images_json = serde_json::to_string(&item.images)?;
    conn.execute(
        "INSERT INTO items (template_id, name, dynamic_data, price, estimated_value,
                            acquired_at, origin, currency, images)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            item.template_id,
            item.name,
            data_json,
            item.acquisition.price,
            item.acquisition.estimated_value,
            item.acquisition.date,
            item.acquisition.origin,
            item.acquisition.currency,
            images_json,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

const ITEM_COLS: &str = "i.id, i.template_id, i.name, i.dynamic_data, i.price,
                         i.estimated_value, i.acquired_at, i.origin, i.currency,
                         i.images, i.created_at";

/// Fetch a single item, visible only through a template the owner owns.
/// The join is the ownership filter; an item id belonging to another owner
/// resolves to None, exactly as if it did not exist.
pub fn get_item(conn: &Connection, owner_id: &str, id: i64) -> Result<Option<Item>> {
    let sql = format!(
        "SELECT {ITEM_COLS} FROM items i
         JOIN templates t ON i.template_id = t.id
         WHERE i.id = ?1 AND t.owner_id = ?2"
    );
    let result = conn
        .query_row(&sql, params![id, owner_id], item_from_row)
        .optional()?;
    Ok(result)
}

pub fn list_items_for_template(
    conn: &Connection,
    owner_id: &str,
    template_id: i64,
) -> Result<Vec<Item>> {
    let sql = format!(
        "SELECT {ITEM_COLS} FROM items i
         JOIN templates t ON i.template_id = t.id
         WHERE i.template_id = ?1 AND t.owner_id = ?2
         ORDER BY i.created_at DESC, i.id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![template_id, owner_id], item_from_row)?;
    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

/// Full replace of an item's mutable payload (dynamic data, acquisition,
/// images). Scoped to the owner through the template join; returns the
/// number of rows touched (0 when the item is not visible to this owner).
pub fn update_item(conn: &Connection, owner_id: &str, id: i64, item: &NewItem) -> Result<usize> {
    let data_json = serde_json::to_string(&item.dynamic_data)?;
    let images_json = serde_json::to_string(&item.images)?;
    let updated = conn.execute(
        "UPDATE items SET name = ?1, dynamic_data = ?2, price = ?3, estimated_value = ?4,
                          acquired_at = ?5, origin = ?6, currency = ?7, images = ?8
         WHERE id = ?9 AND template_id IN (SELECT id FROM templates WHERE owner_id = ?10)",
        params![
            item.name,
            data_json,
            item.acquisition.price,
            item.acquisition.estimated_value,
            item.acquisition.date,
            item.acquisition.origin,
            item.acquisition.currency,
            images_json,
            id,
            owner_id,
        ],
    )?;
    Ok(updated)
}

pub fn delete_item(conn: &Connection, owner_id: &str, id: i64) -> Result<usize> {
    let deleted = conn.execute(
        "DELETE FROM items
         WHERE id = ?1 AND template_id IN (SELECT id FROM templates WHERE owner_id = ?2)",
        params![id, owner_id],
    )?;
    Ok(deleted)
}

fn item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Item> {
    let data_json: String = row.get(3)?;
    let images_json: String = row.get(9)?;
    Ok(Item {
        id: row.get(0)?,
        template_id: row.get(1)?,
        name: row.get(2)?,
        dynamic_data: parse_json_col(3, &data_json)?,
        acquisition: Acquisition {
            price: row.get(4)?,
            estimated_value: row.get(5)?,
            date: row.get(6)?,
            origin: row.get(7)?,
            currency: row.get(8)?,
        },
        images: parse_json_col(9, &images_json)?,
        created_at: row.get(10)?,
    })
}

fn parse_json_col<T: serde::de::DeserializeOwned>(idx: usize, raw: &str) -> rusqlite::Result<T> {
    serde_json::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
