// Item commands
// Item CRUD bound to a resolved template. Writes stay lenient about
// dynamic data: declared-but-missing fields get defaults, undeclared keys
// are logged and kept. Hard validation of required fields belongs to the
// form layer upstream.

use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::db::schema::{self, Acquisition, Item, NewItem};
use crate::error::{CurioError, Result};
use crate::fields::{apply_defaults, FieldValidator};

/// Incoming item payload (create and full-replace update share it)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub name: String,
    #[serde(default)]
    pub dynamic_data: Map<String, Value>,
    #[serde(default)]
    pub acquisition: Acquisition,
    #[serde(default)]
    pub images: Vec<String>,
}

fn check_payload(payload: &ItemPayload) -> Result<()> {
    if payload.name.trim().is_empty() {
        return Err(CurioError::Validation("Item name is required".to_string()));
    }
    if payload.acquisition.price < 0.0 || payload.acquisition.estimated_value < 0.0 {
        return Err(CurioError::Validation(
            "Monetary amounts must be non-negative".to_string(),
        ));
    }
    Ok(())
}

fn resolve_dynamic_data(template: &schema::Template, payload: &ItemPayload) -> Map<String, Value> {
    let mut data = payload.dynamic_data.clone();
    apply_defaults(template, &mut data);

    let report = FieldValidator::for_template(template).check(&data);
    if !report.undeclared.is_empty() {
        log::warn!(
            "Item '{}' carries keys not declared by template '{}': {:?}",
            payload.name,
            template.name,
            report.undeclared
        );
    }
    if !report.missing_required.is_empty() {
        log::warn!(
            "Item '{}' is missing required fields of template '{}': {:?}",
            payload.name,
            template.name,
            report.missing_required
        );
    }
    data
}

/// Create an item in the named collection.
pub fn create_item(
    conn: &Connection,
    owner_id: &str,
    template_name: &str,
    payload: ItemPayload,
) -> Result<Item> {
    check_payload(&payload)?;
    let template = schema::get_template_by_name(conn, owner_id, template_name)?
        .ok_or_else(|| CurioError::TemplateNotFound(template_name.to_string()))?;

    let dynamic_data = resolve_dynamic_data(&template, &payload);
    let id = schema::insert_item(
        conn,
        &NewItem {
            template_id: template.id,
            name: payload.name,
            dynamic_data,
            acquisition: payload.acquisition,
            images: payload.images,
        },
    )?;

    schema::get_item(conn, owner_id, id)?.ok_or(CurioError::ItemNotFound(id))
}

pub fn list_items(conn: &Connection, owner_id: &str, template_name: &str) -> Result<Vec<Item>> {
    let template = schema::get_template_by_name(conn, owner_id, template_name)?
        .ok_or_else(|| CurioError::TemplateNotFound(template_name.to_string()))?;
    schema::list_items_for_template(conn, owner_id, template.id)
}

pub fn get_item(conn: &Connection, owner_id: &str, id: i64) -> Result<Item> {
    schema::get_item(conn, owner_id, id)?.ok_or(CurioError::ItemNotFound(id))
}

/// Full replace of an item's payload (dynamic data, acquisition, images).
pub fn update_item(
    conn: &Connection,
    owner_id: &str,
    id: i64,
    payload: ItemPayload,
) -> Result<Item> {
    check_payload(&payload)?;
    let existing = schema::get_item(conn, owner_id, id)?.ok_or(CurioError::ItemNotFound(id))?;
    let template = schema::get_template(conn, owner_id, existing.template_id)?
        .ok_or_else(|| CurioError::TemplateNotFound(existing.template_id.to_string()))?;

    let dynamic_data = resolve_dynamic_data(&template, &payload);
    let updated = schema::update_item(
        conn,
        owner_id,
        id,
        &NewItem {
            template_id: existing.template_id,
            name: payload.name,
            dynamic_data,
            acquisition: payload.acquisition,
            images: payload.images,
        },
    )?;
    if updated == 0 {
        return Err(CurioError::ItemNotFound(id));
    }

    schema::get_item(conn, owner_id, id)?.ok_or(CurioError::ItemNotFound(id))
}

pub fn delete_item(conn: &Connection, owner_id: &str, id: i64) -> Result<()> {
    let deleted = schema::delete_item(conn, owner_id, id)?;
    if deleted == 0 {
        return Err(CurioError::ItemNotFound(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::templates::create_template;
    use crate::db::migrations;
    use crate::db::schema::FieldDef;

    fn setup_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        migrations::run_migrations(&conn).unwrap();
        conn
    }

    fn payload(name: &str, price: f64, value: f64) -> ItemPayload {
        ItemPayload {
            name: name.to_string(),
            dynamic_data: Map::new(),
            acquisition: Acquisition { price, estimated_value: value, ..Default::default() },
            images: vec![],
        }
    }

    #[test]
    fn test_create_item_applies_template_defaults() {
        let conn = setup_test_db();
        create_template(
            &conn,
            "u1",
            "Sneakers",
            vec![FieldDef { name: "Brand".into(), required: true, kind: None }],
        )
        .unwrap();

        let item = create_item(&conn, "u1", "Sneakers", payload("Jordan 1", 150.0, 400.0)).unwrap();
        // Declared-but-missing field was defaulted, not rejected
        assert_eq!(item.dynamic_data.get("Brand"), Some(&Value::String(String::new())));
    }

    #[test]
    fn test_create_item_keeps_undeclared_keys() {
        let conn = setup_test_db();
        create_template(&conn, "u1", "Sneakers", vec![]).unwrap();

        let mut p = payload("Dunk Low", 120.0, 160.0);
        p.dynamic_data.insert("Colorway".into(), Value::String("Panda".into()));
        let item = create_item(&conn, "u1", "Sneakers", p).unwrap();
        assert_eq!(
            item.dynamic_data.get("Colorway"),
            Some(&Value::String("Panda".into()))
        );
    }

    #[test]
    fn test_create_item_unknown_template_is_not_found() {
        let conn = setup_test_db();
        let err = create_item(&conn, "u1", "Ghosts", payload("x", 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, CurioError::TemplateNotFound(_)));
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_negative_amounts_rejected_before_store() {
        let conn = setup_test_db();
        create_template(&conn, "u1", "Sneakers", vec![]).unwrap();
        let err = create_item(&conn, "u1", "Sneakers", payload("Bad", -1.0, 0.0)).unwrap_err();
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_update_is_owner_scoped() {
        let conn = setup_test_db();
        create_template(&conn, "u1", "Sneakers", vec![]).unwrap();
        let item = create_item(&conn, "u1", "Sneakers", payload("Jordan 1", 150.0, 400.0)).unwrap();

        let err = update_item(&conn, "intruder", item.id, payload("Stolen", 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, CurioError::ItemNotFound(_)));

        let updated = update_item(&conn, "u1", item.id, payload("Jordan 1 OG", 150.0, 450.0)).unwrap();
        assert_eq!(updated.name, "Jordan 1 OG");
        assert_eq!(updated.acquisition.estimated_value, 450.0);
    }

    #[test]
    fn test_delete_missing_item_is_not_found() {
        let conn = setup_test_db();
        let err = delete_item(&conn, "u1", 42).unwrap_err();
        assert!(matches!(err, CurioError::ItemNotFound(42)));
    }
}
