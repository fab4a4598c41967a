// Template commands
// Create/list/inspect/delete collection templates for one owner.

use rusqlite::Connection;
use serde::Serialize;

use crate::db::schema::{self, FieldDef};
use crate::error::{CurioError, Result};
use crate::fields::{field_controls, FieldControl};

/// Template info returned to callers
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    pub id: i64,
    pub name: String,
    pub fields: Vec<FieldDef>,
    /// Resolved editor controls for this template's field set
    pub controls: Vec<FieldControl>,
    pub item_count: i64,
    pub created_at: String,
}

fn to_response(conn: &Connection, template: schema::Template) -> Result<TemplateResponse> {
    let item_count = schema::count_items_for_template(conn, template.id)?;
    let controls = field_controls(&template);
    Ok(TemplateResponse {
        id: template.id,
        name: template.name,
        fields: template.fields,
        controls,
        item_count,
        created_at: template.created_at,
    })
}

/// Create a new collection template. Field names must be unique within the
/// template, and the template name unique per owner.
pub fn create_template(
    conn: &Connection,
    owner_id: &str,
    name: &str,
    fields: Vec<FieldDef>,
) -> Result<TemplateResponse> {
    if name.trim().is_empty() {
        return Err(CurioError::Validation("Template name is required".to_string()));
    }
    for (idx, field) in fields.iter().enumerate() {
        if field.name.trim().is_empty() {
            return Err(CurioError::Validation("Field names must not be empty".to_string()));
        }
        if fields[..idx].iter().any(|f| f.name == field.name) {
            return Err(CurioError::Validation(format!(
                "Duplicate field name in template: {}",
                field.name
            )));
        }
    }
    if schema::get_template_by_name(conn, owner_id, name)?.is_some() {
        return Err(CurioError::Validation(format!(
            "Template already exists: {}",
            name
        )));
    }

    let id = schema::insert_template(conn, owner_id, name, &fields)?;
    log::info!("Created template '{}' ({} fields)", name, fields.len());

    let template = schema::get_template(conn, owner_id, id)?
        .ok_or_else(|| CurioError::TemplateNotFound(name.to_string()))?;
    to_response(conn, template)
}

pub fn list_templates(conn: &Connection, owner_id: &str) -> Result<Vec<TemplateResponse>> {
    let templates = schema::list_templates(conn, owner_id)?;
    templates
        .into_iter()
        .map(|t| to_response(conn, t))
        .collect()
}

/// Look up a template by name, with its resolved field controls.
pub fn get_template(conn: &Connection, owner_id: &str, name: &str) -> Result<TemplateResponse> {
    let template = schema::get_template_by_name(conn, owner_id, name)?
        .ok_or_else(|| CurioError::TemplateNotFound(name.to_string()))?;
    to_response(conn, template)
}

/// Delete a template. Deletion is blocked while items still reference the
/// template; callers must delete or migrate the items first.
pub fn delete_template(conn: &Connection, owner_id: &str, name: &str) -> Result<()> {
    let template = schema::get_template_by_name(conn, owner_id, name)?
        .ok_or_else(|| CurioError::TemplateNotFound(name.to_string()))?;

    let referencing = schema::count_items_for_template(conn, template.id)?;
    if referencing > 0 {
        return Err(CurioError::TemplateInUse(name.to_string(), referencing));
    }

    schema::delete_template(conn, owner_id, template.id)?;
    log::info!("Deleted template '{}'", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::db::schema::{insert_item, Acquisition, NewItem};
    use serde_json::Map;

    fn setup_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        migrations::run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_create_and_get_template_resolves_controls() {
        let conn = setup_test_db();
        let fields = vec![
            FieldDef { name: "Brand".into(), required: true, kind: None },
            FieldDef { name: "Size".into(), required: false, kind: None },
        ];
        create_template(&conn, "u1", "Sneakers", fields).unwrap();

        let response = get_template(&conn, "u1", "Sneakers").unwrap();
        assert_eq!(response.controls.len(), 2);
        assert!(response.controls[0].required);
        assert_eq!(response.item_count, 0);
    }

    #[test]
    fn test_duplicate_field_names_rejected() {
        let conn = setup_test_db();
        let fields = vec![
            FieldDef { name: "Brand".into(), required: true, kind: None },
            FieldDef { name: "Brand".into(), required: false, kind: None },
        ];
        let err = create_template(&conn, "u1", "Sneakers", fields).unwrap_err();
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_delete_blocked_while_items_reference() {
        let conn = setup_test_db();
        let created = create_template(&conn, "u1", "Comics", vec![]).unwrap();
        insert_item(
            &conn,
            &NewItem {
                template_id: created.id,
                name: "Spawn #1".into(),
                dynamic_data: Map::new(),
                acquisition: Acquisition::default(),
                images: vec![],
            },
        )
        .unwrap();

        let err = delete_template(&conn, "u1", "Comics").unwrap_err();
        match err {
            CurioError::TemplateInUse(ref name, count) => {
                assert_eq!(name, "Comics");
                assert_eq!(count, 1);
            }
            other => panic!("expected TemplateInUse, got {:?}", other),
        }

        // Still deletable once empty
        crate::db::schema::delete_item(&conn, "u1", 1).unwrap();
        delete_template(&conn, "u1", "Comics").unwrap();
        assert!(matches!(
            get_template(&conn, "u1", "Comics").unwrap_err(),
            CurioError::TemplateNotFound(_)
        ));
    }
}
