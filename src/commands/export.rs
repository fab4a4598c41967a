// Inventory export
// Full inventory as CSV, rows from the items drill-down (newest first).

use rusqlite::Connection;

use crate::analytics::details::{metric_details, Metric};
use crate::error::Result;

/// Render the owner's whole inventory as CSV with a
/// `Name,Collection,Value,Date` header. Text fields are quoted so commas
/// and embedded quotes survive a spreadsheet import.
pub fn export_inventory_csv(conn: &Connection, owner_id: &str) -> Result<String> {
    let rows = metric_details(conn, owner_id, Metric::Items)?;

    let mut csv = String::from("Name,Collection,Value,Date\n");
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            quote(&row.name),
            quote(&row.collection_name),
            row.value.unwrap_or(0.0),
            row.date.unwrap_or_default(),
        ));
    }
    Ok(csv)
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
