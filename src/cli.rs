// Curio CLI binary

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use curio::commands;
use curio::db::{self, schema::FieldDef};
use curio::db::schema::Acquisition;

#[derive(Parser)]
#[command(name = "curio")]
#[command(about = "Curio - A personal collection inventory with analytics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the inventory database
    Init {
        /// Database path (defaults to ~/.curio/curio.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Create a collection template
    AddTemplate {
        /// Template name (unique per owner)
        name: String,
        /// Field spec, repeatable: NAME, NAME:required or NAME:required:KIND
        #[arg(short, long)]
        field: Vec<String>,
        #[command(flatten)]
        ctx: Ctx,
    },

    /// List collection templates
    Templates {
        #[command(flatten)]
        ctx: Ctx,
    },

    /// Delete an empty collection template
    DeleteTemplate {
        name: String,
        #[command(flatten)]
        ctx: Ctx,
    },

    /// Add an item to a collection
    AddItem {
        /// Collection template name
        template: String,
        /// Item name
        name: String,
        /// Acquisition price
        #[arg(long, default_value = "0")]
        price: f64,
        /// Current estimated value
        #[arg(long, default_value = "0")]
        value: f64,
        /// Acquisition date (free-form, e.g. 2024-06-01)
        #[arg(long)]
        date: Option<String>,
        /// Where the item came from
        #[arg(long)]
        origin: Option<String>,
        /// Image URL, repeatable (first one is the cover)
        #[arg(long)]
        image: Vec<String>,
        /// Dynamic field, repeatable: KEY=VALUE
        #[arg(short, long)]
        field: Vec<String>,
        #[command(flatten)]
        ctx: Ctx,
    },

    /// List items in a collection
    Items {
        /// Collection template name
        template: String,
        #[command(flatten)]
        ctx: Ctx,
    },

    /// Show item details as JSON
    Show {
        /// Item ID
        id: i64,
        #[command(flatten)]
        ctx: Ctx,
    },

    /// Delete an item
    Delete {
        /// Item ID
        id: i64,
        #[command(flatten)]
        ctx: Ctx,
    },

    /// Show the dashboard (stats, optionally chart geometry)
    Dashboard {
        /// Include trend and pie geometry in the output
        #[arg(long)]
        charts: bool,
        #[command(flatten)]
        ctx: Ctx,
    },

    /// Drill into one dashboard metric (cost, value or items)
    Details {
        metric: String,
        #[command(flatten)]
        ctx: Ctx,
    },

    /// Recent additions feed
    Activity {
        #[command(flatten)]
        ctx: Ctx,
    },

    /// Export the full inventory as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        ctx: Ctx,
    },
}

/// Shared request context: which database, acting as which owner.
/// The owner id is opaque; when omitted, the default owner created at
/// `init` is used.
#[derive(clap::Args)]
struct Ctx {
    /// Database path (defaults to ~/.curio/curio.db)
    #[arg(long)]
    db: Option<PathBuf>,
    /// Owner id to act as
    #[arg(long)]
    owner: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db } => cmd_init(db),
        Commands::AddTemplate { name, field, ctx } => cmd_add_template(ctx, name, field),
        Commands::Templates { ctx } => cmd_templates(ctx),
        Commands::DeleteTemplate { name, ctx } => cmd_delete_template(ctx, name),
        Commands::AddItem {
            template,
            name,
            price,
            value,
            date,
            origin,
            image,
            field,
            ctx,
        } => cmd_add_item(ctx, template, name, price, value, date, origin, image, field),
        Commands::Items { template, ctx } => cmd_items(ctx, template),
        Commands::Show { id, ctx } => cmd_show(ctx, id),
        Commands::Delete { id, ctx } => cmd_delete(ctx, id),
        Commands::Dashboard { charts, ctx } => cmd_dashboard(ctx, charts),
        Commands::Details { metric, ctx } => cmd_details(ctx, metric),
        Commands::Activity { ctx } => cmd_activity(ctx),
        Commands::Export { output, ctx } => cmd_export(ctx, output),
    }
}

fn db_path(db: Option<PathBuf>) -> Result<PathBuf> {
    match db {
        Some(path) => Ok(path),
        None => db::default_db_path(),
    }
}

/// Open the database and resolve the acting owner from the context.
fn connect(ctx: Ctx) -> Result<(Connection, String)> {
    let path = db_path(ctx.db)?;
    if !path.exists() {
        anyhow::bail!("No inventory found at {} (run `curio init` first)", path.display());
    }
    let conn = db::open_db(&path)?;
    let owner = db::resolve_owner(&conn, ctx.owner)?;
    Ok((conn, owner))
}

fn cmd_init(db: Option<PathBuf>) -> Result<()> {
    let path = db_path(db)?;
    let (_conn, owner) = db::init_database(&path)?;
    println!("Initialized inventory at {}", path.display());
    println!("Default owner id: {}", owner);
    Ok(())
}

fn cmd_add_template(ctx: Ctx, name: String, field_specs: Vec<String>) -> Result<()> {
    let (conn, owner) = connect(ctx)?;
    let fields = field_specs
        .iter()
        .map(|spec| parse_field_spec(spec))
        .collect::<Result<Vec<_>>>()?;

    let template = commands::create_template(&conn, &owner, &name, fields)?;
    println!("Created template '{}' (id {})", template.name, template.id);
    for control in &template.controls {
        let marker = if control.required { " (required)" } else { "" };
        println!("  - {}{}", control.name, marker);
    }
    Ok(())
}

fn cmd_templates(ctx: Ctx) -> Result<()> {
    let (conn, owner) = connect(ctx)?;
    let templates = commands::list_templates(&conn, &owner)?;
    if templates.is_empty() {
        println!("No templates yet");
        return Ok(());
    }
    for t in templates {
        println!("{:<4} {:<24} {} field(s), {} item(s)", t.id, t.name, t.fields.len(), t.item_count);
    }
    Ok(())
}

fn cmd_delete_template(ctx: Ctx, name: String) -> Result<()> {
    let (conn, owner) = connect(ctx)?;
    commands::delete_template(&conn, &owner, &name)?;
    println!("Deleted template '{}'", name);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_add_item(
    ctx: Ctx,
    template: String,
    name: String,
    price: f64,
    value: f64,
    date: Option<String>,
    origin: Option<String>,
    images: Vec<String>,
    field_pairs: Vec<String>,
) -> Result<()> {
    let (conn, owner) = connect(ctx)?;

    let mut dynamic_data = serde_json::Map::new();
    for pair in &field_pairs {
        let (key, val) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Invalid field '{}', expected KEY=VALUE", pair))?;
        dynamic_data.insert(key.to_string(), serde_json::Value::String(val.to_string()));
    }

    let item = commands::create_item(
        &conn,
        &owner,
        &template,
        commands::ItemPayload {
            name,
            dynamic_data,
            acquisition: Acquisition {
                price,
                estimated_value: value,
                date,
                origin,
                currency: None,
            },
            images,
        },
    )?;
    println!("Added item '{}' (id {}) to '{}'", item.name, item.id, template);
    Ok(())
}

fn cmd_items(ctx: Ctx, template: String) -> Result<()> {
    let (conn, owner) = connect(ctx)?;
    let items = commands::list_items(&conn, &owner, &template)?;
    if items.is_empty() {
        println!("No items in '{}'", template);
        return Ok(());
    }
    for item in items {
        println!(
            "{:<4} {:<28} paid {:>10.2}  est. {:>10.2}",
            item.id, item.name, item.acquisition.price, item.acquisition.estimated_value
        );
    }
    Ok(())
}

fn cmd_show(ctx: Ctx, id: i64) -> Result<()> {
    let (conn, owner) = connect(ctx)?;
    let item = commands::get_item(&conn, &owner, id)?;
    println!("{}", serde_json::to_string_pretty(&item)?);
    Ok(())
}

fn cmd_delete(ctx: Ctx, id: i64) -> Result<()> {
    let (conn, owner) = connect(ctx)?;
    commands::delete_item(&conn, &owner, id)?;
    println!("Deleted item {}", id);
    Ok(())
}

fn cmd_dashboard(ctx: Ctx, charts: bool) -> Result<()> {
    let (conn, owner) = connect(ctx)?;
    if charts {
        let view = commands::get_dashboard_view(&conn, &owner)?;
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        let stats = commands::get_dashboard(&conn, &owner)?;
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Ok(())
}

fn cmd_details(ctx: Ctx, metric: String) -> Result<()> {
    let (conn, owner) = connect(ctx)?;
    let rows = commands::get_metric_details(&conn, &owner, &metric)?;
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn cmd_activity(ctx: Ctx) -> Result<()> {
    let (conn, owner) = connect(ctx)?;
    for entry in commands::recent_activity(&conn, &owner)? {
        println!("{} {} ({})", entry.action, entry.item, entry.time);
    }
    Ok(())
}

fn cmd_export(ctx: Ctx, output: Option<PathBuf>) -> Result<()> {
    let (conn, owner) = connect(ctx)?;
    let csv = commands::export_inventory_csv(&conn, &owner)?;
    match output {
        Some(path) => {
            std::fs::write(&path, csv)?;
            println!("Wrote report to {}", path.display());
        }
        None => print!("{}", csv),
    }
    Ok(())
}

/// Parse a template field spec: `NAME`, `NAME:required`, `NAME:optional`,
/// optionally followed by `:KIND` (e.g. `Size:optional:number`).
fn parse_field_spec(spec: &str) -> Result<FieldDef> {
    let mut parts = spec.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim().to_string();
    if name.is_empty() {
        anyhow::bail!("Field spec '{}' has no name", spec);
    }
    let required = match parts.next() {
        None | Some("optional") => false,
        Some("required") => true,
        Some(other) => anyhow::bail!("Field spec '{}': expected required|optional, got '{}'", spec, other),
    };
    let kind = parts.next().map(|k| k.to_string());
    Ok(FieldDef { name, required, kind })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_spec() {
        let f = parse_field_spec("Brand").unwrap();
        assert_eq!((f.name.as_str(), f.required, f.kind), ("Brand", false, None));

        let f = parse_field_spec("Brand:required").unwrap();
        assert!(f.required);

        let f = parse_field_spec("Size:optional:number").unwrap();
        assert!(!f.required);
        assert_eq!(f.kind.as_deref(), Some("number"));

        assert!(parse_field_spec(":required").is_err());
        assert!(parse_field_spec("Brand:sometimes").is_err());
    }
}
