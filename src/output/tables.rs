use chrono::{DateTime, NaiveDateTime};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};
use serde_json::Value;

use crate::dci::Resource;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn columns(resource: Resource) -> &'static [&'static str] {
    match resource {
        Resource::Pipelines => &["id", "name", "state", "created_at"],
        Resource::Jobs => &["id", "name", "status", "created_at"],
        Resource::Components => &["id", "name", "type", "version", "created_at"],
        Resource::Teams => &["id", "name", "state", "created_at"],
    }
}

/// One row per item, with the columns that matter for `resource`.
pub fn list_table(resource: Resource, items: &[Value]) -> Table {
    rows_table(columns(resource), items)
}

/// One row per item, one column per requested field.
pub fn projected_table(fields: &[String], items: &[Value]) -> Table {
    let columns: Vec<&str> = fields.iter().map(String::as_str).collect();
    rows_table(&columns, items)
}

fn rows_table(columns: &[&str], items: &[Value]) -> Table {
    let mut table = create_table();
    table.set_header(
        columns
            .iter()
            .map(|label| Cell::new(label.replace('_', " ")).fg(TableColor::Cyan))
            .collect::<Vec<_>>(),
    );

    for item in items {
        table.add_row(
            columns
                .iter()
                .map(|column| field_cell(column, item.get(*column)))
                .collect::<Vec<_>>(),
        );
    }

    table
}

/// Field/value table of a single entity, unwrapping `{"pipeline": {...}}`.
pub fn entity_table(resource: Resource, payload: &Value) -> Table {
    let entity = payload.get(resource.singular_key()).unwrap_or(payload);

    let mut table = create_table();
    table.set_header(vec![
        Cell::new("field").fg(TableColor::Cyan),
        Cell::new("value").fg(TableColor::Cyan),
    ]);

    if let Some(fields) = entity.as_object() {
        for (key, value) in fields {
            table.add_row(vec![Cell::new(key), field_cell(key, Some(value))]);
        }
    }

    table
}

fn field_cell(column: &str, value: Option<&Value>) -> Cell {
    let text = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) if column.ends_with("_at") => format_timestamp(s),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    match column {
        "status" | "state" => status_cell(text),
        _ => Cell::new(text),
    }
}

fn status_cell(text: String) -> Cell {
    let color = match text.as_str() {
        "success" | "active" => TableColor::Green,
        "failure" | "error" | "killed" => TableColor::Red,
        "new" | "pre-run" | "running" | "post-run" => TableColor::Yellow,
        _ => return Cell::new(text),
    };
    Cell::new(text).fg(color)
}

/// DCI timestamps come without a zone; anything unparseable is shown raw.
fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
