//! Conversion between plain `toml::Value`s and `toml_edit` document items

use toml_edit::{Array, InlineTable, Item, Table, TableLike};

/// Item for a schema value: tables become standard tables, the rest values
pub fn to_item(value: &toml::Value) -> Item {
    match value {
        toml::Value::Table(table) => Item::Table(to_table(table)),
        other => Item::Value(to_value(other)),
    }
}

/// Standard table whose nested tables are rendered as `[a.b]` sections
pub fn to_table(table: &toml::Table) -> Table {
    let mut out = Table::new();
    for (key, value) in table {
        out.insert(key, to_item(value));
    }
    out
}

pub fn to_value(value: &toml::Value) -> toml_edit::Value {
    match value {
        toml::Value::String(s) => toml_edit::Value::from(s.as_str()),
        toml::Value::Integer(i) => toml_edit::Value::from(*i),
        toml::Value::Float(f) => toml_edit::Value::from(*f),
        toml::Value::Boolean(b) => toml_edit::Value::from(*b),
        toml::Value::Datetime(dt) => toml_edit::Value::from(*dt),
        toml::Value::Array(items) => {
            toml_edit::Value::Array(items.iter().map(to_value).collect::<Array>())
        }
        toml::Value::Table(table) => toml_edit::Value::InlineTable(
            table
                .iter()
                .map(|(k, v)| (k.as_str(), to_value(v)))
                .collect::<InlineTable>(),
        ),
    }
}

/// Plain value held by a document item; `None` for empty slots
pub fn from_item(item: &Item) -> Option<toml::Value> {
    match item {
        Item::None => None,
        Item::Value(value) => Some(from_value(value)),
        Item::Table(table) => Some(toml::Value::Table(from_table_like(table))),
        Item::ArrayOfTables(tables) => Some(toml::Value::Array(
            tables
                .iter()
                .map(|table| toml::Value::Table(from_table_like(table)))
                .collect(),
        )),
    }
}

pub fn from_value(value: &toml_edit::Value) -> toml::Value {
    match value {
        toml_edit::Value::String(s) => toml::Value::String(s.value().clone()),
        toml_edit::Value::Integer(i) => toml::Value::Integer(*i.value()),
        toml_edit::Value::Float(f) => toml::Value::Float(*f.value()),
        toml_edit::Value::Boolean(b) => toml::Value::Boolean(*b.value()),
        toml_edit::Value::Datetime(dt) => toml::Value::Datetime(*dt.value()),
        toml_edit::Value::Array(items) => toml::Value::Array(items.iter().map(from_value).collect()),
        toml_edit::Value::InlineTable(table) => toml::Value::Table(
            table
                .iter()
                .map(|(k, v)| (k.to_string(), from_value(v)))
                .collect(),
        ),
    }
}

pub fn from_table_like(table: &dyn TableLike) -> toml::Table {
    table
        .iter()
        .filter_map(|(key, item)| from_item(item).map(|value| (key.to_string(), value)))
        .collect()
}
