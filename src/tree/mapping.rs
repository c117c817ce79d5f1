//! Path-keyed access to nested TOML mappings
//!
//! Plain `toml::Table` trees are used wherever values come from somewhere
//! other than a parsed document (programmatic overrides, environment, tests).

use crate::error::CyraError;
use toml::{Table, Value};

fn split_path<S: AsRef<str>>(path: &[S]) -> Result<(&S, &[S]), CyraError> {
    path.split_last()
        .ok_or_else(|| CyraError::invalid("key paths must not be empty"))
}

/// Get the value stored at `path`
///
/// Returns `Ok(None)` when any segment is missing or a prefix is not a table.
pub fn get<'a, S: AsRef<str>>(tree: &'a Table, path: &[S]) -> Result<Option<&'a Value>, CyraError> {
    let (last, parents) = split_path(path)?;
    let mut current = tree;
    for key in parents {
        match current.get(key.as_ref()) {
            Some(Value::Table(child)) => current = child,
            _ => return Ok(None),
        }
    }
    Ok(current.get(last.as_ref()))
}

/// Store `value` at `path`, creating intermediate tables as needed
///
/// A non-table value sitting on an intermediate segment is replaced.
pub fn set<S: AsRef<str>>(tree: &mut Table, path: &[S], value: Value) -> Result<(), CyraError> {
    let (last, parents) = split_path(path)?;
    let mut current = tree;
    for key in parents {
        let slot = current
            .entry(key.as_ref())
            .or_insert(Value::Table(Table::new()));
        if !slot.is_table() {
            *slot = Value::Table(Table::new());
        }
        current = slot
            .as_table_mut()
            .ok_or_else(|| CyraError::invalid(format!("`{}` is not a table", key.as_ref())))?;
    }
    current.insert(last.as_ref().to_string(), value);
    Ok(())
}

/// Visit every leaf (non-table) value depth-first, in insertion order
pub fn iterate<F>(tree: &Table, visit: &mut F)
where
    F: FnMut(&str, &Value),
{
    for (key, value) in tree {
        match value {
            Value::Table(child) => iterate(child, visit),
            leaf => visit(key.as_str(), leaf),
        }
    }
}

/// Remove every leaf for which `cond(key, value)` holds
pub fn remove<F>(tree: &mut Table, cond: &mut F)
where
    F: FnMut(&str, &Value) -> bool,
{
    let mut doomed = Vec::new();
    for (key, value) in tree.iter_mut() {
        match value {
            Value::Table(child) => remove(child, cond),
            leaf => {
                if cond(key.as_str(), &*leaf) {
                    doomed.push(key.clone());
                }
            }
        }
    }
    for key in doomed {
        tree.remove(&key);
    }
}
