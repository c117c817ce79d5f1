//! Reconciliation between schema entries and a TOML document
//!
//! Entries are written into a `toml_edit` document one path at a time.
//! Content of the document that the schema does not mention is never
//! touched, and neither are comments a user already wrote.

use crate::config::convert;
use crate::error::CyraError;
use crate::schema::{Entry, EntryKind};
use toml_edit::{Decor, DocumentMut, Item, Table, TableLike};
use tracing::{debug, warn};

/// When a value entry overwrites what the document holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Write every value (rendering a fresh fragment)
    Always,
    /// Skip values the document already holds with an equal value
    Changed,
}

/// Write `entries` into `document` in order; returns the number of nodes written
pub fn reconcile<'a, I>(document: &mut DocumentMut, entries: I, mode: WriteMode) -> Result<usize, CyraError>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut written = 0;
    for entry in entries {
        if write_entry(document.as_table_mut(), entry.path().segments(), entry, mode, false)? {
            written += 1;
        }
    }
    Ok(written)
}

/// Item stored at `path`, if any
pub fn lookup<'a>(table: &'a dyn TableLike, path: &[String]) -> Option<&'a Item> {
    let (first, rest) = path.split_first()?;
    let item = table.get(first)?;
    if rest.is_empty() {
        Some(item)
    } else {
        lookup(item.as_table_like()?, rest)
    }
}

/// `inline` is set once the descent entered an inline table, where
/// comments cannot be written.
fn write_entry(
    table: &mut dyn TableLike,
    path: &[String],
    entry: &Entry,
    mode: WriteMode,
    inline: bool,
) -> Result<bool, CyraError> {
    match path {
        [] => Err(CyraError::invalid("key paths must not be empty")),
        [key] => write_leaf(table, key, entry, mode, inline),
        [head, rest @ ..] => {
            ensure_table(table, head)?;
            let inline = inline || table.get(head).is_some_and(Item::is_inline_table);
            let child = table
                .get_mut(head)
                .and_then(Item::as_table_like_mut)
                .ok_or_else(|| CyraError::invalid(format!("`{}` is not a table", head)))?;
            write_entry(child, rest, entry, mode, inline)
        }
    }
}

/// Make sure `table[key]` is a table; returns whether a new one was inserted
///
/// Existing nodes are never replaced, so a value where a table belongs is
/// an error.
fn ensure_table(table: &mut dyn TableLike, key: &str) -> Result<bool, CyraError> {
    let state = table.get(key).map(|item| (item.is_table_like(), item.is_none()));
    match state {
        Some((true, _)) => Ok(false),
        Some((false, false)) => {
            warn!(key, "Document holds a value where the schema expects a table");
            Err(CyraError::invalid(format!(
                "`{}` holds a value where a table is expected",
                key
            )))
        }
        _ => {
            table.insert(key, Item::Table(Table::new()));
            Ok(true)
        }
    }
}

/// Returns whether the document changed
fn write_leaf(
    table: &mut dyn TableLike,
    key: &str,
    entry: &Entry,
    mode: WriteMode,
    inline: bool,
) -> Result<bool, CyraError> {
    let (created, written) = match entry.kind() {
        EntryKind::Section => {
            let created = ensure_table(table, key)?;
            if let Some(Item::Table(section)) = table.get_mut(key) {
                if section.is_dotted() {
                    debug!(path = %entry.path(), "Section is written as dotted keys, leaving it without header or comment");
                    return Ok(created);
                }
                section.set_implicit(false);
            }
            (created, created)
        }
        EntryKind::Value(slot) => {
            let value = slot.get();
            let existing = table.get(key).and_then(convert::from_item);

            if mode == WriteMode::Changed && existing.as_ref() == Some(value) {
                debug!(path = %entry.path(), "Value unchanged, keeping document entry");
                return Ok(false);
            }

            let mut item = convert::to_item(value);
            match table.get_mut(key).filter(|old| !old.is_none()) {
                Some(old) => {
                    carry_format(old, &mut item);
                    *old = item;
                }
                None => {
                    table.insert(key, item);
                }
            }
            debug!(path = %entry.path(), "Wrote value");
            (existing.is_none(), true)
        }
    };

    if inline {
        return Ok(written);
    }
    if let (Some(comment), Some(item)) = (entry.comment(), table.get_mut(key)) {
        attach_comment(item, comment, created);
    }
    Ok(written)
}

/// Keep the decor (and table position) of the item being replaced
fn carry_format(old: &Item, new: &mut Item) {
    if old.is_value() && new.is_table() {
        let taken = std::mem::take(new);
        *new = match taken.into_value() {
            Ok(value) => Item::Value(value),
            Err(item) => item,
        };
    }
    match (old, new) {
        (Item::Value(old), Item::Value(new)) => *new.decor_mut() = old.decor().clone(),
        (Item::Table(old), Item::Table(new)) => {
            *new.decor_mut() = old.decor().clone();
            if let Some(position) = old.position() {
                new.set_position(position);
            }
        }
        _ => {}
    }
}

fn decor_mut(item: &mut Item) -> Option<&mut Decor> {
    match item {
        Item::Value(value) => Some(value.decor_mut()),
        Item::Table(table) => Some(table.decor_mut()),
        Item::None | Item::ArrayOfTables(_) => None,
    }
}

fn has_comment(decor: &Decor) -> bool {
    decor
        .suffix()
        .and_then(|suffix| suffix.as_str())
        .is_some_and(|suffix| suffix.contains('#'))
}

/// Put `comment` at the end of the item's line
///
/// Existing nodes keep a comment the user already wrote. Further lines of a
/// multi-line comment follow as comment lines of their own. Sections held as
/// dotted keys have no line of their own and get no comment.
fn attach_comment(item: &mut Item, comment: &str, created: bool) {
    let Some(decor) = decor_mut(item) else {
        return;
    };
    if !created && has_comment(decor) {
        return;
    }
    decor.set_suffix(comment_suffix(comment));
}

/// ` # first` followed by `# next` lines
fn comment_suffix(comment: &str) -> String {
    let lines: Vec<String> = comment
        .replace("\r\n", "\n")
        .split(['\n', '\r'])
        .map(|line| format!("# {}", line).trim_end().to_string())
        .collect();
    format!(" {}", lines.join("\n"))
}
