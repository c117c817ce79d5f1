//! Configuration Schema
//!
//! An ordered table of entries keyed by [`KeyPath`]. Declaration order is
//! significant: it decides the order in which entries appear in exported
//! documents and how documentation blocks are sliced.

pub mod builder;
pub mod key;
pub mod value;

pub use builder::Builder;
pub use key::Key;
pub use value::{ValueKind, ValueSlot, Validator};

use crate::error::CyraError;
use crate::tree::KeyPath;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

/// What an entry holds
#[derive(Debug, Clone)]
pub enum EntryKind {
    /// Grouping node, rendered as a TOML table
    Section,
    /// Typed leaf with default and live value
    Value(ValueSlot),
}

/// A named node of the schema tree
#[derive(Debug, Clone)]
pub struct Entry {
    path: KeyPath,
    comment: Option<String>,
    docstring: Option<String>,
    kind: EntryKind,
}

impl Entry {
    pub(crate) fn new(path: KeyPath, kind: EntryKind) -> Self {
        Self {
            path,
            comment: None,
            docstring: None,
            kind,
        }
    }

    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    /// Comment written next to the entry in exported documents
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Dedented documentation text
    pub fn docstring(&self) -> Option<&str> {
        self.docstring.as_deref()
    }

    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    pub fn is_section(&self) -> bool {
        matches!(self.kind, EntryKind::Section)
    }

    pub fn as_value(&self) -> Option<&ValueSlot> {
        match &self.kind {
            EntryKind::Value(slot) => Some(slot),
            EntryKind::Section => None,
        }
    }

    pub(crate) fn as_value_mut(&mut self) -> Option<&mut ValueSlot> {
        match &mut self.kind {
            EntryKind::Value(slot) => Some(slot),
            EntryKind::Section => None,
        }
    }

    pub(crate) fn set_comment(&mut self, comment: Option<String>) {
        if comment.is_some() {
            self.comment = comment;
        }
    }

    pub(crate) fn set_docstring(&mut self, docstring: Option<String>) {
        if docstring.is_some() {
            self.docstring = docstring;
        }
    }
}

/// Ordered mapping from [`KeyPath`] to [`Entry`]
#[derive(Debug, Clone)]
pub struct Schema {
    id: u64,
    entries: Vec<Entry>,
    index: HashMap<KeyPath, usize>,
}

impl Schema {
    pub(crate) fn new() -> Self {
        Self {
            id: NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Identity shared by a builder and every config built from it
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &KeyPath) -> Option<&Entry> {
        self.position(path).map(|i| &self.entries[i])
    }

    pub fn position(&self, path: &KeyPath) -> Option<usize> {
        self.index.get(path).copied()
    }

    /// Value entries with their positions
    pub fn values(&self) -> impl Iterator<Item = (usize, &Entry, &ValueSlot)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| entry.as_value().map(|slot| (i, entry, slot)))
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.entries.get_mut(index)
    }

    /// Append an entry, rejecting paths that are already taken
    pub(crate) fn insert(&mut self, entry: Entry) -> Result<usize, CyraError> {
        if self.index.contains_key(entry.path()) {
            return Err(CyraError::invalid(format!(
                "`{}` is already defined",
                entry.path()
            )));
        }
        let position = self.entries.len();
        self.index.insert(entry.path().clone(), position);
        self.entries.push(entry);
        Ok(position)
    }
}
