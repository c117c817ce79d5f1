//! Configuration Instance
//!
//! A [`Config`] is a realized schema: every value entry holds a live value,
//! and the config caches the TOML document it was last loaded from. Exporting
//! reconciles the schema into that cached document, so unknown keys, user
//! comments and ordering survive a load/export round trip.

pub mod convert;
pub mod document;
mod file;
pub mod sources;

pub use sources::FlatKey;

use crate::docs::{slice_groups, DocBlock};
use crate::error::CyraError;
use crate::schema::{Entry, Key, Schema, ValueSlot};
use crate::tree::{mapping, KeyPath};
use document::WriteMode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use toml_edit::DocumentMut;
use tracing::debug;

/// Schema values bound to a cached TOML document
#[derive(Debug, Clone)]
pub struct Config {
    schema: Schema,
    document: DocumentMut,
    modified: bool,
    missing: bool,
}

impl Config {
    pub(crate) fn from_schema(schema: Schema) -> Self {
        Self {
            schema,
            document: DocumentMut::new(),
            modified: false,
            missing: false,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether a value changed since the last load or save
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Whether the last loaded source lacked any schema value
    pub fn has_missing_entries(&self) -> bool {
        self.missing
    }

    /// Current value behind `key`
    pub fn get<T: DeserializeOwned>(&self, key: &Key<T>) -> Result<T, CyraError> {
        let index = self.check_key(key)?;
        let (entry, slot) = self.slot(index)?;
        slot.get()
            .clone()
            .try_into::<T>()
            .map_err(|e| CyraError::Serialize(format!("`{}`: {}", entry.path(), e)))
    }

    /// Assign `value` to `key`, coercing and validating it
    pub fn set<T: Serialize>(&mut self, key: &Key<T>, value: T) -> Result<(), CyraError> {
        let index = self.check_key(key)?;
        let value = toml::Value::try_from(value).map_err(|e| {
            let path = self.schema.entries()[index].path();
            CyraError::Serialize(format!("`{}`: {}", path, e))
        })?;
        self.assign(index, value)
    }

    /// Restore the default of `key`
    pub fn reset<T>(&mut self, key: &Key<T>) -> Result<(), CyraError> {
        let index = self.check_key(key)?;
        if self.slot_mut(index)?.reset() {
            self.modified = true;
        }
        Ok(())
    }

    pub fn reset_all(&mut self) {
        let mut changed = false;
        for entry in self.schema.entries_mut() {
            if let Some(slot) = entry.as_value_mut() {
                changed |= slot.reset();
            }
        }
        self.modified |= changed;
    }

    /// Current value at a dot-joined path
    pub fn value(&self, path: &str) -> Result<&toml::Value, CyraError> {
        let index = self.value_index(path)?;
        Ok(self.slot(index)?.1.get())
    }

    /// Assign a plain TOML value at a dot-joined path
    pub fn set_value(&mut self, path: &str, value: toml::Value) -> Result<(), CyraError> {
        let index = self.value_index(path)?;
        self.assign(index, value)
    }

    /// Parse `text` and take every schema value it holds
    ///
    /// Values absent from the document keep their current value and mark
    /// the config as having missing entries. The parsed document replaces the
    /// cached one. If any value fails to coerce, nothing changes.
    pub fn load_document(&mut self, text: &str) -> Result<(), CyraError> {
        let parsed: DocumentMut = text.parse()?;

        let found: Vec<(usize, Option<toml::Value>)> = self
            .schema
            .values()
            .map(|(index, entry, _)| {
                let item = document::lookup(parsed.as_table(), entry.path().segments());
                (index, item.and_then(convert::from_item))
            })
            .collect();

        self.staged(|config| {
            config.missing = false;
            for (index, value) in found {
                match value {
                    Some(value) => config.assign(index, value)?,
                    None => {
                        debug!(path = %config.schema.entries()[index].path(), "Value missing from document");
                        config.missing = true;
                    }
                }
            }

            config.document = parsed;
            config.modified = false;
            Ok(())
        })
    }

    /// Write the schema into the cached document and serialize it
    pub fn export_document(&mut self) -> Result<String, CyraError> {
        let written = document::reconcile(&mut self.document, self.schema.entries(), WriteMode::Changed)?;
        debug!(written, "Exported document");
        Ok(self.document.to_string())
    }

    /// Current values as a nested mapping
    pub fn to_mapping(&self) -> Result<toml::Table, CyraError> {
        let mut table = toml::Table::new();
        for (_, entry, slot) in self.schema.values() {
            mapping::set(&mut table, entry.path().segments(), slot.get().clone())?;
        }
        Ok(table)
    }

    /// Documentation blocks, one per docstring-led group of entries
    pub fn doc_blocks(&self) -> Result<Vec<DocBlock>, CyraError> {
        slice_groups(self.schema.entries())
            .into_iter()
            .map(|group| -> Result<DocBlock, CyraError> {
                let mut fragment = DocumentMut::new();
                document::reconcile(&mut fragment, group, WriteMode::Always)?;
                Ok(DocBlock {
                    docstring: group[0].docstring().unwrap_or_default().to_string(),
                    toml: fragment.to_string(),
                })
            })
            .collect()
    }

    /// Coerce, validate and store `value` at entry `index`
    pub(crate) fn assign(&mut self, index: usize, value: toml::Value) -> Result<(), CyraError> {
        let entry = self
            .schema
            .entry_mut(index)
            .ok_or_else(|| CyraError::invalid(format!("no entry at position {}", index)))?;
        let path = entry.path().clone();
        let slot = entry
            .as_value_mut()
            .ok_or_else(|| CyraError::invalid(format!("`{}` is a section", path)))?;

        if slot.set(value, &path)? {
            self.modified = true;
        }
        Ok(())
    }

    /// Assign `value` to the entry at `path` if the schema holds a value there
    pub(crate) fn assign_path(&mut self, path: &KeyPath, value: toml::Value) -> Result<bool, CyraError> {
        match self.schema.position(path) {
            Some(index) if !self.schema.entries()[index].is_section() => {
                self.assign(index, value)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Apply `update` to a copy and keep it only if every step succeeds
    pub(crate) fn staged<F, R>(&mut self, update: F) -> Result<R, CyraError>
    where
        F: FnOnce(&mut Config) -> Result<R, CyraError>,
    {
        let mut next = self.clone();
        let result = update(&mut next)?;
        *self = next;
        Ok(result)
    }

    pub(crate) fn replace_document(&mut self, document: DocumentMut) {
        self.document = document;
    }

    pub(crate) fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub(crate) fn mark_missing(&mut self) {
        self.missing = true;
    }

    fn check_key<T>(&self, key: &Key<T>) -> Result<usize, CyraError> {
        if key.schema_id != self.schema.id() {
            return Err(CyraError::invalid("key belongs to a different schema"));
        }
        Ok(key.index)
    }

    fn value_index(&self, path: &str) -> Result<usize, CyraError> {
        let path: KeyPath = path.parse()?;
        match self.schema.position(&path) {
            Some(index) if !self.schema.entries()[index].is_section() => Ok(index),
            Some(_) => Err(CyraError::invalid(format!("`{}` is a section", path))),
            None => Err(CyraError::invalid(format!("`{}` is not in the schema", path))),
        }
    }

    fn slot(&self, index: usize) -> Result<(&Entry, &ValueSlot), CyraError> {
        let entry = self
            .schema
            .entries()
            .get(index)
            .ok_or_else(|| CyraError::invalid(format!("no entry at position {}", index)))?;
        let slot = entry
            .as_value()
            .ok_or_else(|| CyraError::invalid(format!("`{}` is a section", entry.path())))?;
        Ok((entry, slot))
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut ValueSlot, CyraError> {
        self.schema
            .entry_mut(index)
            .and_then(Entry::as_value_mut)
            .ok_or_else(|| CyraError::invalid(format!("no value at position {}", index)))
    }
}
