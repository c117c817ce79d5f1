//! Cursor-based schema declaration
//!
//! ```
//! use cyra::Builder;
//!
//! let mut builder = Builder::new();
//! let msg = builder.comment("Cyra says hello").define("msg", "Hello World".to_string())?;
//! builder.comment("SQL Database settings").push("DATABASE")?;
//! let port = builder.define("port", 1443_i64)?;
//! builder.pop(1)?;
//!
//! let mut config = builder.build();
//! config.set(&port, 1234)?;
//! assert_eq!(config.get(&port)?, 1234);
//! assert_eq!(config.get(&msg)?, "Hello World");
//! # Ok::<(), cyra::CyraError>(())
//! ```

use crate::config::Config;
use crate::docs::dedent;
use crate::error::CyraError;
use crate::schema::key::Key;
use crate::schema::value::{TypeCheck, ValueSlot, Validator};
use crate::schema::{Entry, EntryKind, Schema};
use crate::tree::KeyPath;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

/// Accumulates schema entries under an active section path
#[derive(Debug)]
pub struct Builder {
    schema: Schema,
    current_path: Vec<String>,
    pending_comment: Option<String>,
    pending_docstring: Option<String>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            schema: Schema::new(),
            current_path: Vec::new(),
            pending_comment: None,
            pending_docstring: None,
        }
    }

    /// Comment for the next defined value or pushed section
    pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        self.pending_comment = (!text.is_empty()).then_some(text);
        self
    }

    /// Documentation for the next defined value or pushed section
    ///
    /// The text is dedented, so indented multi-line literals can be used.
    pub fn docstring(&mut self, text: &str) -> &mut Self {
        let text = dedent(text);
        self.pending_docstring = (!text.is_empty()).then_some(text);
        self
    }

    /// Active section path (empty at the root)
    pub fn current_path(&self) -> &[String] {
        &self.current_path
    }

    /// Declare a value under the active section
    ///
    /// The TOML kind of `default` fixes the kind of every later assignment.
    pub fn define<T>(&mut self, key: &str, default: T) -> Result<Key<T>, CyraError>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        self.define_entry(key, default, None)
    }

    /// Declare a value whose assignments must satisfy `validator`
    ///
    /// Rejected values fall back to `default` instead of raising.
    pub fn define_validated<T, F>(
        &mut self,
        key: &str,
        default: T,
        validator: F,
    ) -> Result<Key<T>, CyraError>
    where
        T: Serialize + DeserializeOwned + 'static,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let validator: Validator = Arc::new(move |value: &toml::Value| {
            value
                .clone()
                .try_into::<T>()
                .map(|typed| validator(&typed))
                .unwrap_or(false)
        });
        self.define_entry(key, default, Some(validator))
    }

    fn define_entry<T>(
        &mut self,
        key: &str,
        default: T,
        validator: Option<Validator>,
    ) -> Result<Key<T>, CyraError>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        let path = KeyPath::child_of(&self.current_path, key)?;
        let default = toml::Value::try_from(default)
            .map_err(|e| CyraError::Serialize(format!("default of `{}`: {}", path, e)))?;

        let type_check: TypeCheck =
            Arc::new(|value: &toml::Value| value.clone().try_into::<T>().is_ok());
        let slot = ValueSlot::new(default, validator)
            .with_type_check(type_check, std::any::type_name::<T>());

        let mut entry = Entry::new(path, EntryKind::Value(slot));
        entry.set_comment(self.pending_comment.take());
        entry.set_docstring(self.pending_docstring.take());

        trace!(path = %entry.path(), "Defined value");
        let index = self.schema.insert(entry)?;
        Ok(Key::new(self.schema.id(), index))
    }

    /// Enter section `key`, creating it if needed
    pub fn push(&mut self, key: &str) -> Result<(), CyraError> {
        let path = KeyPath::child_of(&self.current_path, key)?;

        match self.schema.position(&path) {
            Some(index) => {
                let entry = self
                    .schema
                    .entry_mut(index)
                    .ok_or_else(|| CyraError::invalid(format!("`{}` is not in the schema", path)))?;
                if !entry.is_section() {
                    return Err(CyraError::invalid(format!(
                        "`{}` is a value and cannot be used as a section",
                        path
                    )));
                }
                entry.set_comment(self.pending_comment.take());
                entry.set_docstring(self.pending_docstring.take());
            }
            None => {
                let mut entry = Entry::new(path, EntryKind::Section);
                entry.set_comment(self.pending_comment.take());
                entry.set_docstring(self.pending_docstring.take());
                trace!(path = %entry.path(), "Defined section");
                self.schema.insert(entry)?;
            }
        }

        self.current_path.push(key.to_string());
        Ok(())
    }

    /// Leave `n` sections
    pub fn pop(&mut self, n: usize) -> Result<(), CyraError> {
        if n > self.current_path.len() {
            return Err(CyraError::invalid(format!(
                "attempted to pop {} sections with only {} active",
                n,
                self.current_path.len()
            )));
        }
        self.current_path.truncate(self.current_path.len() - n);
        Ok(())
    }

    pub fn pop_one(&mut self) -> Result<(), CyraError> {
        self.pop(1)
    }

    /// Realize the schema as an independent config
    pub fn build(&self) -> Config {
        Config::from_schema(self.schema.clone())
    }
}
