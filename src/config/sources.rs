//! Value sources other than a TOML document: nested mappings, flat mappings
//! and environment variables.

use crate::config::Config;
use crate::error::CyraError;
use crate::tree::{mapping, KeyPath};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Key of a flat mapping
///
/// Flat sources address values either by segment sequence or by the
/// dot-joined path string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlatKey {
    Path(KeyPath),
    Joined(String),
}

impl From<KeyPath> for FlatKey {
    fn from(path: KeyPath) -> Self {
        FlatKey::Path(path)
    }
}

impl From<&str> for FlatKey {
    fn from(joined: &str) -> Self {
        FlatKey::Joined(joined.to_string())
    }
}

impl From<String> for FlatKey {
    fn from(joined: String) -> Self {
        FlatKey::Joined(joined)
    }
}

/// Environment variable holding the override for `path`
///
/// `DATABASE.port` with prefix `CYRA` becomes `CYRA_DATABASE__PORT`.
pub fn env_var_name(prefix: &str, path: &KeyPath) -> String {
    let joined = path
        .segments()
        .iter()
        .map(|segment| segment.to_uppercase())
        .collect::<Vec<_>>()
        .join("__");
    if prefix.is_empty() {
        joined
    } else {
        format!("{}_{}", prefix.to_uppercase(), joined)
    }
}

impl Config {
    /// Take values from a nested mapping
    ///
    /// Paths the mapping does not hold mark the config as having missing
    /// entries, as with [`Config::load_document`]. A failed coercion leaves
    /// the config unchanged.
    pub fn load_mapping(&mut self, source: &toml::Table) -> Result<(), CyraError> {
        let mut found = Vec::new();
        for (index, entry, _) in self.schema().values() {
            let value = mapping::get(source, entry.path().segments())?.cloned();
            found.push((index, value));
        }

        self.staged(|config| {
            config.missing = false;
            for (index, value) in found {
                match value {
                    Some(value) => config.assign(index, value)?,
                    None => config.mark_missing(),
                }
            }
            Ok(())
        })
    }

    /// Take values from a flat mapping
    ///
    /// Each path is looked up as [`FlatKey::Path`] first, then as
    /// [`FlatKey::Joined`]. Absent paths are ignored.
    pub fn load_flat_mapping(&mut self, source: &HashMap<FlatKey, toml::Value>) -> Result<(), CyraError> {
        let found: Vec<(usize, toml::Value)> = self
            .schema()
            .values()
            .filter_map(|(index, entry, _)| {
                source
                    .get(&FlatKey::Path(entry.path().clone()))
                    .or_else(|| source.get(&FlatKey::Joined(entry.path().joined())))
                    .map(|value| (index, value.clone()))
            })
            .collect();

        self.staged(|config| {
            for (index, value) in found {
                config.assign(index, value)?;
            }
            Ok(())
        })
    }

    /// Apply overrides from environment variables named by [`env_var_name`]
    ///
    /// Variable contents are taken as strings and coerced like any other
    /// assignment. Returns the number of values applied.
    pub fn load_env(&mut self, prefix: &str) -> Result<usize, CyraError> {
        self.load_vars(prefix, |name| std::env::var(name).ok())
    }

    pub(crate) fn load_vars<F>(&mut self, prefix: &str, lookup: F) -> Result<usize, CyraError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let found: Vec<(KeyPath, String)> = self
            .schema()
            .values()
            .filter_map(|(_, entry, _)| {
                let name = env_var_name(prefix, entry.path());
                lookup(&name).map(|raw| {
                    debug!(var = %name, path = %entry.path(), "Applying environment override");
                    (entry.path().clone(), raw)
                })
            })
            .collect();

        self.staged(|config| {
            let mut applied = 0;
            for (path, raw) in found {
                if config.assign_path(&path, toml::Value::String(raw))? {
                    applied += 1;
                } else {
                    warn!(path = %path, "Environment override does not match a value");
                }
            }
            Ok(applied)
        })
    }
}
