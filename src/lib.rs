//! Cyra: Declarative TOML Configuration
//!
//! Applications declare a typed schema of configuration values with defaults,
//! comments, validators and documentation. Configs built from the schema load
//! values from TOML and write back missing entries without disturbing what a
//! user already wrote in the file.

pub mod config;
pub mod docs;
pub mod error;
pub mod logging;
pub mod schema;
pub mod tree;

pub use config::{Config, FlatKey};
pub use docs::DocBlock;
pub use error::CyraError;
pub use schema::{Builder, Key};
pub use tree::KeyPath;
