//! Key paths and path-keyed mapping utilities
//!
//! Every schema entry is identified by a [`KeyPath`]; the helpers in
//! [`mapping`] resolve such paths inside plain nested TOML tables.

pub mod mapping;
pub mod path;

pub use path::{KeyPath, SEPARATOR};
