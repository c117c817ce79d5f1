//! Integration tests for the cyra configuration library

mod app_config;
mod load_export;
pub mod test_utils;
