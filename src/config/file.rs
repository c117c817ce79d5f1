//! Loading and saving config files

use crate::config::Config;
use crate::error::CyraError;
use std::fs;
use std::path::Path;
use toml_edit::DocumentMut;
use tracing::{info, instrument};

fn write(path: &Path, text: &str) -> Result<(), CyraError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CyraError::Io(parent.to_path_buf(), e))?;
    }
    fs::write(path, text).map_err(|e| CyraError::Io(path.to_path_buf(), e))
}

fn read(path: &Path) -> Result<String, CyraError> {
    fs::read_to_string(path).map_err(|e| CyraError::Io(path.to_path_buf(), e))
}

impl Config {
    /// Load values from the file at `path`
    ///
    /// A missing file is not an error; every value is then missing. With
    /// `writeback`, missing values are exported into the file, which keeps
    /// whatever the user already wrote.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_file(&mut self, path: impl AsRef<Path>, writeback: bool) -> Result<(), CyraError> {
        let path = path.as_ref();

        if path.is_file() {
            let text = read(path)?;
            self.load_document(&text)?;
            info!("Loaded config file");
        } else {
            info!("Config file not found, using defaults");
            self.mark_missing();
        }

        if writeback && self.has_missing_entries() {
            let text = self.export_document()?;
            write(path, &text)?;
            info!("Wrote missing entries back to config file");
        }
        Ok(())
    }

    /// Write the current values to `path`
    ///
    /// An existing file is re-read first so that content written since the
    /// last load is kept; its values are not taken over.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save_file(&mut self, path: impl AsRef<Path>) -> Result<(), CyraError> {
        let path = path.as_ref();

        if path.is_file() {
            let document: DocumentMut = read(path)?.parse()?;
            self.replace_document(document);
        }

        let text = self.export_document()?;
        write(path, &text)?;
        self.mark_saved();
        info!("Saved config file");
        Ok(())
    }
}
