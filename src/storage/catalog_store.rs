use log::{debug, error, warn};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use crate::errors::Result;

/// Text used whenever the stored catalog cannot be read.
pub const EMPTY_CATALOG: &str = "{}";

/// Raw catalog text passthrough. Neither operation fails outward.
pub trait CatalogPersistence {
    fn read_catalog_text(&self) -> String;
    fn write_catalog_text(&self, text: &str);
}

pub struct FileCatalogStore {
    path: PathBuf,
}

impl FileCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn try_write(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl CatalogPersistence for FileCatalogStore {
    fn read_catalog_text(&self) -> String {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                debug!("Read {} bytes of catalog from {}", text.len(), self.path.display());
                text
            }
            Err(e) => {
                warn!("Could not read catalog at {}: {}", self.path.display(), e);
                EMPTY_CATALOG.to_string()
            }
        }
    }

    fn write_catalog_text(&self, text: &str) {
        match self.try_write(text) {
            Ok(()) => debug!("Wrote {} bytes of catalog to {}", text.len(), self.path.display()),
            Err(e) => error!("Could not write catalog to {}: {}", self.path.display(), e),
        }
    }
}

/// In-process store, starting from an empty catalog.
#[derive(Debug)]
pub struct MemoryCatalogStore {
    text: RefCell<String>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::with_text(EMPTY_CATALOG)
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: RefCell::new(text.to_string()),
        }
    }
}

impl Default for MemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogPersistence for MemoryCatalogStore {
    fn read_catalog_text(&self) -> String {
        self.text.borrow().clone()
    }

    fn write_catalog_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }
}
