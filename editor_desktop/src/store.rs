//! Paste store backed by a directory: one `<id>.json` file per paste.

use std::fs;
use std::path::{Path, PathBuf};
use toadbin_core::{PasteError, PasteStore, SaveRequest};

pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

fn store_error(e: impl std::fmt::Display) -> PasteError {
    PasteError::Store(e.to_string())
}

impl PasteStore for DirectoryStore {
    fn existing_ids(&mut self) -> Result<Vec<String>, PasteError> {
        let entries = fs::read_dir(&self.root).map_err(store_error)?;
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.map_err(store_error)?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        Ok(ids)
    }

    fn save(&mut self, request: &SaveRequest) -> Result<(), PasteError> {
        fs::create_dir_all(&self.root).map_err(store_error)?;
        let json = request.to_json().map_err(store_error)?;
        fs::write(self.path_for(&request.id), json).map_err(store_error)
    }
}
