//! Directory-backed story storage.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::infrastructure::ports::{StoreError, StoryStore};

/// Stores each document as `<root>/<name>`.
pub struct FsStoryStore {
    root: PathBuf,
}

impl FsStoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let invalid = name.is_empty()
            || name.starts_with('.')
            || name.contains(['/', '\\'])
            || name.contains('\0');
        if invalid {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl StoryStore for FsStoryStore {
    fn read(&self, name: &str) -> Result<String, StoreError> {
        let path = self.path_for(name)?;
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::not_found(name),
            _ => StoreError::io("read", e),
        })
    }

    fn write(&self, name: &str, contents: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.root).map_err(|e| StoreError::io("create_dir", e))?;
        fs::write(&path, contents).map_err(|e| StoreError::io("write", e))?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "Story written");
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io("list", e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io("list", e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| StoreError::io("list", e))?
                .is_file();
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".json") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
