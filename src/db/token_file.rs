// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON token file store.

use crate::db::TokenStore;
use crate::error::{AppError, Result};
use crate::models::Credential;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Credential persisted as a pretty-printed JSON file.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers never observe a truncated file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Credential>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let credential = serde_json::from_slice(&data).map_err(|e| {
            AppError::Storage(format!(
                "Failed to parse token file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(credential))
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let storage_err =
            |e: std::io::Error| AppError::Storage(format!("{}: {}", self.path.display(), e));

        let json = serde_json::to_vec_pretty(credential)
            .map_err(|e| AppError::Storage(format!("Failed to serialize credential: {}", e)))?;

        let mut tmp = NamedTempFile::new_in(self.parent_dir()).map_err(storage_err)?;
        tmp.write_all(&json).map_err(storage_err)?;
        tmp.as_file().sync_all().map_err(storage_err)?;
        tmp.persist(&self.path).map_err(|e| storage_err(e.error))?;

        tracing::debug!(path = %self.path.display(), "Credential saved");
        Ok(())
    }

    fn exists(&self) -> Result<bool> {
        self.path.try_exists().map_err(|e| {
            AppError::Storage(format!("Failed to stat {}: {}", self.path.display(), e))
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
