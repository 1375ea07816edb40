// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory token store (tests and embedding callers).

use crate::db::TokenStore;
use crate::error::{AppError, Result};
use crate::models::Credential;
use std::sync::Mutex;

/// Credential held in process memory.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    credential: Mutex<Option<Credential>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Mutex::new(Some(credential)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Credential>> {
        let guard = self
            .credential
            .lock()
            .map_err(|_| AppError::Storage("token store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let mut guard = self
            .credential
            .lock()
            .map_err(|_| AppError::Storage("token store lock poisoned".to_string()))?;
        *guard = Some(credential.clone());
        Ok(())
    }

    fn exists(&self) -> Result<bool> {
        Ok(self.load()?.is_some())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
