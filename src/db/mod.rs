// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential storage layer.
//!
//! The token lifecycle manager reads and writes the credential only through
//! [`TokenStore`], so the backing store can be swapped without touching the
//! refresh logic.

pub mod memory;
pub mod token_file;

pub use memory::MemoryTokenStore;
pub use token_file::FileTokenStore;

use crate::error::Result;
use crate::models::Credential;

/// Single-record credential store.
///
/// Implementations assume a single writer; concurrent processes sharing one
/// store are not coordinated.
pub trait TokenStore: Send + Sync {
    /// Load the stored credential, `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Credential>>;

    /// Replace the stored credential. Either the full new record is stored or
    /// the previous one is left intact.
    fn save(&self, credential: &Credential) -> Result<()>;

    /// Whether anything is stored, even a record that no longer parses.
    fn exists(&self) -> Result<bool>;

    /// Human-readable location for messages and logs.
    fn location(&self) -> String;
}
