// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with distinct process outcomes.

use crate::config::ConfigError;

/// Application error type.
///
/// Every variant is fatal to the current run. Per-record validation failures
/// are handled inside the reconciliation engine and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No stored credential at {0}; run the `auth` command first")]
    CredentialMissing(String),

    #[error("Credential already exists at {0}; remove it to re-authorize")]
    CredentialExists(String),

    #[error("Authorization code exchange failed: {0}")]
    AuthExchange(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Measurement request failed with HTTP {status}: {message}")]
    Fetch { status: u16, message: String },

    #[error("HTTP transport error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown measurement tag: {0}")]
    UnknownTag(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Internal(_) => 1,
            AppError::BadRequest(_) | AppError::Config(_) => 2,
            AppError::CredentialMissing(_) => 3,
            AppError::CredentialExists(_) => 4,
            AppError::AuthExchange(_) => 10,
            AppError::RefreshFailed(_) => 11,
            AppError::Fetch { .. } | AppError::Http(_) => 12,
            AppError::Parse(_) | AppError::UnknownTag(_) => 13,
            AppError::Storage(_) => 14,
        }
    }

    /// Whether the user has to run the authorization flow again to recover.
    pub fn requires_reauthorization(&self) -> bool {
        match self {
            AppError::CredentialMissing(_) | AppError::RefreshFailed(_) => true,
            AppError::Fetch { status, .. } => *status == 401,
            _ => false,
        }
    }
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, AppError>;
