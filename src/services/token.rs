// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token lifecycle: first-time authorization, proactive refresh, and
//! persistence of every credential change.

use crate::db::TokenStore;
use crate::error::{AppError, Result};
use crate::models::{Credential, REFRESH_GRACE_SECS};
use crate::services::HealthPlanetClient;
use crate::time_utils::unix_now;
use chrono::Duration;
use std::sync::Arc;

/// Owns the credential's validity window.
///
/// The credential is never cached here. Every call reads it from the store
/// and every change is written back before it is handed out.
#[derive(Clone)]
pub struct TokenManager {
    client: HealthPlanetClient,
    store: Arc<dyn TokenStore>,
    grace: Duration,
}

impl TokenManager {
    /// Create a manager with the default one-week refresh grace window.
    pub fn new(client: HealthPlanetClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            store,
            grace: Duration::seconds(REFRESH_GRACE_SECS),
        }
    }

    /// Override the refresh grace window.
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn client(&self) -> &HealthPlanetClient {
        &self.client
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Return an access token that is outside the refresh grace window.
    ///
    /// Refreshes (and persists) the stored credential first when it is stale.
    pub async fn ensure_valid_token(&self) -> Result<String> {
        let credential = self
            .store
            .load()?
            .ok_or_else(|| AppError::CredentialMissing(self.store.location()))?;

        let now = unix_now();
        if !credential.is_stale_at(now, self.grace) {
            tracing::debug!(
                expires_at = %credential.expires_at_utc(),
                "Stored access token still valid"
            );
            return Ok(credential.access_token);
        }

        if credential.is_expired_at(now) {
            tracing::warn!(
                expired_at = %credential.expires_at_utc(),
                "Access token already expired, attempting refresh"
            );
        } else {
            tracing::info!(
                expires_at = %credential.expires_at_utc(),
                "Access token expiring soon, refreshing"
            );
        }

        let refreshed = self.refresh(&credential).await?;
        Ok(refreshed.access_token)
    }

    /// Refresh `current` with the remote service and persist the result.
    ///
    /// On a rejected grant the store is left untouched. A refreshed credential
    /// that cannot be saved is an error.
    pub async fn refresh(&self, current: &Credential) -> Result<Credential> {
        let response = self.client.refresh_token(&current.refresh_token).await?;
        let refreshed = response.refreshed(current, unix_now());

        self.store.save(&refreshed).map_err(|e| {
            tracing::error!(
                error = %e,
                location = %self.store.location(),
                "Refreshed credential could not be persisted"
            );
            e
        })?;

        tracing::info!(
            expires_at = %refreshed.expires_at_utc(),
            "Token refreshed and saved"
        );
        Ok(refreshed)
    }

    /// Browser URL for the first-time authorization step.
    ///
    /// Fails when a credential is already stored.
    pub fn authorization_url(&self, scope: &str) -> Result<String> {
        self.ensure_no_credential()?;
        Ok(self.client.authorization_url(scope))
    }

    /// Exchange an authorization code and persist the new credential.
    ///
    /// Refuses to run when a credential is already stored; it has to be
    /// removed explicitly before re-authorizing.
    pub async fn authorize(&self, code: &str) -> Result<Credential> {
        self.ensure_no_credential()?;

        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::AuthExchange(
                "authorization code is empty".to_string(),
            ));
        }

        let credential = self
            .client
            .exchange_code(code)
            .await?
            .into_credential(unix_now())?;

        self.store.save(&credential)?;

        tracing::info!(
            location = %self.store.location(),
            expires_at = %credential.expires_at_utc(),
            "Authorization complete, credential stored"
        );
        Ok(credential)
    }

    fn ensure_no_credential(&self) -> Result<()> {
        if self.store.exists()? {
            return Err(AppError::CredentialExists(self.store.location()));
        }
        Ok(())
    }
}
