// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! HealthPlanet export: pull body-composition measurements from HealthPlanet
//! and turn them into a daily weight / BMI / body fat CSV.
//!
//! This crate provides the OAuth token lifecycle, the measurement fetcher,
//! the reconciliation engine and the CSV renderer used by the CLI.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

use chrono::Duration;
use config::Config;
use db::{FileTokenStore, TokenStore};
use services::{HealthPlanetClient, MeasurementFetcher, TokenManager};
use std::sync::Arc;

/// Services wired together for one run.
pub struct AppState {
    pub config: Config,
    pub tokens: TokenManager,
    pub fetcher: MeasurementFetcher,
}

impl AppState {
    /// Build the services with the token file named in `config`.
    pub fn new(config: Config) -> Self {
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.token_file));
        Self::with_store(config, store)
    }

    /// Build the services on top of an arbitrary credential store.
    pub fn with_store(config: Config, store: Arc<dyn TokenStore>) -> Self {
        let client = HealthPlanetClient::new(
            &config.base_url,
            config.client_id.clone(),
            config.client_secret.clone(),
        );
        let grace_days = config
            .refresh_grace_days
            .clamp(0, crate::config::MAX_REFRESH_GRACE_DAYS);
        let tokens = TokenManager::new(client, store).with_grace(Duration::days(grace_days));
        let fetcher = MeasurementFetcher::new(tokens.clone());

        Self {
            config,
            tokens,
            fetcher,
        }
    }
}
