// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Measurement retrieval for a date window.

use crate::error::Result;
use crate::models::{DateWindow, Innerscan, InnerscanResponse};
use crate::services::reconcile::reconcile;
use crate::services::TokenManager;
use chrono::{NaiveDateTime, TimeZone};

/// Fetches innerscan data with a token from the lifecycle manager.
#[derive(Clone)]
pub struct MeasurementFetcher {
    tokens: TokenManager,
}

impl MeasurementFetcher {
    pub fn new(tokens: TokenManager) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Fetch the raw payload for `[from, to]`.
    ///
    /// The 90-day limit is the caller's responsibility (see [`DateWindow`]).
    pub async fn fetch(&self, from: NaiveDateTime, to: NaiveDateTime) -> Result<InnerscanResponse> {
        let access_token = self.tokens.ensure_valid_token().await?;
        let response = self
            .tokens
            .client()
            .get_innerscan(&access_token, from, to)
            .await?;

        tracing::info!(
            samples = response.data.len(),
            from = %from,
            to = %to,
            "Retrieved innerscan data"
        );
        Ok(response)
    }

    /// Fetch a validated window and reconcile it into daily records.
    pub async fn fetch_measurements<Tz: TimeZone>(
        &self,
        window: &DateWindow,
        tz: &Tz,
    ) -> Result<Innerscan> {
        let response = self.fetch(window.start(), window.end()).await?;
        let innerscan = reconcile(&response, tz)?;

        for record in &innerscan.records {
            tracing::debug!(
                date = %record.date,
                weight = record.weight,
                bmi = record.bmi,
                body_fat = record.body_fat,
                "Measurement"
            );
        }
        Ok(innerscan)
    }
}
