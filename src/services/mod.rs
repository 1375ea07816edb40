// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod csv;
pub mod fetcher;
pub mod healthplanet;
pub mod reconcile;
pub mod token;

pub use fetcher::MeasurementFetcher;
pub use healthplanet::{HealthPlanetClient, TokenResponse};
pub use reconcile::reconcile;
pub use token::TokenManager;
