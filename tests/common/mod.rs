// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use healthplanet_export::config::Config;
use healthplanet_export::db::{FileTokenStore, TokenStore};
use healthplanet_export::models::Credential;
use healthplanet_export::services::{HealthPlanetClient, TokenManager};
use healthplanet_export::time_utils::unix_now;
use healthplanet_export::AppState;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::MockServer;

pub const CLIENT_ID: &str = "test_client_id";
pub const CLIENT_SECRET: &str = "test_secret";

const DAY: i64 = 86_400;
const THIRTY_DAYS: i64 = 30 * DAY;

/// Credential issued `age_days` ago with a 30-day lifetime.
#[allow(dead_code)]
pub fn credential_aged(age_days: i64) -> Credential {
    Credential {
        access_token: "stored_access".to_string(),
        refresh_token: "stored_refresh".to_string(),
        valid_for_secs: THIRTY_DAYS,
        issued_at: unix_now() - age_days * DAY,
    }
}

/// Well outside the one-week grace window.
#[allow(dead_code)]
pub fn fresh_credential() -> Credential {
    credential_aged(1)
}

/// Inside the grace window but not yet expired.
#[allow(dead_code)]
pub fn stale_credential() -> Credential {
    credential_aged(25)
}

/// Token file store in a fresh temporary directory.
#[allow(dead_code)]
pub fn temp_file_store() -> (TempDir, Arc<FileTokenStore>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = Arc::new(FileTokenStore::new(dir.path().join("token.json")));
    (dir, store)
}

/// Token manager pointed at the mock server.
#[allow(dead_code)]
pub fn token_manager(server: &MockServer, store: Arc<dyn TokenStore>) -> TokenManager {
    let client = HealthPlanetClient::new(
        &server.uri(),
        CLIENT_ID.to_string(),
        CLIENT_SECRET.to_string(),
    );
    TokenManager::new(client, store)
}

/// Fully wired state pointed at the mock server.
#[allow(dead_code)]
pub fn test_state(server: &MockServer, store: Arc<dyn TokenStore>) -> AppState {
    let config = Config {
        base_url: server.uri(),
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        ..Config::default()
    };
    AppState::with_store(config, store)
}

/// Innerscan payload with the given `(date, keydata, tag)` samples.
#[allow(dead_code)]
pub fn innerscan_json(height: &str, samples: &[(&str, &str, &str)]) -> serde_json::Value {
    let data: Vec<_> = samples
        .iter()
        .map(|(date, keydata, tag)| {
            serde_json::json!({
                "date": date,
                "keydata": keydata,
                "model": "01000117",
                "tag": tag,
            })
        })
        .collect();

    serde_json::json!({
        "birth_date": "19850412",
        "height": height,
        "sex": "male",
        "data": data,
    })
}
