// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HealthPlanet API client.
//!
//! Handles:
//! - Authorization URL construction
//! - Authorization code and refresh token grants
//! - Innerscan (body composition) retrieval

use crate::error::{AppError, Result};
use crate::models::innerscan::{InnerscanResponse, BODY_FAT_TAG, WEIGHT_TAG};
use crate::models::Credential;
use crate::time_utils::format_window_bound;
use chrono::NaiveDateTime;
use reqwest::StatusCode;
use serde::Deserialize;

/// Redirect URI registered for command-line clients.
pub const REDIRECT_URI: &str = "http://localhost";

/// `date` query value selecting measurement date (as opposed to upload date).
const DATE_MODE_MEASURED: &str = "1";

/// HealthPlanet API client.
#[derive(Clone)]
pub struct HealthPlanetClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl HealthPlanetClient {
    /// Create a new client with OAuth credentials.
    pub fn new(base_url: &str, client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        }
    }

    /// URL the user opens in a browser to grant access.
    pub fn authorization_url(&self, scope: &str) -> String {
        format!(
            "{}/oauth/auth?\
             client_id={}&\
             client_secret={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}",
            self.base_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.client_secret),
            urlencoding::encode(REDIRECT_URI),
            urlencoding::encode(scope),
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let response = self
            .token_request(&[("grant_type", "authorization_code"), ("code", code)])
            .await
            .map_err(|e| AppError::AuthExchange(format!("Token exchange request failed: {}", e)))?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "HealthPlanet token exchange failed");
            return Err(AppError::AuthExchange(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::AuthExchange(format!("Failed to parse token response: {}", e)))
    }

    /// Mint a new access token from a refresh token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        let response = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await
            .map_err(|e| AppError::RefreshFailed(format!("Token refresh request failed: {}", e)))?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "HealthPlanet token refresh failed");
            return Err(AppError::RefreshFailed(format!(
                "Token refresh failed with status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::RefreshFailed(format!("Failed to parse token response: {}", e)))
    }

    /// Fetch weight and body fat samples measured within `[from, to]`.
    pub async fn get_innerscan(
        &self,
        access_token: &str,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<InnerscanResponse> {
        let url = format!("{}/status/innerscan.json", self.base_url);
        let from = format_window_bound(from);
        let to = format_window_bound(to);
        let tags = format!("{},{}", WEIGHT_TAG, BODY_FAT_TAG);

        tracing::debug!(url = %url, from = %from, to = %to, tag = %tags, "Requesting innerscan data");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("access_token", access_token),
                ("date", DATE_MODE_MEASURED),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("tag", tags.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Http(format!("Failed to read response body: {}", e)))?;

        if status != StatusCode::OK {
            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!("HealthPlanet rate limit hit (429)");
            }
            return Err(AppError::Fetch {
                status: status.as_u16(),
                message: body,
            });
        }

        tracing::debug!(body = %body, "Innerscan response");

        serde_json::from_str(&body)
            .map_err(|e| AppError::Parse(format!("Invalid innerscan response: {}", e)))
    }

    /// POST to the token endpoint with the client credentials and `grant`.
    ///
    /// The endpoint takes its parameters in the query string.
    async fn token_request(
        &self,
        grant: &[(&str, &str)],
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        let url = format!("{}/oauth/token", self.base_url);
        let mut params = vec![
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", REDIRECT_URI),
        ];
        params.extend_from_slice(grant);

        self.http.post(&url).query(&params).send().await
    }
}

/// Token endpoint response.
///
/// Refresh responses may leave out fields that did not change.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Build a brand-new credential from an authorization code grant.
    pub fn into_credential(self, issued_at: i64) -> Result<Credential> {
        let refresh_token = self
            .refresh_token
            .ok_or_else(|| AppError::AuthExchange("response has no refresh_token".to_string()))?;
        let valid_for_secs = self
            .expires_in
            .ok_or_else(|| AppError::AuthExchange("response has no expires_in".to_string()))?;

        Ok(Credential {
            access_token: self.access_token,
            refresh_token,
            valid_for_secs,
            issued_at,
        })
    }

    /// Apply a refresh grant on top of `current`.
    pub fn refreshed(self, current: &Credential, issued_at: i64) -> Credential {
        Credential {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .unwrap_or_else(|| current.refresh_token.clone()),
            valid_for_secs: self.expires_in.unwrap_or(current.valid_for_secs),
            issued_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> Credential {
        Credential {
            access_token: "old_access".to_string(),
            refresh_token: "old_refresh".to_string(),
            valid_for_secs: 100,
            issued_at: 1,
        }
    }

    #[test]
    fn test_authorization_url() {
        let client = HealthPlanetClient::new(
            "https://www.healthplanet.jp/",
            "id 1".to_string(),
            "s&cret".to_string(),
        );
        let url = client.authorization_url("innerscan");
        assert_eq!(
            url,
            "https://www.healthplanet.jp/oauth/auth?client_id=id%201&client_secret=s%26cret\
             &redirect_uri=http%3A%2F%2Flocalhost&response_type=code&scope=innerscan"
        );
    }

    #[test]
    fn test_refreshed_keeps_missing_fields() {
        let response = TokenResponse {
            access_token: "new_access".to_string(),
            refresh_token: None,
            expires_in: None,
        };
        let c = response.refreshed(&current(), 50);
        assert_eq!(c.access_token, "new_access");
        assert_eq!(c.refresh_token, "old_refresh");
        assert_eq!(c.valid_for_secs, 100);
        assert_eq!(c.issued_at, 50);
    }

    #[test]
    fn test_refreshed_takes_supplied_fields() {
        let response = TokenResponse {
            access_token: "new_access".to_string(),
            refresh_token: Some("new_refresh".to_string()),
            expires_in: Some(2_592_000),
        };
        let c = response.refreshed(&current(), 50);
        assert_eq!(c.refresh_token, "new_refresh");
        assert_eq!(c.valid_for_secs, 2_592_000);
    }

    #[test]
    fn test_into_credential_requires_refresh_token() {
        let response = TokenResponse {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_in: Some(10),
        };
        assert!(matches!(
            response.into_credential(1),
            Err(AppError::AuthExchange(_))
        ));
    }
}
