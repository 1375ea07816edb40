// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth credential model persisted by the token store.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Proactive refresh window before expiry (one week).
pub const REFRESH_GRACE_SECS: i64 = 60 * 60 * 24 * 7;

/// OAuth2 access/refresh token pair plus issuance metadata.
///
/// Serialized with the field names of the token file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Bearer token for API calls
    pub access_token: String,
    /// Token used to mint a new access token
    pub refresh_token: String,
    /// Lifetime declared by the remote service, in seconds
    #[serde(rename = "expires_in")]
    pub valid_for_secs: i64,
    /// When the credential was obtained or last refreshed (unix seconds)
    #[serde(rename = "create_date", default, skip_serializing_if = "is_zero")]
    pub issued_at: i64,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl Credential {
    /// Unix second at which the access token stops working.
    pub fn expires_at(&self) -> i64 {
        self.issued_at.saturating_add(self.valid_for_secs)
    }

    /// Expiry as a UTC timestamp, for logging.
    pub fn expires_at_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.expires_at(), 0).unwrap_or_default()
    }

    /// True once `now` is inside the grace window before expiry.
    pub fn is_stale_at(&self, now: i64, grace: Duration) -> bool {
        self.expires_at().saturating_sub(grace.num_seconds()) < now
    }

    /// True once `now` is past expiry.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at() < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(issued_at: i64, valid_for_secs: i64) -> Credential {
        Credential {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            valid_for_secs,
            issued_at,
        }
    }

    #[test]
    fn test_stale_and_expired_thresholds() {
        let grace = Duration::seconds(REFRESH_GRACE_SECS);
        let thirty_days = 30 * 86_400;
        let c = credential(1_000_000, thirty_days);

        // 22 days in: still fresh
        let now = 1_000_000 + 22 * 86_400;
        assert!(!c.is_stale_at(now, grace));
        assert!(!c.is_expired_at(now));

        // 24 days in: inside the grace week
        let now = 1_000_000 + 24 * 86_400;
        assert!(c.is_stale_at(now, grace));
        assert!(!c.is_expired_at(now));

        // 31 days in: expired
        let now = 1_000_000 + 31 * 86_400;
        assert!(c.is_stale_at(now, grace));
        assert!(c.is_expired_at(now));
    }

    #[test]
    fn test_exact_threshold_is_not_stale() {
        let grace = Duration::seconds(100);
        let c = credential(1_000, 500);
        assert!(!c.is_stale_at(1_400, grace));
        assert!(c.is_stale_at(1_401, grace));
    }

    #[test]
    fn test_token_file_field_names() {
        let json = serde_json::to_value(credential(1_700_000_000, 2_592_000)).unwrap();
        assert_eq!(json["access_token"], "access");
        assert_eq!(json["refresh_token"], "refresh");
        assert_eq!(json["expires_in"], 2_592_000);
        assert_eq!(json["create_date"], 1_700_000_000);
    }

    #[test]
    fn test_zero_create_date_omitted_and_defaulted() {
        let json = serde_json::to_string(&credential(0, 10)).unwrap();
        assert!(!json.contains("create_date"));

        let parsed: Credential = serde_json::from_str(
            r#"{"access_token":"a","refresh_token":"r","expires_in":10}"#,
        )
        .unwrap();
        assert_eq!(parsed.issued_at, 0);
    }
}
