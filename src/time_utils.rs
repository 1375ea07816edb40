// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for the HealthPlanet date/time wire formats.

use chrono::{NaiveDate, NaiveDateTime, Utc};

/// Request window bound format (`from` / `to` query parameters).
pub const WINDOW_FORMAT: &str = "%Y%m%d%H%M%S";

/// Measurement instant key format (minute precision, no seconds).
pub const INSTANT_KEY_FORMAT: &str = "%Y%m%d%H%M";

/// Birth date format in the innerscan response.
pub const BIRTH_DATE_FORMAT: &str = "%Y%m%d";

/// Format a request window bound as `YYYYMMDDhhmmss`.
pub fn format_window_bound(at: NaiveDateTime) -> String {
    at.format(WINDOW_FORMAT).to_string()
}

/// Parse a measurement instant key (`YYYYMMDDhhmm`).
///
/// The key must be exactly twelve digits; chrono alone would also accept
/// unpadded fields, which would break key ordering.
pub fn parse_instant_key(key: &str) -> Option<NaiveDateTime> {
    if key.len() != 12 || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(key, INSTANT_KEY_FORMAT).ok()
}

/// Parse a birth date (`YYYYMMDD`).
pub fn parse_birth_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, BIRTH_DATE_FORMAT).ok()
}

/// Current time as unix seconds.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_window_bound() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(format_window_bound(at), "20240501235959");
    }

    #[test]
    fn test_parse_instant_key() {
        let at = parse_instant_key("202405010805").unwrap();
        assert_eq!(at.format("%Y-%m-%d %H:%M").to_string(), "2024-05-01 08:05");
    }

    #[test]
    fn test_parse_instant_key_rejects_bad_input() {
        assert!(parse_instant_key("2024050108").is_none());
        assert!(parse_instant_key("20240501080500").is_none());
        assert!(parse_instant_key("2024-05-0108").is_none());
        assert!(parse_instant_key("202413010800").is_none());
        assert!(parse_instant_key("").is_none());
    }

    #[test]
    fn test_parse_birth_date() {
        assert_eq!(
            parse_birth_date("19850412"),
            NaiveDate::from_ymd_opt(1985, 4, 12)
        );
        assert!(parse_birth_date("1985-04-12").is_none());
    }
}
