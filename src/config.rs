// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from a YAML file with environment overrides.
//!
//! Secrets may live in the file or be injected through the environment
//! (optionally via a `.env` file) so the YAML can be committed without them.

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default OAuth scope requested during authorization.
pub const DEFAULT_SCOPE: &str = "innerscan,sphygmomanometer,pedometer,smug";

/// Default proactive refresh window, in days before expiry.
pub const DEFAULT_REFRESH_GRACE_DAYS: i64 = 7;

/// Upper bound on `refresh_grace_days`.
pub const MAX_REFRESH_GRACE_DAYS: i64 = 365;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// HealthPlanet base URL (e.g. `https://www.healthplanet.jp`)
    pub base_url: String,
    /// Where the credential is persisted
    pub token_file: PathBuf,
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// OAuth scope requested by `auth`
    pub scope: String,
    /// Refresh when the credential expires within this many days
    pub refresh_grace_days: i64,
    /// Offset used to derive calendar days from measurement instants
    pub utc_offset: FixedOffset,
}

/// On-disk shape of the YAML config file.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    url: Option<String>,
    token_file: Option<PathBuf>,
    client_id: Option<String>,
    client_secret: Option<String>,
    scope: Option<String>,
    refresh_grace_days: Option<i64>,
    utc_offset: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            token_file: PathBuf::from("token.json"),
            client_id: "test_client_id".to_string(),
            client_secret: "test_secret".to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            refresh_grace_days: DEFAULT_REFRESH_GRACE_DAYS,
            utc_offset: utc(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let path = path.as_ref();
        let yaml = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_with(&yaml, |k| env::var(k).ok())
    }

    /// Parse YAML content and apply overrides read through `get`.
    pub fn from_yaml_with<F>(yaml: &str, mut get: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let raw: RawConfig = if yaml.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?
        };

        let base_url = get("HEALTHPLANET_URL")
            .or(raw.url)
            .ok_or(ConfigError::Missing("url"))?;
        let token_file = get("HEALTHPLANET_TOKEN_FILE")
            .map(PathBuf::from)
            .or(raw.token_file)
            .ok_or(ConfigError::Missing("token_file"))?;
        let client_id = get("HEALTHPLANET_CLIENT_ID")
            .or(raw.client_id)
            .ok_or(ConfigError::Missing("client_id"))?;
        let client_secret = get("HEALTHPLANET_CLIENT_SECRET")
            .or(raw.client_secret)
            .map(|v| v.trim().to_string())
            .ok_or(ConfigError::Missing("client_secret"))?;

        let refresh_grace_days = raw
            .refresh_grace_days
            .unwrap_or(DEFAULT_REFRESH_GRACE_DAYS);
        if !(0..=MAX_REFRESH_GRACE_DAYS).contains(&refresh_grace_days) {
            return Err(ConfigError::Invalid(format!(
                "refresh_grace_days must be between 0 and {}, got {}",
                MAX_REFRESH_GRACE_DAYS, refresh_grace_days
            )));
        }

        let utc_offset = match raw.utc_offset {
            Some(s) => parse_utc_offset(&s)?,
            None => utc(),
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token_file,
            client_id,
            client_secret,
            scope: raw.scope.unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            refresh_grace_days,
            utc_offset,
        })
    }
}

/// Parse an offset such as `+09:00`, `-05:30` or `Z`.
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset, ConfigError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Ok(utc());
    }
    let invalid = || ConfigError::Invalid(format!("utc_offset {:?}: expected +HH:MM", s));

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 && rest.is_ascii() => rest.split_at(2),
        None => (rest, "0"),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration value: {0}")]
    Missing(&'static str),

    #[error("Failed to read config file: {0}")]
    Io(String),

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = "\
url: https://www.healthplanet.jp/
token_file: /var/lib/hp/token.json
client_id: yaml_id
client_secret: \" yaml_secret \"
";

    #[test]
    fn test_config_from_yaml() {
        let config = Config::from_yaml_with(YAML, |_| None).expect("Config should load");

        assert_eq!(config.base_url, "https://www.healthplanet.jp");
        assert_eq!(config.token_file, PathBuf::from("/var/lib/hp/token.json"));
        assert_eq!(config.client_id, "yaml_id");
        assert_eq!(config.client_secret, "yaml_secret");
        assert_eq!(config.scope, DEFAULT_SCOPE);
        assert_eq!(config.refresh_grace_days, 7);
        assert_eq!(config.utc_offset.local_minus_utc(), 0);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let get = |k: &str| match k {
            "HEALTHPLANET_CLIENT_ID" => Some("env_id".to_string()),
            "HEALTHPLANET_CLIENT_SECRET" => Some("env_secret".to_string()),
            _ => None,
        };
        let config = Config::from_yaml_with(YAML, get).expect("Config should load");

        assert_eq!(config.client_id, "env_id");
        assert_eq!(config.client_secret, "env_secret");
        assert_eq!(config.base_url, "https://www.healthplanet.jp");
    }

    #[test]
    fn test_missing_client_secret() {
        let yaml = "url: http://x\ntoken_file: t.json\nclient_id: id\n";
        let err = Config::from_yaml_with(yaml, |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("client_secret")));
    }

    #[test]
    fn test_empty_file_uses_env_only() {
        let get = |k: &str| match k {
            "HEALTHPLANET_URL" => Some("http://localhost:9000".to_string()),
            "HEALTHPLANET_TOKEN_FILE" => Some("tok.json".to_string()),
            "HEALTHPLANET_CLIENT_ID" => Some("id".to_string()),
            "HEALTHPLANET_CLIENT_SECRET" => Some("secret".to_string()),
            _ => None,
        };
        let config = Config::from_yaml_with("", get).expect("Config should load");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.token_file, PathBuf::from("tok.json"));
    }

    #[test]
    fn test_optional_fields() {
        let yaml = format!("{}scope: innerscan\nrefresh_grace_days: 3\nutc_offset: \"+09:00\"\n", YAML);
        let config = Config::from_yaml_with(&yaml, |_| None).expect("Config should load");
        assert_eq!(config.scope, "innerscan");
        assert_eq!(config.refresh_grace_days, 3);
        assert_eq!(config.utc_offset.local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_negative_grace_rejected() {
        let yaml = format!("{}refresh_grace_days: -1\n", YAML);
        let err = Config::from_yaml_with(&yaml, |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_oversized_grace_rejected() {
        let yaml = format!("{}refresh_grace_days: 200000000000\n", YAML);
        let err = Config::from_yaml_with(&yaml, |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let yaml = format!("{}refresh_grace_days: 366\n", YAML);
        assert!(Config::from_yaml_with(&yaml, |_| None).is_err());

        let yaml = format!("{}refresh_grace_days: 365\n", YAML);
        let config = Config::from_yaml_with(&yaml, |_| None).expect("Config should load");
        assert_eq!(config.refresh_grace_days, MAX_REFRESH_GRACE_DAYS);
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("-05:30").unwrap().local_minus_utc(), -(5 * 3600 + 1800));
        assert_eq!(parse_utc_offset("+0900").unwrap().local_minus_utc(), 9 * 3600);
        assert!(parse_utc_offset("tokyo").is_err());
        assert!(parse_utc_offset("+25:00").is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        let err = Config::from_yaml_with("url: [unterminated", |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
