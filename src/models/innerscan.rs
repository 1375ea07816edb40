// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Innerscan (body composition) models: wire payload and reconciled records.

use crate::error::{AppError, Result};
use crate::time_utils::{parse_birth_date, parse_instant_key};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Wire code for body weight samples.
pub const WEIGHT_TAG: &str = "6021";
/// Wire code for body fat percentage samples.
pub const BODY_FAT_TAG: &str = "6022";

/// Innerscan response from HealthPlanet (`/status/innerscan.json`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InnerscanResponse {
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub data: Vec<InnerscanDataResponse>,
}

/// One tagged sample as it appears on the wire.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InnerscanDataResponse {
    /// Instant key, `YYYYMMDDhhmm`
    pub date: String,
    /// Decimal value, empty when the device sent no reading
    #[serde(default)]
    pub keydata: String,
    pub tag: String,
    #[serde(default)]
    pub model: String,
}

/// Physical quantity a sample represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Weight,
    BodyFat,
}

impl Tag {
    /// Wire code for this tag.
    pub fn code(self) -> &'static str {
        match self {
            Tag::Weight => WEIGHT_TAG,
            Tag::BodyFat => BODY_FAT_TAG,
        }
    }
}

impl FromStr for Tag {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            WEIGHT_TAG => Ok(Tag::Weight),
            BODY_FAT_TAG => Ok(Tag::BodyFat),
            other => Err(AppError::UnknownTag(other.to_string())),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A decoded sample: typed tag, parsed instant, optional value.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    /// Raw instant key, used for grouping and ordering
    pub key: String,
    pub instant: NaiveDateTime,
    pub tag: Tag,
    /// `None` when the wire value was empty
    pub value: Option<f64>,
}

impl TryFrom<&InnerscanDataResponse> for RawSample {
    type Error = AppError;

    fn try_from(wire: &InnerscanDataResponse) -> Result<Self> {
        let instant = parse_instant_key(&wire.date)
            .ok_or_else(|| AppError::Parse(format!("invalid measurement date {:?}", wire.date)))?;
        let tag: Tag = wire.tag.parse()?;

        let value = if wire.keydata.is_empty() {
            None
        } else {
            let v = wire.keydata.parse::<f64>().map_err(|e| {
                AppError::Parse(format!(
                    "invalid value {:?} for tag {} at {}: {}",
                    wire.keydata, tag, wire.date, e
                ))
            })?;
            Some(v)
        };

        Ok(Self {
            key: wire.date.clone(),
            instant,
            tag,
            value,
        })
    }
}

/// Subject profile reported alongside the samples.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectProfile {
    pub birth_date: NaiveDate,
    pub height_cm: f64,
    pub sex: String,
}

impl SubjectProfile {
    /// Parse the profile fields of a response.
    pub fn from_response(response: &InnerscanResponse) -> Result<Self> {
        let height_cm = response
            .height
            .parse::<f64>()
            .map_err(|e| AppError::Parse(format!("invalid height {:?}: {}", response.height, e)))?;
        let birth_date = parse_birth_date(&response.birth_date).ok_or_else(|| {
            AppError::Parse(format!("invalid birth date {:?}", response.birth_date))
        })?;

        Ok(Self {
            birth_date,
            height_cm,
            sex: response.sex.clone(),
        })
    }
}

/// One validated body-composition measurement.
#[derive(Debug, Clone, PartialEq, Validate)]
#[validate(schema(function = "validate_measurement"))]
pub struct MeasurementRecord {
    /// Calendar day in the caller's time zone
    pub date: NaiveDate,
    /// Instant the day was derived from (minute precision)
    pub instant: NaiveDateTime,
    /// Kilograms
    #[validate(range(exclusive_min = 0.0))]
    pub weight: f64,
    /// Percent
    #[validate(range(min = 0.0, max = 100.0))]
    pub body_fat: f64,
    #[validate(range(min = 0.0))]
    pub bmi: f64,
}

fn validate_measurement(record: &MeasurementRecord) -> std::result::Result<(), ValidationError> {
    if record.instant == NaiveDateTime::default() {
        return Err(ValidationError::new("instant_not_set"));
    }
    if !(record.weight.is_finite() && record.body_fat.is_finite() && record.bmi.is_finite()) {
        return Err(ValidationError::new("not_finite"));
    }
    Ok(())
}

/// Reconciled fetch result.
#[derive(Debug, Clone, PartialEq)]
pub struct Innerscan {
    pub profile: SubjectProfile,
    /// One record per day, ascending by date
    pub records: Vec<MeasurementRecord>,
}
