// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Measurement reconciliation.
//!
//! Turns the flat list of tagged samples into one validated record per day:
//! 1. Decode every sample (any bad sample aborts the whole batch)
//! 2. Merge samples sharing the exact same instant key
//! 3. Derive BMI from the subject height
//! 4. Drop records that fail validation
//! 5. Keep the latest surviving instant of each calendar day

use crate::error::Result;
use crate::models::{
    Innerscan, InnerscanResponse, MeasurementRecord, RawSample, SubjectProfile, Tag,
};
use chrono::{NaiveDate, NaiveDateTime, TimeZone};
use std::collections::BTreeMap;
use validator::Validate;

/// Reconcile a raw innerscan response into daily records.
///
/// Calendar days are computed by reading each instant key as UTC and
/// shifting it into `tz`.
pub fn reconcile<Tz: TimeZone>(response: &InnerscanResponse, tz: &Tz) -> Result<Innerscan> {
    let profile = SubjectProfile::from_response(response)?;

    let samples = response
        .data
        .iter()
        .map(RawSample::try_from)
        .collect::<Result<Vec<_>>>()?;

    let records = reconcile_samples(&samples, profile.height_cm, tz);

    tracing::debug!(
        samples = samples.len(),
        records = records.len(),
        "Reconciled innerscan samples"
    );

    Ok(Innerscan { profile, records })
}

/// Merge, validate and deduplicate already-decoded samples.
pub fn reconcile_samples<Tz: TimeZone>(
    samples: &[RawSample],
    height_cm: f64,
    tz: &Tz,
) -> Vec<MeasurementRecord> {
    let merged = merge_by_instant(samples, height_cm, tz);

    let valid = merged.into_iter().filter_map(|(key, record)| match record.validate() {
        Ok(()) => Some(record),
        Err(errors) => {
            tracing::warn!(
                instant = %key,
                weight = record.weight,
                body_fat = record.body_fat,
                errors = %errors,
                "Dropping invalid measurement"
            );
            None
        }
    });

    latest_per_day(valid)
}

/// Body mass index, or zero when either input is missing.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if weight_kg == 0.0 || height_cm == 0.0 {
        return 0.0;
    }
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Calendar day of `instant` (read as UTC) in `tz`.
pub fn day_in<Tz: TimeZone>(instant: NaiveDateTime, tz: &Tz) -> NaiveDate {
    tz.from_utc_datetime(&instant).date_naive()
}

/// Group samples by exact instant key. The map is ordered by key, which for
/// the fixed-width `YYYYMMDDhhmm` format is chronological order.
fn merge_by_instant<Tz: TimeZone>(
    samples: &[RawSample],
    height_cm: f64,
    tz: &Tz,
) -> BTreeMap<String, MeasurementRecord> {
    let mut merged: BTreeMap<String, MeasurementRecord> = BTreeMap::new();

    for sample in samples {
        let record = merged
            .entry(sample.key.clone())
            .or_insert_with(|| MeasurementRecord {
                date: day_in(sample.instant, tz),
                instant: sample.instant,
                weight: 0.0,
                body_fat: 0.0,
                bmi: 0.0,
            });

        // An empty value never clears a reading already set for this instant.
        let Some(value) = sample.value else {
            continue;
        };

        match sample.tag {
            Tag::Weight => {
                record.weight = value;
                if record.weight != 0.0 && height_cm != 0.0 {
                    record.bmi = bmi(record.weight, height_cm);
                }
            }
            Tag::BodyFat => record.body_fat = value,
        }
    }

    merged
}

/// Keep the last record of each day from records sorted by instant.
fn latest_per_day(records: impl Iterator<Item = MeasurementRecord>) -> Vec<MeasurementRecord> {
    let mut daily: Vec<MeasurementRecord> = Vec::new();
    for record in records {
        match daily.last_mut() {
            Some(last) if last.date == record.date => *last = record,
            _ => daily.push(record),
        }
    }
    daily
}
