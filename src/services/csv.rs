// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CSV rendering of reconciled measurements.
//!
//! The layout is the body-measurement import format: an optional `Body`
//! section title, then `Date,Weight,BMI,Fat` rows with six decimals.

use crate::error::{AppError, Result};
use crate::models::MeasurementRecord;
use chrono::NaiveDate;

/// Column header line.
pub const CSV_HEADER: &str = "Date,Weight,BMI,Fat";

/// Section title preceding the header in import files.
pub const SECTION_TITLE: &str = "Body";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render records as CSV text (header plus one line per record).
pub fn render(records: &[MeasurementRecord]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + records.len() * 40);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for r in records {
        out.push_str(&format!(
            "{},{:.6},{:.6},{:.6}\n",
            r.date.format(DATE_FORMAT),
            r.weight,
            r.bmi,
            r.body_fat
        ));
    }
    out
}

/// Render records preceded by the `Body` section title.
pub fn render_with_section(records: &[MeasurementRecord]) -> String {
    format!("{}\n{}", SECTION_TITLE, render(records))
}

/// One parsed CSV line.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub date: NaiveDate,
    pub weight: f64,
    pub bmi: f64,
    pub body_fat: f64,
}

/// Parse text produced by [`render`] or [`render_with_section`].
pub fn parse(text: &str) -> Result<Vec<CsvRow>> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let mut header = lines.next();
    if header == Some(SECTION_TITLE) {
        header = lines.next();
    }
    if header != Some(CSV_HEADER) {
        return Err(AppError::Parse(format!(
            "expected CSV header {:?}, found {:?}",
            CSV_HEADER, header
        )));
    }

    lines
        .enumerate()
        .map(|(i, line)| {
            parse_row(line).map_err(|msg| AppError::Parse(format!("CSV row {}: {}", i + 1, msg)))
        })
        .collect()
}

fn parse_row(line: &str) -> std::result::Result<CsvRow, String> {
    let fields: Vec<&str> = line.split(',').collect();
    let &[date, weight, bmi, body_fat] = fields.as_slice() else {
        return Err(format!("expected 4 fields, found {}", fields.len()));
    };

    let number = |s: &str| s.parse::<f64>().map_err(|e| format!("{:?}: {}", s, e));
    Ok(CsvRow {
        date: NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|e| format!("{:?}: {}", date, e))?,
        weight: number(weight)?,
        bmi: number(bmi)?,
        body_fat: number(body_fat)?,
    })
}
