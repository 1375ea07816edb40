// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Date window for measurement requests.

use crate::error::{AppError, Result};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Longest span the remote service accepts in one request.
pub const MAX_WINDOW_DAYS: u64 = 90;

/// Inclusive `[from, to]` day range, at most [`MAX_WINDOW_DAYS`] apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateWindow {
    /// Validate and build a window.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(AppError::BadRequest(format!(
                "from date {} is after to date {}",
                from, to
            )));
        }
        let span = (to - from).num_days();
        if span > MAX_WINDOW_DAYS as i64 {
            return Err(AppError::BadRequest(format!(
                "date range of {} days exceeds {} days",
                span, MAX_WINDOW_DAYS
            )));
        }
        Ok(Self { from, to })
    }

    /// Window ending at `to` with an optional explicit start.
    ///
    /// Without `from`, the window reaches back the full [`MAX_WINDOW_DAYS`].
    pub fn ending_at(to: NaiveDate, from: Option<NaiveDate>) -> Result<Self> {
        let from = match from {
            Some(f) => f,
            None => to.checked_sub_days(Days::new(MAX_WINDOW_DAYS)).ok_or_else(|| {
                AppError::BadRequest(format!("cannot compute window start before {}", to))
            })?,
        };
        Self::new(from, to)
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Start of the first day.
    pub fn start(&self) -> NaiveDateTime {
        self.from.and_time(NaiveTime::MIN)
    }

    /// Last second of the final day, so `to` is inclusive.
    pub fn end(&self) -> NaiveDateTime {
        self.to.and_hms_opt(23, 59, 59).unwrap_or_else(|| self.to.and_time(NaiveTime::MIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_bounds() {
        let w = DateWindow::new(day(2024, 5, 1), day(2024, 5, 31)).unwrap();
        assert_eq!(w.start().to_string(), "2024-05-01 00:00:00");
        assert_eq!(w.end().to_string(), "2024-05-31 23:59:59");
    }

    #[test]
    fn test_ninety_days_allowed() {
        let to = day(2024, 6, 30);
        let w = DateWindow::ending_at(to, None).unwrap();
        assert_eq!((w.to() - w.from()).num_days(), 90);
    }

    #[test]
    fn test_over_ninety_days_rejected() {
        let err = DateWindow::new(day(2024, 1, 1), day(2024, 4, 1)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_reversed_window_rejected() {
        let err = DateWindow::new(day(2024, 5, 2), day(2024, 5, 1)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_single_day_window() {
        let w = DateWindow::new(day(2024, 5, 1), day(2024, 5, 1)).unwrap();
        assert_eq!(w.from(), w.to());
    }
}
