use chrono::{Days, NaiveDate};

use crate::error::{AppError, Result};

/// A validated recurrence: `start` up to (but excluding) `end`, stepping
/// `interval_days` calendar days at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
    interval_days: u64,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate, interval_days: i64) -> Result<Self> {
        if interval_days <= 0 {
            return Err(AppError::InvalidInterval(interval_days));
        }
        if start > end {
            return Err(AppError::InvertedRange { start, end });
        }
        Ok(Self {
            start,
            end,
            interval_days: interval_days as u64,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn interval_days(&self) -> u64 {
        self.interval_days
    }

    /// The start date is always the first element, even when it equals `end`.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let step = Days::new(self.interval_days);
        let mut dates = vec![self.start];
        let mut current = self.start;
        while let Some(next) = current.checked_add_days(step) {
            if next >= self.end {
                break;
            }
            dates.push(next);
            current = next;
        }
        dates
    }
}

pub fn generate_date_sequence(
    start: NaiveDate,
    end: NaiveDate,
    interval_days: i64,
) -> Result<Vec<NaiveDate>> {
    Ok(DateRange::new(start, end, interval_days)?.dates())
}

pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(value.to_string()))
}
