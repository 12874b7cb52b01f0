//! Calendar month used to slice the membership ledger.

use chrono::{DateTime, TimeZone, Utc};

/// Earliest accepted year; timestamps before the Unix epoch are never recorded.
pub const MIN_YEAR: i32 = 1970;
/// Latest accepted year.
pub const MAX_YEAR: i32 = 9999;

/// Raised when a year/month pair does not name a supported calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HistoryPeriodError {
    #[error("invalid dates")]
    InvalidDates,
}

/// Validated calendar month with precomputed UTC bounds.
///
/// # Examples
/// ```
/// use user_segmentation::domain::HistoryPeriod;
///
/// let period = HistoryPeriod::new(2023, 12).expect("valid month");
/// let (start, end) = period.bounds();
/// assert_eq!(start.to_rfc3339(), "2023-12-01T00:00:00+00:00");
/// assert_eq!(end.to_rfc3339(), "2024-01-01T00:00:00+00:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPeriod {
    year: i32,
    month: u32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl HistoryPeriod {
    /// Validate the pair and compute `[first instant, first instant of next month)`.
    pub fn new(year: i32, month: i32) -> Result<Self, HistoryPeriodError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(HistoryPeriodError::InvalidDates);
        }
        let month = u32::try_from(month)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or(HistoryPeriodError::InvalidDates)?;

        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let start = month_start(year, month)?;
        let end = month_start(next_year, next_month)?;

        Ok(Self {
            year,
            month,
            start,
            end,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Half-open UTC interval covered by this month.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    /// Whether `instant` falls inside the month.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>, HistoryPeriodError> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or(HistoryPeriodError::InvalidDates)
}
