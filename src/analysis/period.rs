//! Inclusive date ranges

use crate::error::AnalyticsError;
use chrono::NaiveDate;
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive `[start, end]` date range
///
/// # Examples
///
/// ```
/// use traffic_audit::analysis::Period;
///
/// let period = Period::parse("2025-01-01", "2025-01-31")?;
/// assert_eq!(period.compact(), "2025010120250131");
/// assert_eq!(period.days(), 31);
/// # Ok::<(), traffic_audit::error::AnalyticsError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    /// First day
    pub start: NaiveDate,
    /// Last day, inclusive
    pub end: NaiveDate,
}

impl Period {
    /// Build a period, rejecting ranges that end before they start
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalyticsError> {
        if end < start {
            return Err(AnalyticsError::InvalidPeriod {
                start: start.format(DATE_FORMAT).to_string(),
                end: end.format(DATE_FORMAT).to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse `YYYY-MM-DD` boundaries
    pub fn parse(start: &str, end: &str) -> Result<Self, AnalyticsError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Start as `YYYY-MM-DD`
    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// End as `YYYY-MM-DD`
    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }

    /// Both boundaries with dashes stripped, e.g. `2025010120250131`
    pub fn compact(&self) -> String {
        format!(
            "{}{}",
            self.start.format("%Y%m%d"),
            self.end.format("%Y%m%d")
        )
    }

    /// Number of days covered
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_str(), self.end_str())
    }
}

/// Parse a single `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, AnalyticsError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| AnalyticsError::InvalidDate {
        value: value.to_string(),
    })
}
