//! Sub-day UTC query windows.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// One slot of the fixed daily schedule, identified by its hour labels.
///
/// The slot covers `[start_hour:00, end_hour:00)`, except for the slot that
/// closes the day which runs through `23:59:59.999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bucket {
    /// First hour covered.
    pub start_hour: u32,
    /// Hour label of the upper bound (`23` for the closing slot).
    pub end_hour: u32,
}

impl Bucket {
    /// The three daily slots, in order.
    pub const SCHEDULE: [Self; 3] = [
        Self::new(0, 8),
        Self::new(8, 16),
        Self::new(16, 23),
    ];

    /// Construct a slot from its hour labels.
    #[must_use]
    pub const fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// Whether this slot runs to the end of the calendar day.
    #[must_use]
    pub const fn closes_day(self) -> bool {
        self.end_hour >= 23
    }
}

/// Inclusive range of epoch seconds used for the registry query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpochRange {
    /// First second included.
    pub start: i64,
    /// Last second included.
    pub end: i64,
}

impl EpochRange {
    /// Whether `ts` (epoch seconds) falls inside the range.
    #[must_use]
    pub const fn contains(&self, ts: i64) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// A `(day, bucket)` pair defining one query range and one output artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    /// UTC calendar day.
    pub day: NaiveDate,
    /// Slot within the day.
    pub bucket: Bucket,
}

impl Window {
    /// Construct a window.
    #[must_use]
    pub const fn new(day: NaiveDate, bucket: Bucket) -> Self {
        Self { day, bucket }
    }

    /// Hour label of the lower bound.
    #[must_use]
    pub const fn start_hour(&self) -> u32 {
        self.bucket.start_hour
    }

    /// Hour label of the upper bound.
    #[must_use]
    pub const fn end_hour(&self) -> u32 {
        self.bucket.end_hour
    }

    fn midnight(&self) -> DateTime<Utc> {
        self.day.and_time(NaiveTime::MIN).and_utc()
    }

    /// First instant covered by the window.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.midnight() + TimeDelta::hours(i64::from(self.bucket.start_hour))
    }

    /// Last instant covered by the window (millisecond precision, inclusive).
    #[must_use]
    pub fn end_inclusive(&self) -> DateTime<Utc> {
        let upper = if self.bucket.closes_day() {
            self.midnight() + TimeDelta::days(1)
        } else {
            self.midnight() + TimeDelta::hours(i64::from(self.bucket.end_hour))
        };
        upper - TimeDelta::milliseconds(1)
    }

    /// The window as floored epoch seconds, both ends inclusive.
    #[must_use]
    pub fn epoch_range(&self) -> EpochRange {
        EpochRange {
            start: self.start().timestamp_millis().div_euclid(1000),
            end: self.end_inclusive().timestamp_millis().div_euclid(1000),
        }
    }

    /// The day rendered as `DDMMYYYY`.
    #[must_use]
    pub fn day_label(&self) -> String {
        self.day.format("%d%m%Y").to_string()
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}-{:02}",
            self.day.format("%d-%m-%Y"),
            self.bucket.start_hour,
            self.bucket.end_hour
        )
    }
}
