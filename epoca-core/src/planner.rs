//! Expansion of a calendar date range into the fixed daily window schedule.

use std::iter::FusedIterator;

use chrono::NaiveDate;
use epoca_types::{Bucket, EpocaError, Window};

/// Accepted calendar date format (`DD-MM-YYYY`).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Parse a `DD-MM-YYYY` date, interpreted as a UTC calendar day.
///
/// # Errors
/// Returns `InvalidArg` if the string is not a valid date in that format.
pub fn parse_day(s: &str) -> Result<NaiveDate, EpocaError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|e| {
        EpocaError::InvalidArg(format!("invalid date '{s}' (expected DD-MM-YYYY): {e}"))
    })
}

/// An inclusive range of UTC days crossed with [`Bucket::SCHEDULE`].
///
/// The plan is a value: iterating it does not consume it, so the same plan can be
/// walked any number of times. A plan whose last day precedes its first day is
/// empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowPlan {
    first: NaiveDate,
    last: NaiveDate,
}

impl WindowPlan {
    /// Plan every window from `first` through `last`, both inclusive.
    #[must_use]
    pub const fn new(first: NaiveDate, last: NaiveDate) -> Self {
        Self { first, last }
    }

    /// Build a plan from two `DD-MM-YYYY` strings.
    ///
    /// # Errors
    /// Returns `InvalidArg` if either date fails to parse. A reversed range is not an error.
    pub fn parse(start: &str, end: &str) -> Result<Self, EpocaError> {
        Ok(Self::new(parse_day(start)?, parse_day(end)?))
    }

    /// First planned day.
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Last planned day.
    #[must_use]
    pub const fn last_day(&self) -> NaiveDate {
        self.last
    }

    /// Number of calendar days covered.
    #[must_use]
    pub fn days(&self) -> usize {
        let span = (self.last - self.first).num_days();
        usize::try_from(span).map_or(0, |d| d + 1)
    }

    /// Number of windows the plan yields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days().saturating_mul(Bucket::SCHEDULE.len())
    }

    /// Whether the plan yields no windows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lazily walk the windows in day-then-bucket order.
    #[must_use]
    pub fn iter(&self) -> Windows {
        Windows {
            day: self.first,
            slot: 0,
            remaining: self.len(),
        }
    }
}

impl IntoIterator for &WindowPlan {
    type Item = Window;
    type IntoIter = Windows;

    fn into_iter(self) -> Windows {
        self.iter()
    }
}

impl IntoIterator for WindowPlan {
    type Item = Window;
    type IntoIter = Windows;

    fn into_iter(self) -> Windows {
        self.iter()
    }
}

/// Iterator over the windows of a [`WindowPlan`].
#[derive(Debug, Clone)]
pub struct Windows {
    day: NaiveDate,
    slot: usize,
    remaining: usize,
}

impl Iterator for Windows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.remaining == 0 {
            return None;
        }
        let window = Window::new(self.day, Bucket::SCHEDULE[self.slot]);
        self.remaining -= 1;
        self.slot += 1;
        if self.slot == Bucket::SCHEDULE.len() {
            self.slot = 0;
            match self.day.succ_opt() {
                Some(next) => self.day = next,
                None => self.remaining = 0,
            }
        }
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Windows {}

impl FusedIterator for Windows {}
