use std::fmt;
use std::fmt::{Display, Formatter};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use crate::core::library::{LibraryError, LibraryResult};

/// Interval is the half-open range `[start, end)` of a timetable node.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> LibraryResult<Self> {
        if start >= end {
            return Err(LibraryError::validation(
                format!("interval start {} must be before end {}", start, end).as_str(), None));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    // true in either order so that callers need not sort the pair first
    pub fn abuts(&self, other: &Interval) -> bool {
        self.end == other.start || other.end == self.start
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The range strictly between two intervals that neither overlap nor abut.
    pub fn gap(&self, other: &Interval) -> Option<Interval> {
        if self.overlaps(other) || self.abuts(other) {
            return None;
        }
        let (first, second) = if self.start < other.start { (self, other) } else { (other, self) };
        Some(Interval { start: first.end, end: second.start })
    }

    /// The union of two intervals that overlap or abut.
    pub fn span(&self, other: &Interval) -> Option<Interval> {
        if !self.overlaps(other) && !self.abuts(other) {
            return None;
        }
        Some(Interval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        })
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
