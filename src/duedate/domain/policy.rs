use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use crate::core::library::{DueDateManagement, LibraryError, LibraryResult, PeriodInterval};

// LoanPeriod is an amount of a period interval, e.g. 3 Weeks.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct LoanPeriod {
    pub duration: u32,
    pub interval: PeriodInterval,
}

impl LoanPeriod {
    pub fn new(duration: u32, interval: PeriodInterval) -> Self {
        Self {
            duration,
            interval,
        }
    }

    /// Rolling due date of a loan starting at `ts`. Months keep the day of month and
    /// clamp it to the end of shorter months.
    pub fn add_to(&self, ts: DateTime<Utc>) -> LibraryResult<DateTime<Utc>> {
        let duration = self.duration as i64;
        let due = match self.interval {
            PeriodInterval::Minutes => ts.checked_add_signed(Duration::minutes(duration)),
            PeriodInterval::Hours => ts.checked_add_signed(Duration::hours(duration)),
            PeriodInterval::Days => ts.checked_add_signed(Duration::days(duration)),
            PeriodInterval::Weeks => ts.checked_add_signed(Duration::weeks(duration)),
            PeriodInterval::Months => ts.checked_add_months(Months::new(self.duration)),
            PeriodInterval::Incorrect => None,
        };
        due.ok_or_else(|| LibraryError::validation(
            format!("cannot add loan period {} {} to {}", self.duration, self.interval, ts).as_str(),
            Some("400".to_string())))
    }

    // offsets into opening hours are only meaningful within a day
    pub fn as_offset(&self) -> Duration {
        match self.interval {
            PeriodInterval::Minutes => Duration::minutes(self.duration as i64),
            PeriodInterval::Hours => Duration::hours(self.duration as i64),
            _ => Duration::zero(),
        }
    }
}

/// PolicyDueDateConfig is the part of a loan policy that drives due-date adjustment.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PolicyDueDateConfig {
    pub due_date_management: DueDateManagement,
    pub loan_period: LoanPeriod,
    #[serde(default)]
    pub opening_time_offset: Option<LoanPeriod>,
    #[serde(default)]
    pub fixed_due_date_limit: Option<DateTime<Utc>>,
    #[serde(default)]
    pub alternate_renewal_due_date_limit: Option<DateTime<Utc>>,
}

impl PolicyDueDateConfig {
    pub fn new(due_date_management: DueDateManagement, loan_period: LoanPeriod) -> Self {
        Self {
            due_date_management,
            loan_period,
            opening_time_offset: None,
            fixed_due_date_limit: None,
            alternate_renewal_due_date_limit: None,
        }
    }

    pub fn with_opening_time_offset(mut self, offset: LoanPeriod) -> Self {
        self.opening_time_offset = Some(offset);
        self
    }

    pub fn with_fixed_due_date_limit(mut self, limit: DateTime<Utc>) -> Self {
        self.fixed_due_date_limit = Some(limit);
        self
    }

    pub fn with_alternate_renewal_due_date_limit(mut self, limit: DateTime<Utc>) -> Self {
        self.alternate_renewal_due_date_limit = Some(limit);
        self
    }

    pub fn is_short_term(&self) -> bool {
        self.loan_period.interval.is_short_term()
    }

    pub fn offset(&self) -> Duration {
        self.opening_time_offset.map(|o| o.as_offset()).unwrap_or_else(Duration::zero)
    }

    // renewals use their own schedule when one is configured
    pub fn due_date_limit(&self, is_renewal: bool) -> Option<DateTime<Utc>> {
        if is_renewal && self.alternate_renewal_due_date_limit.is_some() {
            return self.alternate_renewal_due_date_limit;
        }
        self.fixed_due_date_limit
    }
}
