use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;
use crate::calendar::dto::AdjacentOpeningWindows;
use crate::core::library::{DueDateManagement, LibraryResult};
use crate::duedate::domain::policy::PolicyDueDateConfig;
use crate::duedate::domain::strategy::AdjustmentStrategy;
use crate::utils::date::local_date;

/// DueDateAdjustmentService applies the closed-library policy of a loan policy and clamps
/// the result to the due-date limit of the policy.
pub struct DueDateAdjustmentService {
    policy: PolicyDueDateConfig,
    zone: Tz,
}

impl DueDateAdjustmentService {
    pub fn new(policy: &PolicyDueDateConfig, zone: Tz) -> Self {
        Self {
            policy: policy.clone(),
            zone,
        }
    }

    pub fn strategy(&self, current: DateTime<Utc>) -> AdjustmentStrategy {
        match self.policy.due_date_management {
            DueDateManagement::KeepTheCurrentDueDateTime => AdjustmentStrategy::KeepCurrentTimestamp,
            DueDateManagement::KeepTheCurrentDueDate => AdjustmentStrategy::KeepCurrentDate,
            DueDateManagement::MoveToTheEndOfThePreviousOpenDay => AdjustmentStrategy::EndOfPreviousOpenDay,
            DueDateManagement::MoveToTheEndOfTheNextOpenDay => AdjustmentStrategy::EndOfNextOpenDay,
            DueDateManagement::MoveToEndOfCurrentServicePointHours => AdjustmentStrategy::EndOfCurrentOpenHours { current },
            DueDateManagement::MoveToBeginningOfNextOpenServicePointHours => {
                AdjustmentStrategy::BeginningOfNextOpenHours { offset: self.policy.offset() }
            }
        }
    }

    fn backward_strategy(&self, current: DateTime<Utc>) -> AdjustmentStrategy {
        if self.policy.is_short_term() {
            AdjustmentStrategy::EndOfCurrentOpenHours { current }
        } else {
            AdjustmentStrategy::EndOfPreviousOpenDay
        }
    }

    pub fn compute_due_date(&self, initial_due_date: DateTime<Utc>, windows: &AdjacentOpeningWindows,
                            current: DateTime<Utc>, is_renewal: bool) -> LibraryResult<DateTime<Utc>> {
        self.compute_due_date_within(initial_due_date, windows, windows, current, is_renewal)
    }

    /// Like `compute_due_date` but clamps against `limit_windows`, the windows around the
    /// due-date limit, when the limit falls outside the days of `windows`.
    pub fn compute_due_date_within(&self, initial_due_date: DateTime<Utc>, windows: &AdjacentOpeningWindows,
                                   limit_windows: &AdjacentOpeningWindows,
                                   current: DateTime<Utc>, is_renewal: bool) -> LibraryResult<DateTime<Utc>> {
        let adjusted = self.strategy(current).adjust(initial_due_date, windows, &self.zone)?;
        let limit = match self.policy.due_date_limit(is_renewal) {
            Some(limit) => limit,
            None => return Ok(adjusted),
        };
        if local_date(&self.zone, adjusted) <= local_date(&self.zone, limit) {
            return Ok(adjusted);
        }
        let backward = self.backward_strategy(current);
        debug!("due date {} is past the limit {}, applying {:?}", adjusted, limit, backward);
        backward.adjust(limit, limit_windows, &self.zone)
    }

    pub fn truncate_due_date(&self, start: DateTime<Utc>, windows: &AdjacentOpeningWindows) -> LibraryResult<DateTime<Utc>> {
        AdjustmentStrategy::EndOfPreviousOpenHoursTruncate { start }.adjust(start, windows, &self.zone)
    }
}
