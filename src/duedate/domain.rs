use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::core::library::LibraryResult;
use crate::duedate::domain::policy::PolicyDueDateConfig;
use crate::duedate::dto::{DueDateDto, DueDateRequest};

pub mod adjustment;
pub mod interval;
pub mod policy;
pub mod service;
pub mod strategy;
pub mod timetable;

#[async_trait]
pub trait DueDateService: Sync + Send {
    async fn adjust_due_date(&self, req: &DueDateRequest) -> LibraryResult<DueDateDto>;
    // due date of a loan cut short at `start`, the end of the open hours before it
    async fn truncate_due_date(&self, service_point_id: &str, policy: &PolicyDueDateConfig,
                               start: DateTime<Utc>) -> LibraryResult<DueDateDto>;
}
