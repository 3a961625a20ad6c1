use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;
use crate::calendar::domain::CalendarService;
use crate::core::domain::Configuration;
use crate::core::library::{DueDateManagement, LibraryResult};
use crate::duedate::domain::DueDateService;
use crate::duedate::domain::adjustment::DueDateAdjustmentService;
use crate::duedate::domain::policy::PolicyDueDateConfig;
use crate::duedate::dto::{DueDateDto, DueDateRequest};
use crate::utils::date::local_date;

pub(crate) struct DueDateServiceImpl {
    config: Configuration,
    calendar_service: Box<dyn CalendarService>,
}

impl DueDateServiceImpl {
    pub(crate) fn new(config: &Configuration, calendar_service: Box<dyn CalendarService>) -> Self {
        Self {
            config: config.clone(),
            calendar_service,
        }
    }
}

#[async_trait]
impl DueDateService for DueDateServiceImpl {
    async fn adjust_due_date(&self, req: &DueDateRequest) -> LibraryResult<DueDateDto> {
        let zone = self.config.zone()?;
        let initial_due_date = match req.initial_due_date {
            Some(initial) => initial,
            None => req.policy.loan_period.add_to(req.loan_date)?,
        };
        let service_point_id = req.service_point_id.as_str();
        let windows = self.calendar_service.find_adjacent_windows(
            service_point_id, local_date(&zone, initial_due_date)).await?;
        let svc = DueDateAdjustmentService::new(&req.policy, zone);

        let due_date = match req.policy.due_date_limit(req.is_renewal) {
            Some(limit) if windows.window_on(local_date(&zone, limit)).is_none() => {
                let limit_windows = self.calendar_service.find_adjacent_windows(
                    service_point_id, local_date(&zone, limit)).await?;
                svc.compute_due_date_within(initial_due_date, &windows, &limit_windows, req.loan_date, req.is_renewal)?
            }
            _ => svc.compute_due_date(initial_due_date, &windows, req.loan_date, req.is_renewal)?,
        };
        info!("due date of loan at {} moved from {} to {} by {}",
              service_point_id, initial_due_date, due_date, req.policy.due_date_management);
        Ok(DueDateDto::new(service_point_id, initial_due_date, due_date,
                           req.policy.due_date_management, self.config.time_zone.as_str()))
    }

    async fn truncate_due_date(&self, service_point_id: &str, policy: &PolicyDueDateConfig,
                               start: DateTime<Utc>) -> LibraryResult<DueDateDto> {
        let zone = self.config.zone()?;
        let windows = self.calendar_service.find_adjacent_windows(
            service_point_id, local_date(&zone, start)).await?;
        let due_date = DueDateAdjustmentService::new(policy, zone).truncate_due_date(start, &windows)?;
        Ok(DueDateDto::new(service_point_id, start, due_date,
                           DueDateManagement::KeepTheCurrentDueDateTime, self.config.time_zone.as_str()))
    }
}
