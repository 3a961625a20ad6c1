use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::duedate::domain::DueDateService;
use crate::duedate::dto::{DueDateDto, DueDateRequest};

pub(crate) struct AdjustDueDateCommand {
    due_date_service: Box<dyn DueDateService>,
}

impl AdjustDueDateCommand {
    pub(crate) fn new(due_date_service: Box<dyn DueDateService>) -> Self {
        Self {
            due_date_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdjustDueDateCommandRequest {
    #[serde(flatten)]
    due_date: DueDateRequest,
}

impl AdjustDueDateCommandRequest {
    pub fn new(due_date: DueDateRequest) -> Self {
        Self {
            due_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdjustDueDateCommandResponse {
    pub due_date: DueDateDto,
}

impl AdjustDueDateCommandResponse {
    pub fn new(due_date: DueDateDto) -> Self {
        Self {
            due_date,
        }
    }
}

#[async_trait]
impl Command<AdjustDueDateCommandRequest, AdjustDueDateCommandResponse> for AdjustDueDateCommand {
    async fn execute(&self, req: AdjustDueDateCommandRequest) -> Result<AdjustDueDateCommandResponse, CommandError> {
        self.due_date_service.adjust_due_date(&req.due_date)
            .await.map_err(CommandError::from).map(AdjustDueDateCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use chrono::{NaiveDate, TimeZone, Utc};
    use lazy_static::lazy_static;
    use crate::calendar::command::add_opening_day_cmd::{AddOpeningDayCommand, AddOpeningDayCommandRequest};
    use crate::calendar::dto::OpeningWindow;
    use crate::calendar::factory::create_calendar_service;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::library::{ABSENT_TIMETABLE_REASON, DueDateManagement, PeriodInterval};
    use crate::core::repository::RepositoryStore;
    use crate::duedate::command::adjust_due_date_cmd::{AdjustDueDateCommand, AdjustDueDateCommandRequest};
    use crate::duedate::domain::policy::{LoanPeriod, PolicyDueDateConfig};
    use crate::duedate::dto::DueDateRequest;
    use crate::duedate::factory::create_due_date_service;

    lazy_static! {
        static ref CALENDAR_CMD : AsyncOnce<AddOpeningDayCommand> = AsyncOnce::new(async {
                let svc = create_calendar_service(&Configuration::new("test"), RepositoryStore::InMemory).await;
                AddOpeningDayCommand::new(svc)
            });
        static ref SUT_CMD : AsyncOnce<AdjustDueDateCommand> = AsyncOnce::new(async {
                let svc = create_due_date_service(&Configuration::new("test"), RepositoryStore::InMemory).await;
                AdjustDueDateCommand::new(svc)
            });
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_should_run_adjust_due_date() {
        let calendar_cmd: &AddOpeningDayCommand = CALENDAR_CMD.get().await;
        let sut_cmd: &AdjustDueDateCommand = SUT_CMD.get().await;
        for window in [OpeningWindow::all_day(day(13)), OpeningWindow::closed(day(14)), OpeningWindow::all_day(day(15))] {
            let _ = calendar_cmd.execute(AddOpeningDayCommandRequest::new("adjust-cmd-sp", window))
                .await.expect("should add opening day");
        }
        let policy = PolicyDueDateConfig::new(DueDateManagement::MoveToTheEndOfThePreviousOpenDay,
                                              LoanPeriod::new(1, PeriodInterval::Days));
        let loan_date = Utc.with_ymd_and_hms(2025, 1, 13, 15, 0, 0).unwrap();
        let res = sut_cmd.execute(AdjustDueDateCommandRequest::new(DueDateRequest::new("adjust-cmd-sp", policy, loan_date)))
            .await.expect("should adjust due date");
        assert_eq!(Utc.with_ymd_and_hms(2025, 1, 13, 23, 59, 59).unwrap(), res.due_date.due_date);
    }

    #[tokio::test]
    async fn test_should_fail_adjust_due_date_without_calendar() {
        let sut_cmd: &AdjustDueDateCommand = SUT_CMD.get().await;
        let policy = PolicyDueDateConfig::new(DueDateManagement::MoveToTheEndOfTheNextOpenDay,
                                              LoanPeriod::new(1, PeriodInterval::Days));
        let loan_date = Utc.with_ymd_and_hms(2025, 2, 3, 15, 0, 0).unwrap();
        let res = sut_cmd.execute(AdjustDueDateCommandRequest::new(DueDateRequest::new("unknown-cmd-sp", policy, loan_date))).await;
        match res {
            Err(CommandError::Validation { reason_code, .. }) => {
                assert_eq!(Some(ABSENT_TIMETABLE_REASON.to_string()), reason_code);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
