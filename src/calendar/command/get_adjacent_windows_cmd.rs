use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::calendar::domain::CalendarService;
use crate::calendar::dto::AdjacentOpeningWindows;
use crate::core::command::{Command, CommandError};

pub(crate) struct GetAdjacentWindowsCommand {
    calendar_service: Box<dyn CalendarService>,
}

impl GetAdjacentWindowsCommand {
    pub(crate) fn new(calendar_service: Box<dyn CalendarService>) -> Self {
        Self {
            calendar_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetAdjacentWindowsCommandRequest {
    pub(crate) service_point_id: String,
    pub(crate) date: NaiveDate,
}

impl GetAdjacentWindowsCommandRequest {
    pub fn new(service_point_id: &str, date: NaiveDate) -> Self {
        Self {
            service_point_id: service_point_id.to_string(),
            date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetAdjacentWindowsCommandResponse {
    pub windows: AdjacentOpeningWindows,
}

impl GetAdjacentWindowsCommandResponse {
    pub fn new(windows: AdjacentOpeningWindows) -> Self {
        Self {
            windows,
        }
    }
}

#[async_trait]
impl Command<GetAdjacentWindowsCommandRequest, GetAdjacentWindowsCommandResponse> for GetAdjacentWindowsCommand {
    async fn execute(&self, req: GetAdjacentWindowsCommandRequest) -> Result<GetAdjacentWindowsCommandResponse, CommandError> {
        self.calendar_service.find_adjacent_windows(req.service_point_id.as_str(), req.date)
            .await.map_err(CommandError::from).map(GetAdjacentWindowsCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use chrono::NaiveDate;
    use lazy_static::lazy_static;
    use crate::calendar::command::add_opening_day_cmd::{AddOpeningDayCommand, AddOpeningDayCommandRequest};
    use crate::calendar::command::get_adjacent_windows_cmd::{GetAdjacentWindowsCommand, GetAdjacentWindowsCommandRequest};
    use crate::calendar::dto::OpeningWindow;
    use crate::calendar::factory::create_calendar_service;
    use crate::core::command::Command;
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    lazy_static! {
        static ref ADD_CMD : AsyncOnce<AddOpeningDayCommand> = AsyncOnce::new(async {
                let svc = create_calendar_service(&Configuration::new("test"), RepositoryStore::InMemory).await;
                AddOpeningDayCommand::new(svc)
            });
        static ref SUT_CMD : AsyncOnce<GetAdjacentWindowsCommand> = AsyncOnce::new(async {
                let svc = create_calendar_service(&Configuration::new("test"), RepositoryStore::InMemory).await;
                GetAdjacentWindowsCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_get_adjacent_windows() {
        let add_cmd: &AddOpeningDayCommand = ADD_CMD.get().await;
        let sut_cmd: &GetAdjacentWindowsCommand = SUT_CMD.get().await;
        let date = NaiveDate::from_ymd_opt(2024, 9, 10).unwrap();
        let _ = add_cmd.execute(AddOpeningDayCommandRequest::new("windows-cmd-sp", OpeningWindow::all_day(date)))
            .await.expect("should add opening day");

        let res = sut_cmd.execute(GetAdjacentWindowsCommandRequest::new("windows-cmd-sp", date))
            .await.expect("should return windows");
        assert!(res.windows.requested().all_day);
        assert!(!res.windows.previous().open);
        assert!(!res.windows.next().open);
    }
}
