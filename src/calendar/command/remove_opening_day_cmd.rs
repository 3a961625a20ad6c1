use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::calendar::domain::CalendarService;
use crate::core::command::{Command, CommandError};

pub(crate) struct RemoveOpeningDayCommand {
    calendar_service: Box<dyn CalendarService>,
}

impl RemoveOpeningDayCommand {
    pub(crate) fn new(calendar_service: Box<dyn CalendarService>) -> Self {
        Self {
            calendar_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoveOpeningDayCommandRequest {
    pub(crate) opening_day_id: String,
}

impl RemoveOpeningDayCommandRequest {
    pub fn new(opening_day_id: &str) -> Self {
        Self {
            opening_day_id: opening_day_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RemoveOpeningDayCommandResponse {}

impl RemoveOpeningDayCommandResponse {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Command<RemoveOpeningDayCommandRequest, RemoveOpeningDayCommandResponse> for RemoveOpeningDayCommand {
    async fn execute(&self, req: RemoveOpeningDayCommandRequest) -> Result<RemoveOpeningDayCommandResponse, CommandError> {
        self.calendar_service.remove_opening_day(req.opening_day_id.as_str()).await
            .map_err(CommandError::from).map(|_| RemoveOpeningDayCommandResponse::new())
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use chrono::NaiveDate;
    use lazy_static::lazy_static;
    use crate::calendar::command::add_opening_day_cmd::{AddOpeningDayCommand, AddOpeningDayCommandRequest};
    use crate::calendar::command::remove_opening_day_cmd::{RemoveOpeningDayCommand, RemoveOpeningDayCommandRequest};
    use crate::calendar::dto::OpeningWindow;
    use crate::calendar::factory::create_calendar_service;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    lazy_static! {
        static ref ADD_CMD : AsyncOnce<AddOpeningDayCommand> = AsyncOnce::new(async {
                let svc = create_calendar_service(&Configuration::new("test"), RepositoryStore::InMemory).await;
                AddOpeningDayCommand::new(svc)
            });
        static ref SUT_CMD : AsyncOnce<RemoveOpeningDayCommand> = AsyncOnce::new(async {
                let svc = create_calendar_service(&Configuration::new("test"), RepositoryStore::InMemory).await;
                RemoveOpeningDayCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_remove_opening_day() {
        let add_cmd: &AddOpeningDayCommand = ADD_CMD.get().await;
        let sut_cmd: &RemoveOpeningDayCommand = SUT_CMD.get().await;
        let date = NaiveDate::from_ymd_opt(2024, 9, 20).unwrap();
        let added = add_cmd.execute(AddOpeningDayCommandRequest::new("remove-cmd-sp", OpeningWindow::all_day(date)))
            .await.expect("should add opening day");

        let id = added.opening_day.opening_day_id.as_str();
        let _ = sut_cmd.execute(RemoveOpeningDayCommandRequest::new(id)).await.expect("should remove opening day");
        let res = sut_cmd.execute(RemoveOpeningDayCommandRequest::new(id)).await;
        assert!(matches!(res, Err(CommandError::NotFound { .. })));
    }
}
