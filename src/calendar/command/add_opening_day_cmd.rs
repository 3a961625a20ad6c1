use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::calendar::domain::CalendarService;
use crate::calendar::dto::{OpeningDayDto, OpeningWindow};
use crate::core::command::{Command, CommandError};

pub(crate) struct AddOpeningDayCommand {
    calendar_service: Box<dyn CalendarService>,
}

impl AddOpeningDayCommand {
    pub(crate) fn new(calendar_service: Box<dyn CalendarService>) -> Self {
        Self {
            calendar_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddOpeningDayCommandRequest {
    service_point_id: String,
    #[serde(flatten)]
    window: OpeningWindow,
}

impl AddOpeningDayCommandRequest {
    pub fn new(service_point_id: &str, window: OpeningWindow) -> Self {
        Self {
            service_point_id: service_point_id.to_string(),
            window,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddOpeningDayCommandResponse {
    pub opening_day: OpeningDayDto,
}

impl AddOpeningDayCommandResponse {
    pub fn new(opening_day: OpeningDayDto) -> Self {
        Self {
            opening_day,
        }
    }
}

#[async_trait]
impl Command<AddOpeningDayCommandRequest, AddOpeningDayCommandResponse> for AddOpeningDayCommand {
    async fn execute(&self, req: AddOpeningDayCommandRequest) -> Result<AddOpeningDayCommandResponse, CommandError> {
        let opening_day = OpeningDayDto::new(req.service_point_id.as_str(), req.window);
        self.calendar_service.add_opening_day(&opening_day)
            .await.map_err(CommandError::from).map(AddOpeningDayCommandResponse::new)
    }
}
