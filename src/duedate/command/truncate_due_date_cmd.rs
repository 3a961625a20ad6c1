use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::duedate::domain::DueDateService;
use crate::duedate::domain::policy::PolicyDueDateConfig;
use crate::duedate::dto::DueDateDto;

pub(crate) struct TruncateDueDateCommand {
    due_date_service: Box<dyn DueDateService>,
}

impl TruncateDueDateCommand {
    pub(crate) fn new(due_date_service: Box<dyn DueDateService>) -> Self {
        Self {
            due_date_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TruncateDueDateCommandRequest {
    service_point_id: String,
    policy: PolicyDueDateConfig,
    start: DateTime<Utc>,
}

impl TruncateDueDateCommandRequest {
    pub fn new(service_point_id: &str, policy: PolicyDueDateConfig, start: DateTime<Utc>) -> Self {
        Self {
            service_point_id: service_point_id.to_string(),
            policy,
            start,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TruncateDueDateCommandResponse {
    pub due_date: DueDateDto,
}

impl TruncateDueDateCommandResponse {
    pub fn new(due_date: DueDateDto) -> Self {
        Self {
            due_date,
        }
    }
}

#[async_trait]
impl Command<TruncateDueDateCommandRequest, TruncateDueDateCommandResponse> for TruncateDueDateCommand {
    async fn execute(&self, req: TruncateDueDateCommandRequest) -> Result<TruncateDueDateCommandResponse, CommandError> {
        self.due_date_service.truncate_due_date(req.service_point_id.as_str(), &req.policy, req.start)
            .await.map_err(CommandError::from).map(TruncateDueDateCommandResponse::new)
    }
}
