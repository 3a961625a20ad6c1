use axum::{
    extract::State,
    response::Json,
};
use serde_json::{Value};
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::duedate::command::adjust_due_date_cmd::{AdjustDueDateCommand, AdjustDueDateCommandRequest, AdjustDueDateCommandResponse};
use crate::duedate::command::truncate_due_date_cmd::{TruncateDueDateCommand, TruncateDueDateCommandRequest, TruncateDueDateCommandResponse};
use crate::duedate::domain::DueDateService;
use crate::duedate::factory;

async fn build_service(state: AppState) -> Box<dyn DueDateService> {
    factory::create_due_date_service(&state.config, state.store).await
}

pub async fn adjust_due_date(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<AdjustDueDateCommandResponse>, ServerError> {
    let req: AdjustDueDateCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = AdjustDueDateCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn truncate_due_date(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<TruncateDueDateCommandResponse>, ServerError> {
    let req: TruncateDueDateCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = TruncateDueDateCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}
