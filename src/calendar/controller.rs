use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{Value};
use crate::calendar::command::add_opening_day_cmd::{AddOpeningDayCommand, AddOpeningDayCommandRequest, AddOpeningDayCommandResponse};
use crate::calendar::command::get_adjacent_windows_cmd::{GetAdjacentWindowsCommand, GetAdjacentWindowsCommandRequest, GetAdjacentWindowsCommandResponse};
use crate::calendar::command::remove_opening_day_cmd::{RemoveOpeningDayCommand, RemoveOpeningDayCommandRequest, RemoveOpeningDayCommandResponse};
use crate::calendar::domain::CalendarService;
use crate::calendar::dto::opening_day_id;
use crate::calendar::factory;
use crate::core::command::{Command, CommandError};
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::utils::date::parse_date;

async fn build_service(state: AppState) -> Box<dyn CalendarService> {
    factory::create_calendar_service(&state.config, state.store).await
}

pub async fn add_opening_day(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<AddOpeningDayCommandResponse>, ServerError> {
    let req: AddOpeningDayCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = AddOpeningDayCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn find_adjacent_windows(
    State(state): State<AppState>,
    Path((service_point_id, date)): Path<(String, String)>) -> Result<Json<GetAdjacentWindowsCommandResponse>, ServerError> {
    let date = parse_date(date.as_str()).map_err(CommandError::from)?;
    let req = GetAdjacentWindowsCommandRequest { service_point_id, date };
    let svc = build_service(state).await;
    let res = GetAdjacentWindowsCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn remove_opening_day(
    State(state): State<AppState>,
    Path((service_point_id, date)): Path<(String, String)>) -> Result<Json<RemoveOpeningDayCommandResponse>, ServerError> {
    let date = parse_date(date.as_str()).map_err(CommandError::from)?;
    let req = RemoveOpeningDayCommandRequest { opening_day_id: opening_day_id(service_point_id.as_str(), date) };
    let svc = build_service(state).await;
    let res = RemoveOpeningDayCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}
