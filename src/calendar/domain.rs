use async_trait::async_trait;
use chrono::NaiveDate;
use crate::calendar::dto::{AdjacentOpeningWindows, OpeningDayDto};
use crate::core::library::LibraryResult;

pub mod model;
pub mod service;

#[async_trait]
pub trait CalendarService: Sync + Send {
    async fn add_opening_day(&self, day: &OpeningDayDto) -> LibraryResult<OpeningDayDto>;
    async fn remove_opening_day(&self, id: &str) -> LibraryResult<()>;
    async fn find_opening_day(&self, id: &str) -> LibraryResult<OpeningDayDto>;
    // windows of the day before, the day of and the day after `date`
    async fn find_adjacent_windows(&self, service_point_id: &str, date: NaiveDate) -> LibraryResult<AdjacentOpeningWindows>;
}
