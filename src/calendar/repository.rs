pub mod ddb_calendar_repository;
pub mod memory_calendar_repository;

use async_trait::async_trait;
use chrono::NaiveDate;
use crate::calendar::domain::model::OpeningDayEntity;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;

#[async_trait]
pub trait CalendarRepository : Repository<OpeningDayEntity> {
    // opening days of a service point between `from` and `to` inclusive, ordered by date
    async fn find_by_service_point(&self, service_point_id: &str,
                                   from: NaiveDate, to: NaiveDate) -> LibraryResult<Vec<OpeningDayEntity>>;
}
