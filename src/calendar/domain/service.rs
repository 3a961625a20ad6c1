use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use tracing::{debug, info};
use crate::calendar::domain::CalendarService;
use crate::calendar::domain::model::OpeningDayEntity;
use crate::calendar::dto::{opening_day_id, AdjacentOpeningWindows, OpeningDayDto, OpeningWindow};
use crate::calendar::repository::CalendarRepository;
use crate::core::library::{LibraryError, LibraryResult};

pub(crate) struct CalendarServiceImpl {
    calendar_repository: Box<dyn CalendarRepository>,
}

impl CalendarServiceImpl {
    pub(crate) fn new(calendar_repository: Box<dyn CalendarRepository>) -> Self {
        Self {
            calendar_repository,
        }
    }
}

#[async_trait]
impl CalendarService for CalendarServiceImpl {
    async fn add_opening_day(&self, day: &OpeningDayDto) -> LibraryResult<OpeningDayDto> {
        if day.service_point_id.is_empty() {
            return Err(LibraryError::validation("service point is required for opening day", Some("400".to_string())));
        }
        if day.window.open && !day.window.all_day && day.window.hours.is_empty() {
            return Err(LibraryError::validation(
                format!("open day {} without hours must be open all day", day.window.date).as_str(),
                Some("400".to_string())));
        }
        let mut entity = OpeningDayEntity::from(day);
        // ids are derived so that a date can only be stored once per service point
        entity.opening_day_id = opening_day_id(day.service_point_id.as_str(), day.window.date);
        if !entity.open {
            entity.all_day = false;
            entity.hours.clear();
        }
        entity.hours.sort_by_key(|h| h.start_time);
        self.calendar_repository.create(&entity).await?;
        info!("added opening day {}", entity.opening_day_id);
        Ok(OpeningDayDto::from(&entity))
    }

    async fn remove_opening_day(&self, id: &str) -> LibraryResult<()> {
        let _ = self.calendar_repository.get(id).await?;
        self.calendar_repository.delete(id).await.map(|_| ())
    }

    async fn find_opening_day(&self, id: &str) -> LibraryResult<OpeningDayDto> {
        self.calendar_repository.get(id).await.map(|e| OpeningDayDto::from(&e))
    }

    async fn find_adjacent_windows(&self, service_point_id: &str, date: NaiveDate) -> LibraryResult<AdjacentOpeningWindows> {
        let previous = date - Duration::days(1);
        let next = date + Duration::days(1);
        let days = self.calendar_repository.find_by_service_point(service_point_id, previous, next).await?;
        let window_of = |d: NaiveDate| {
            days.iter().find(|e| e.opening_date == d).map(OpeningWindow::from).unwrap_or_else(|| {
                debug!("no opening day stored for {} on {}, treating it as closed", service_point_id, d);
                OpeningWindow::closed(d)
            })
        };
        AdjacentOpeningWindows::new(window_of(previous), window_of(date), window_of(next))
    }
}

impl From<&OpeningDayEntity> for OpeningWindow {
    fn from(other: &OpeningDayEntity) -> OpeningWindow {
        OpeningWindow {
            date: other.opening_date,
            open: other.open,
            all_day: other.all_day,
            hours: other.hours.clone(),
        }
    }
}

impl From<&OpeningDayEntity> for OpeningDayDto {
    fn from(other: &OpeningDayEntity) -> OpeningDayDto {
        OpeningDayDto {
            opening_day_id: other.opening_day_id.to_string(),
            version: other.version,
            service_point_id: other.service_point_id.to_string(),
            window: OpeningWindow::from(other),
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&OpeningDayDto> for OpeningDayEntity {
    fn from(other: &OpeningDayDto) -> OpeningDayEntity {
        OpeningDayEntity {
            opening_day_id: other.opening_day_id.to_string(),
            version: other.version,
            service_point_id: other.service_point_id.to_string(),
            opening_date: other.window.date,
            open: other.window.open,
            all_day: other.window.all_day,
            hours: other.window.hours.clone(),
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use crate::calendar::domain::CalendarService;
    use crate::calendar::domain::service::CalendarServiceImpl;
    use crate::calendar::dto::{OpeningDayDto, OpeningHours, OpeningWindow};
    use crate::calendar::repository::memory_calendar_repository::MemoryCalendarRepository;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    fn hours(start: u32, end: u32) -> OpeningHours {
        OpeningHours::new(NaiveTime::from_hms_opt(start, 0, 0).unwrap(), NaiveTime::from_hms_opt(end, 0, 0).unwrap())
    }

    fn build_service() -> CalendarServiceImpl {
        CalendarServiceImpl::new(Box::new(MemoryCalendarRepository::isolated()))
    }

    #[tokio::test]
    async fn test_should_add_find_remove_opening_day() {
        let svc = build_service();
        let added = svc.add_opening_day(&OpeningDayDto::new(
            "sp1", OpeningWindow::with_hours(day(5), vec![hours(13, 17), hours(9, 12)]))).await.expect("should add day");
        assert_eq!("sp1:2024-08-05", added.opening_day_id.as_str());
        assert_eq!(hours(9, 12), added.window.hours[0]);

        let loaded = svc.find_opening_day(added.opening_day_id.as_str()).await.expect("should find day");
        assert_eq!(added.window, loaded.window);

        svc.remove_opening_day(added.opening_day_id.as_str()).await.expect("should remove day");
        assert!(svc.find_opening_day(added.opening_day_id.as_str()).await.is_err());
        assert!(svc.remove_opening_day(added.opening_day_id.as_str()).await.is_err());
    }

    #[tokio::test]
    async fn test_should_not_add_same_day_twice() {
        let svc = build_service();
        svc.add_opening_day(&OpeningDayDto::new("sp1", OpeningWindow::all_day(day(6)))).await.expect("should add day");
        assert!(svc.add_opening_day(&OpeningDayDto::new("sp1", OpeningWindow::closed(day(6)))).await.is_err());
    }

    #[tokio::test]
    async fn test_should_reject_open_day_without_hours() {
        let svc = build_service();
        let mut window = OpeningWindow::closed(day(7));
        window.open = true;
        assert!(svc.add_opening_day(&OpeningDayDto::new("sp1", window)).await.is_err());
    }

    #[tokio::test]
    async fn test_should_drop_hours_of_closed_day() {
        let svc = build_service();
        let mut window = OpeningWindow::with_hours(day(8), vec![hours(9, 17)]);
        window.open = false;
        let added = svc.add_opening_day(&OpeningDayDto::new("sp1", window)).await.expect("should add day");
        assert!(added.window.hours.is_empty());
    }

    #[tokio::test]
    async fn test_should_find_adjacent_windows_with_missing_days_closed() {
        let svc = build_service();
        svc.add_opening_day(&OpeningDayDto::new(
            "sp2", OpeningWindow::with_hours(day(11), vec![hours(9, 17)]))).await.expect("should add day");
        svc.add_opening_day(&OpeningDayDto::new("sp2", OpeningWindow::all_day(day(12)))).await.expect("should add day");
        // a different service point on the same date is not visible
        svc.add_opening_day(&OpeningDayDto::new("other", OpeningWindow::all_day(day(10)))).await.expect("should add day");

        let windows = svc.find_adjacent_windows("sp2", day(11)).await.expect("should find windows");
        assert_eq!(OpeningWindow::closed(day(10)), *windows.previous());
        assert_eq!(vec![hours(9, 17)], windows.requested().hours);
        assert!(windows.next().all_day);
    }
}
