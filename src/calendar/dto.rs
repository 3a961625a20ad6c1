use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};
use crate::utils::date::{format_date, time_serializer};

// OpeningHours is one open sub-period of a day. An end time at or before the start time
// closes on the following calendar day.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(with = "time_serializer")]
    pub start_time: NaiveTime,
    #[serde(with = "time_serializer")]
    pub end_time: NaiveTime,
}

impl OpeningHours {
    pub fn new(start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    pub fn ends_next_day(&self) -> bool {
        self.end_time <= self.start_time
    }
}

// OpeningWindow describes when a service point is open on one calendar date.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct OpeningWindow {
    pub date: NaiveDate,
    pub open: bool,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub hours: Vec<OpeningHours>,
}

impl OpeningWindow {
    pub fn closed(date: NaiveDate) -> Self {
        Self {
            date,
            open: false,
            all_day: false,
            hours: vec![],
        }
    }

    pub fn all_day(date: NaiveDate) -> Self {
        Self {
            date,
            open: true,
            all_day: true,
            hours: vec![],
        }
    }

    pub fn with_hours(date: NaiveDate, hours: Vec<OpeningHours>) -> Self {
        let mut hours = hours;
        hours.sort_by_key(|h| h.start_time);
        Self {
            date,
            open: !hours.is_empty(),
            all_day: false,
            hours,
        }
    }

    // hours only count for windows that are open and not open all day
    pub fn effective_hours(&self) -> &[OpeningHours] {
        if self.open && !self.all_day {
            self.hours.as_slice()
        } else {
            &[]
        }
    }
}

/// The opening windows of the day before, the day of, and the day after the point in
/// time a due date is computed for.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct AdjacentOpeningWindows {
    previous: OpeningWindow,
    requested: OpeningWindow,
    next: OpeningWindow,
}

impl AdjacentOpeningWindows {
    pub fn new(previous: OpeningWindow, requested: OpeningWindow, next: OpeningWindow) -> LibraryResult<Self> {
        if previous.date + Duration::days(1) != requested.date || requested.date + Duration::days(1) != next.date {
            return Err(LibraryError::validation(
                format!("opening windows {}, {}, {} are not consecutive days",
                        previous.date, requested.date, next.date).as_str(), Some("400".to_string())));
        }
        Ok(Self {
            previous,
            requested,
            next,
        })
    }

    pub fn previous(&self) -> &OpeningWindow {
        &self.previous
    }

    pub fn requested(&self) -> &OpeningWindow {
        &self.requested
    }

    pub fn next(&self) -> &OpeningWindow {
        &self.next
    }

    pub fn windows(&self) -> [&OpeningWindow; 3] {
        [&self.previous, &self.requested, &self.next]
    }

    pub fn window_on(&self, date: NaiveDate) -> Option<&OpeningWindow> {
        self.windows().into_iter().find(|w| w.date == date)
    }
}

// OpeningDayDto is the stored opening window of a service point.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OpeningDayDto {
    pub opening_day_id: String,
    pub version: i64,
    pub service_point_id: String,
    #[serde(flatten)]
    pub window: OpeningWindow,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OpeningDayDto {
    pub fn new(service_point_id: &str, window: OpeningWindow) -> Self {
        Self {
            opening_day_id: opening_day_id(service_point_id, window.date),
            version: 0,
            service_point_id: service_point_id.to_string(),
            window,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

impl Identifiable for OpeningDayDto {
    fn id(&self) -> String {
        self.opening_day_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

pub(crate) fn opening_day_id(service_point_id: &str, date: NaiveDate) -> String {
    format!("{}:{}", service_point_id, format_date(date))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use crate::calendar::dto::{AdjacentOpeningWindows, OpeningDayDto, OpeningHours, OpeningWindow};
    use crate::core::domain::Identifiable;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_should_build_adjacent_windows() {
        let windows = AdjacentOpeningWindows::new(
            OpeningWindow::closed(day(1)), OpeningWindow::all_day(day(2)), OpeningWindow::closed(day(3)))
            .expect("should build windows");
        assert_eq!(day(2), windows.requested().date);
        assert!(windows.requested().all_day);
        assert!(!windows.next().open);
    }

    #[tokio::test]
    async fn test_should_find_window_on_date() {
        let windows = AdjacentOpeningWindows::new(
            OpeningWindow::closed(day(1)), OpeningWindow::all_day(day(2)), OpeningWindow::closed(day(3)))
            .expect("should build windows");
        assert_eq!(Some(windows.previous()), windows.window_on(day(1)));
        assert_eq!(Some(windows.next()), windows.window_on(day(3)));
        assert!(windows.window_on(day(4)).is_none());
    }

    #[tokio::test]
    async fn test_should_reject_non_consecutive_windows() {
        let res = AdjacentOpeningWindows::new(
            OpeningWindow::closed(day(1)), OpeningWindow::closed(day(3)), OpeningWindow::closed(day(4)));
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn test_should_ignore_hours_when_closed_or_all_day() {
        let mut window = OpeningWindow::with_hours(day(1), vec![OpeningHours::new(time(9), time(17))]);
        assert_eq!(1, window.effective_hours().len());
        window.open = false;
        assert!(window.effective_hours().is_empty());
        window.open = true;
        window.all_day = true;
        assert!(window.effective_hours().is_empty());
    }

    #[tokio::test]
    async fn test_should_sort_hours() {
        let window = OpeningWindow::with_hours(day(1), vec![
            OpeningHours::new(time(14), time(18)), OpeningHours::new(time(8), time(12))]);
        assert_eq!(time(8), window.hours[0].start_time);
        assert!(OpeningHours::new(time(22), NaiveTime::MIN).ends_next_day());
    }

    #[tokio::test]
    async fn test_should_deserialize_opening_day() {
        let json = r#"{"opening_day_id":"sp1:2024-05-01","version":0,"service_point_id":"sp1",
            "date":"2024-05-01","open":true,"all_day":false,
            "hours":[{"start_time":"22:00","end_time":"24:00"}],
            "created_at":"2024-04-01T00:00:00Z","updated_at":"2024-04-01T00:00:00Z"}"#;
        let dto: OpeningDayDto = serde_json::from_str(json).expect("should parse opening day");
        assert_eq!("sp1:2024-05-01", dto.id());
        assert_eq!(day(1), dto.window.date);
        assert_eq!(NaiveTime::MIN, dto.window.hours[0].end_time);
    }
}
