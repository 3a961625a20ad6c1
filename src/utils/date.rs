use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use crate::core::library::{LibraryError, LibraryResult};

pub const DATE_FMT: &str = "%Y-%m-%d";
pub const TIME_FMT: &str = "%H:%M";

// last representable second of a calendar day for due dates that move to "end of day"
pub fn end_of_day_time() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

pub fn parse_date(str_date: &str) -> LibraryResult<NaiveDate> {
    NaiveDate::parse_from_str(str_date, DATE_FMT).map_err(|err| LibraryError::validation(
        format!("invalid date {} {}", str_date, err).as_str(), Some("400".to_string())))
}

pub fn format_date(date: NaiveDate) -> String {
    format!("{}", date.format(DATE_FMT))
}

// Parses opening-hour times. Calendars express the closing midnight as "24:00", which is
// returned as 00:00 and read as the following midnight by the timetable builder.
pub fn parse_time(str_time: &str) -> LibraryResult<NaiveTime> {
    let trimmed = str_time.trim();
    if trimmed == "24:00" || trimmed == "24:00:00" {
        return Ok(NaiveTime::MIN);
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, TIME_FMT))
        .map_err(|err| LibraryError::validation(
            format!("invalid time {} {}", str_time, err).as_str(), Some("400".to_string())))
}

pub fn format_time(time: NaiveTime) -> String {
    format!("{}", time.format("%H:%M:%S"))
}

// Anchors a local date and time to an instant in the given zone. Ambiguous local times
// (clocks going back) take the earliest instant, skipped local times (clocks going
// forward) move one hour later.
pub fn to_instant(zone: &Tz, date: NaiveDate, time: NaiveTime) -> LibraryResult<DateTime<Utc>> {
    let local = NaiveDateTime::new(date, time);
    match zone.from_local_datetime(&local) {
        LocalResult::Single(t) => Ok(t.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => zone.from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .ok_or_else(|| LibraryError::validation(
                format!("local time {} does not exist in {}", local, zone).as_str(), None)),
    }
}

pub fn local_date(zone: &Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(zone).date_naive()
}

pub fn local_time(zone: &Tz, instant: DateTime<Utc>) -> NaiveTime {
    instant.with_timezone(zone).time()
}

// end of the calendar day of `date` in the zone, normalized to UTC
pub fn end_of_day(zone: &Tz, date: NaiveDate) -> LibraryResult<DateTime<Utc>> {
    to_instant(zone, date, end_of_day_time())
}

pub mod time_serializer {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::{format_time, parse_time};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        format_time(*time).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let str_time: String = Deserialize::deserialize(deserializer)?;
        parse_time(str_time.as_str()).map_err(D::Error::custom)
    }
}
