use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

pub const ABSENT_TIMETABLE_REASON: &str = "ABSENT_TIMETABLE";
pub const ABSENT_TIMETABLE_MESSAGE: &str = "Calendar timetable is absent for requested date";

#[derive(Debug)]
pub enum LibraryError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    AccessDenied {
        message: String,
        reason_code: Option<String>,
    },
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    // This is a retry-able error, which indicates that the store throttled or timed out the
    // request. The caller can retry with or without a backoff.
    CurrentlyUnavailable {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    // The opening windows handed to the due-date engine do not cover the timetable
    // region that an adjustment needs to inspect.
    AbsentTimetable {
        message: String,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn access_denied(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::AccessDenied { message: message.to_string(), reason_code }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn unavailable(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::CurrentlyUnavailable { message: message.to_string(), reason_code, retryable }
    }

    pub fn database_or_unavailable(message: &str, reason: Option<String>, retryable: bool) -> LibraryError {
        if retryable {
            LibraryError::unavailable(
                format!("ddb database unavailable error {:?} {:?}", message, reason).as_str(), reason, true)
        } else if let Some(ref reason_val) = reason {
            if reason_val.as_str().contains("404") {
                LibraryError::not_found(
                    format!("not found error {:?} {:?}", message, reason).as_str())
            } else if reason_val.as_str().contains("400") {
                LibraryError::access_denied(
                    format!("access-denied error {:?} {:?}", message, reason).as_str(), reason)
            } else {
                LibraryError::database(
                    format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
            }
        } else {
            LibraryError::database(
                format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
        }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn absent_timetable(detail: &str) -> LibraryError {
        LibraryError::AbsentTimetable { message: format!("{}: {}", ABSENT_TIMETABLE_MESSAGE, detail) }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Database { retryable, .. } => { *retryable }
            LibraryError::AccessDenied { .. } => { false }
            LibraryError::DuplicateKey { .. } => { false }
            LibraryError::NotFound { .. } => { false }
            LibraryError::CurrentlyUnavailable { retryable, .. } => { *retryable }
            LibraryError::Validation { .. } => { false }
            LibraryError::AbsentTimetable { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("serde io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<String> for LibraryError {
    fn from(err: String) -> Self {
        LibraryError::serialization(
            format!("serde parsing {:?}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Database { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::AccessDenied { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::DuplicateKey { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::AbsentTimetable { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

/// A specialized Result type for the circulation services.
pub type LibraryResult<T> = Result<T, LibraryError>;

// It defines abstraction for paginated result
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    // The page number or token
    pub page: Option<String>,
    // page size
    pub page_size: usize,
    // Next page if available
    pub next_page: Option<String>,
    // list of records
    pub records: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub(crate) fn new(page: Option<&str>, page_size: usize,
                      next_page: Option<String>, records: Vec<T>) -> Self {
        PaginatedResult {
            page: page.map(str::to_string),
            page_size,
            next_page,
            records,
        }
    }
}

// DueDateManagement is the closed-library policy of a loan policy, identified on the
// wire by `closedLibraryDueDateManagementId`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DueDateManagement {
    KeepTheCurrentDueDateTime,
    KeepTheCurrentDueDate,
    MoveToTheEndOfThePreviousOpenDay,
    MoveToTheEndOfTheNextOpenDay,
    MoveToEndOfCurrentServicePointHours,
    MoveToBeginningOfNextOpenServicePointHours,
}

impl From<String> for DueDateManagement {
    fn from(s: String) -> Self {
        match s.as_str() {
            "CURRENT_DUE_DATE_TIME" => DueDateManagement::KeepTheCurrentDueDateTime,
            "CURRENT_DUE_DATE" => DueDateManagement::KeepTheCurrentDueDate,
            "END_OF_THE_PREVIOUS_OPEN_DAY" => DueDateManagement::MoveToTheEndOfThePreviousOpenDay,
            "END_OF_THE_NEXT_OPEN_DAY" => DueDateManagement::MoveToTheEndOfTheNextOpenDay,
            "END_OF_THE_CURRENT_SERVICE_POINT_HOURS" => DueDateManagement::MoveToEndOfCurrentServicePointHours,
            "BEGINNING_OF_THE_NEXT_OPEN_SERVICE_POINT_HOURS" => DueDateManagement::MoveToBeginningOfNextOpenServicePointHours,
            _ => DueDateManagement::KeepTheCurrentDueDateTime,
        }
    }
}

impl From<DueDateManagement> for String {
    fn from(other: DueDateManagement) -> Self {
        other.to_string()
    }
}

impl Display for DueDateManagement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            DueDateManagement::KeepTheCurrentDueDateTime => write!(f, "CURRENT_DUE_DATE_TIME"),
            DueDateManagement::KeepTheCurrentDueDate => write!(f, "CURRENT_DUE_DATE"),
            DueDateManagement::MoveToTheEndOfThePreviousOpenDay => write!(f, "END_OF_THE_PREVIOUS_OPEN_DAY"),
            DueDateManagement::MoveToTheEndOfTheNextOpenDay => write!(f, "END_OF_THE_NEXT_OPEN_DAY"),
            DueDateManagement::MoveToEndOfCurrentServicePointHours => write!(f, "END_OF_THE_CURRENT_SERVICE_POINT_HOURS"),
            DueDateManagement::MoveToBeginningOfNextOpenServicePointHours => write!(f, "BEGINNING_OF_THE_NEXT_OPEN_SERVICE_POINT_HOURS"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PeriodInterval {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Incorrect,
}

impl PeriodInterval {
    // loans measured in hours or minutes are short-term loans
    pub fn is_short_term(&self) -> bool {
        matches!(self, PeriodInterval::Minutes | PeriodInterval::Hours)
    }
}

impl From<String> for PeriodInterval {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Minutes" => PeriodInterval::Minutes,
            "Hours" => PeriodInterval::Hours,
            "Days" => PeriodInterval::Days,
            "Weeks" => PeriodInterval::Weeks,
            "Months" => PeriodInterval::Months,
            _ => PeriodInterval::Incorrect,
        }
    }
}

impl From<PeriodInterval> for String {
    fn from(other: PeriodInterval) -> Self {
        other.to_string()
    }
}

impl Display for PeriodInterval {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            PeriodInterval::Minutes => write!(f, "Minutes"),
            PeriodInterval::Hours => write!(f, "Hours"),
            PeriodInterval::Days => write!(f, "Days"),
            PeriodInterval::Weeks => write!(f, "Weeks"),
            PeriodInterval::Months => write!(f, "Months"),
            PeriodInterval::Incorrect => write!(f, "Incorrect"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::{DueDateManagement, LibraryError, PeriodInterval};

    #[tokio::test]
    async fn test_should_create_database_error() {
        assert!(matches!(LibraryError::database("test", None, false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_not_found_error() {
        assert!(matches!(LibraryError::not_found("test"), LibraryError::NotFound{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_absent_timetable_error() {
        let err = LibraryError::absent_timetable("no previous interval");
        assert!(matches!(err, LibraryError::AbsentTimetable{ message: _ }));
        assert!(err.to_string().starts_with("Calendar timetable is absent for requested date"));
        assert!(!err.retryable());
    }

    #[tokio::test]
    async fn test_should_create_database_or_unavailable_error() {
        assert!(matches!(LibraryError::database_or_unavailable("test", None, true), LibraryError::CurrentlyUnavailable{ message: _, reason_code: _, retryable: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("404".to_string()), false), LibraryError::NotFound{ message: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("400".to_string()), false), LibraryError::AccessDenied{ message: _, reason_code: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("500".to_string()), false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", None, false), LibraryError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_retryable_error() {
        assert_eq!(false, LibraryError::database("test", None, false).retryable());
        assert_eq!(false, LibraryError::unavailable("test", None, false).retryable());
        assert_eq!(true, LibraryError::unavailable("test", None, true).retryable());
        assert_eq!(false, LibraryError::validation("test", None).retryable());
        assert_eq!(false, LibraryError::serialization("test").retryable());
    }

    #[tokio::test]
    async fn test_should_format_due_date_management() {
        let modes = vec![
            DueDateManagement::KeepTheCurrentDueDateTime,
            DueDateManagement::KeepTheCurrentDueDate,
            DueDateManagement::MoveToTheEndOfThePreviousOpenDay,
            DueDateManagement::MoveToTheEndOfTheNextOpenDay,
            DueDateManagement::MoveToEndOfCurrentServicePointHours,
            DueDateManagement::MoveToBeginningOfNextOpenServicePointHours,
        ];
        for mode in modes {
            assert_eq!(mode, DueDateManagement::from(mode.to_string()));
        }
    }

    #[tokio::test]
    async fn test_should_default_unknown_due_date_management() {
        assert_eq!(DueDateManagement::KeepTheCurrentDueDateTime, DueDateManagement::from("MOVE_SOMEWHERE".to_string()));
    }

    #[tokio::test]
    async fn test_should_detect_short_term_periods() {
        assert!(PeriodInterval::Minutes.is_short_term());
        assert!(PeriodInterval::Hours.is_short_term());
        assert!(!PeriodInterval::Days.is_short_term());
        assert!(!PeriodInterval::from("Fortnights".to_string()).is_short_term());
    }

    #[tokio::test]
    async fn test_should_deserialize_due_date_management() {
        let mode: DueDateManagement = serde_json::from_str("\"END_OF_THE_NEXT_OPEN_DAY\"").expect("should parse");
        assert_eq!(DueDateManagement::MoveToTheEndOfTheNextOpenDay, mode);
        let json = serde_json::to_string(&PeriodInterval::Hours).expect("should serialize");
        assert_eq!("\"Hours\"", json);
    }
}
