use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult};

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable : Sync + Send {
    fn id(&self) -> String;
    fn version(&self) -> i64;
}

// Configuration abstracts config options for the circulation services of a branch
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub branch_id: String,
    // IANA name of the zone the service points of the branch observe
    pub time_zone: String,
    pub calendar_table: String,
}

impl Configuration {
    pub fn new(branch_id: &str) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            time_zone: "UTC".to_string(),
            calendar_table: "opening_days".to_string(),
        }
    }

    pub fn with_time_zone(mut self, time_zone: &str) -> Self {
        self.time_zone = time_zone.to_string();
        self
    }

    pub fn zone(&self) -> LibraryResult<Tz> {
        self.time_zone.parse::<Tz>().map_err(|err| LibraryError::validation(
            format!("invalid time zone {} {}", self.time_zone, err).as_str(), Some("400".to_string())))
    }
}
