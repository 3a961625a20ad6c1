use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use crate::calendar::dto::{opening_day_id, OpeningHours};
use crate::core::domain::Identifiable;

// OpeningDayEntity is the persisted opening window of one service point on one date.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OpeningDayEntity {
    pub opening_day_id: String,
    pub version: i64,
    pub service_point_id: String,
    pub opening_date: NaiveDate,
    pub open: bool,
    pub all_day: bool,
    pub hours: Vec<OpeningHours>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OpeningDayEntity {
    pub fn new(service_point_id: &str, opening_date: NaiveDate, open: bool, all_day: bool, hours: Vec<OpeningHours>) -> Self {
        Self {
            opening_day_id: opening_day_id(service_point_id, opening_date),
            version: 0,
            service_point_id: service_point_id.to_string(),
            opening_date,
            open,
            all_day,
            hours,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

impl Identifiable for OpeningDayEntity {
    fn id(&self) -> String {
        self.opening_day_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}
