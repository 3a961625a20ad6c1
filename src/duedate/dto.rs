use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::core::library::DueDateManagement;
use crate::duedate::domain::policy::PolicyDueDateConfig;

// DueDateRequest describes a loan, or a renewal, whose due date is computed for a service point.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DueDateRequest {
    pub service_point_id: String,
    pub policy: PolicyDueDateConfig,
    pub loan_date: DateTime<Utc>,
    // rolling due date of the loan period when absent
    #[serde(default)]
    pub initial_due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_renewal: bool,
}

impl DueDateRequest {
    pub fn new(service_point_id: &str, policy: PolicyDueDateConfig, loan_date: DateTime<Utc>) -> Self {
        Self {
            service_point_id: service_point_id.to_string(),
            policy,
            loan_date,
            initial_due_date: None,
            is_renewal: false,
        }
    }

    pub fn with_initial_due_date(mut self, initial_due_date: DateTime<Utc>) -> Self {
        self.initial_due_date = Some(initial_due_date);
        self
    }

    pub fn renewal(mut self) -> Self {
        self.is_renewal = true;
        self
    }
}

// DueDateDto is the outcome of a due-date computation.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DueDateDto {
    pub service_point_id: String,
    pub initial_due_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub due_date_management: DueDateManagement,
    pub time_zone: String,
}

impl DueDateDto {
    pub fn new(service_point_id: &str, initial_due_date: DateTime<Utc>, due_date: DateTime<Utc>,
               due_date_management: DueDateManagement, time_zone: &str) -> Self {
        Self {
            service_point_id: service_point_id.to_string(),
            initial_due_date,
            due_date,
            due_date_management,
            time_zone: time_zone.to_string(),
        }
    }

    pub fn is_adjusted(&self) -> bool {
        self.initial_due_date != self.due_date
    }
}
