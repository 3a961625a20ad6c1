pub mod adjust_due_date_cmd;
pub mod truncate_due_date_cmd;
