pub mod add_opening_day_cmd;
pub mod get_adjacent_windows_cmd;
pub mod remove_opening_day_cmd;
