use chrono::{DateTime, Duration, Timelike, Utc};
use chrono_tz::Tz;
use tracing::debug;
use crate::calendar::dto::AdjacentOpeningWindows;
use crate::core::library::{LibraryError, LibraryResult};
use crate::duedate::domain::timetable::{Timetable, TimetableBuilder, TimetableNode};
use crate::utils::date::{end_of_day, local_date, local_time};

/// AdjustmentStrategy moves a due date that falls while the service point is closed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AdjustmentStrategy {
    KeepCurrentTimestamp,
    KeepCurrentDate,
    EndOfPreviousOpenDay,
    EndOfNextOpenDay,
    EndOfCurrentOpenHours { current: DateTime<Utc> },
    EndOfPreviousOpenHours { current: DateTime<Utc> },
    BeginningOfNextOpenHours { offset: Duration },
    EndOfPreviousOpenHoursTruncate { start: DateTime<Utc> },
}

impl AdjustmentStrategy {
    /// Adjusts `requested` against the timetable of `windows`. Requested timestamps in an
    /// open interval are returned unchanged.
    pub fn adjust(&self, requested: DateTime<Utc>, windows: &AdjacentOpeningWindows,
                  zone: &Tz) -> LibraryResult<DateTime<Utc>> {
        match self {
            AdjustmentStrategy::KeepCurrentTimestamp => Ok(requested),
            AdjustmentStrategy::EndOfPreviousOpenHoursTruncate { start } => {
                let timetable = TimetableBuilder::build(windows, zone)?;
                let node = timetable.find_interval(*start)
                    .ok_or_else(|| absent("no interval contains the loan start"))?;
                debug!("truncating due date to the end of the interval before {:?}", node);
                end_of_previous(node)
            }
            _ => {
                let timetable = TimetableBuilder::build(windows, zone)?;
                let node = timetable.find_interval(requested)
                    .ok_or_else(|| absent("no interval contains the requested due date"))?;
                if node.is_open() {
                    debug!("{} falls in {:?}, keeping it", requested, node);
                    return Ok(requested);
                }
                debug!("{} falls in {:?}, applying {:?}", requested, node, self);
                self.adjust_closed(requested, node, &timetable, windows, zone)
            }
        }
    }

    fn adjust_closed(&self, requested: DateTime<Utc>, node: TimetableNode, timetable: &Timetable,
                     windows: &AdjacentOpeningWindows, zone: &Tz) -> LibraryResult<DateTime<Utc>> {
        match self {
            AdjustmentStrategy::KeepCurrentTimestamp => Ok(requested),
            AdjustmentStrategy::KeepCurrentDate => end_of_day(zone, local_date(zone, requested)),
            AdjustmentStrategy::EndOfPreviousOpenDay => end_of_open_day(requested, -1, windows, zone),
            AdjustmentStrategy::EndOfNextOpenDay => end_of_open_day(requested, 1, windows, zone),
            AdjustmentStrategy::EndOfCurrentOpenHours { current } => {
                if let Some(previous) = node.previous() {
                    if ends_at_day_end(timetable, zone) && local_time(zone, previous.start()).num_seconds_from_midnight() == 0 {
                        debug!("opening hours roll over midnight, moving to the end of {:?}", previous);
                        return Ok(previous.end());
                    }
                }
                let current_node = timetable.find_interval(*current)
                    .ok_or_else(|| absent("no interval contains the current time"))?;
                if current_node.is_open() {
                    Ok(current_node.end())
                } else {
                    current_node.next().map(|n| n.end())
                        .ok_or_else(|| absent("no interval follows the current time"))
                }
            }
            AdjustmentStrategy::EndOfPreviousOpenHours { current } => {
                let current_node = timetable.find_interval(*current)
                    .ok_or_else(|| absent("no interval contains the current time"))?;
                end_of_previous(current_node)
            }
            AdjustmentStrategy::BeginningOfNextOpenHours { offset } => {
                let next = node.next().ok_or_else(|| absent("no interval follows the requested due date"))?;
                let candidate = next.start() + *offset;
                if next.interval().contains(candidate) {
                    return Ok(candidate);
                }
                match timetable.find_interval(candidate) {
                    None => timetable.tail().map(|n| n.end())
                        .ok_or_else(|| absent("timetable has no intervals")),
                    Some(n) if n.is_open() => Ok(candidate),
                    Some(n) => end_of_previous(n),
                }
            }
            AdjustmentStrategy::EndOfPreviousOpenHoursTruncate { start } => {
                let start_node = timetable.find_interval(*start)
                    .ok_or_else(|| absent("no interval contains the loan start"))?;
                end_of_previous(start_node)
            }
        }
    }
}

fn absent(detail: &str) -> LibraryError {
    LibraryError::absent_timetable(detail)
}

fn end_of_previous(node: TimetableNode) -> LibraryResult<DateTime<Utc>> {
    node.previous().map(|n| n.end()).ok_or_else(|| absent("no interval precedes the located interval"))
}

// end of the local day of `requested` when that day is open, otherwise end of the day
// `step` days away; both days must be among the adjacent windows
fn end_of_open_day(requested: DateTime<Utc>, step: i64, windows: &AdjacentOpeningWindows,
                   zone: &Tz) -> LibraryResult<DateTime<Utc>> {
    let date = local_date(zone, requested);
    let window = windows.window_on(date)
        .ok_or_else(|| absent("no opening window for the requested date"))?;
    if window.open {
        return end_of_day(zone, date);
    }
    let other = date + Duration::days(step);
    match windows.window_on(other) {
        Some(w) if w.open => end_of_day(zone, other),
        Some(_) => Err(absent(if step < 0 { "previous day is closed" } else { "next day is closed" })),
        None => Err(absent("no opening window for the adjacent date")),
    }
}

// calendars close a day that runs up to midnight at 23:59
fn ends_at_day_end(timetable: &Timetable, zone: &Tz) -> bool {
    timetable.head().map(|head| {
        let end = local_time(zone, head.end());
        end.hour() == 23 && end.minute() == 59
    }).unwrap_or(false)
}
