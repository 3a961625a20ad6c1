use std::fmt;
use std::fmt::{Debug, Formatter};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use chrono_tz::Tz;
use tracing::warn;
use crate::calendar::dto::{AdjacentOpeningWindows, OpeningWindow};
use crate::core::library::LibraryResult;
use crate::duedate::domain::interval::Interval;
use crate::utils::date::to_instant;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
struct Slot {
    interval: Interval,
    open: bool,
}

/// Timetable is an ordered run of alternating open and closed intervals covering one
/// contiguous span. Nodes live in a single vector and refer to their neighbours by index.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Timetable {
    slots: Vec<Slot>,
}

/// TimetableNode is a borrowed handle to one interval of a timetable.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TimetableNode<'a> {
    timetable: &'a Timetable,
    index: usize,
}

impl<'a> TimetableNode<'a> {
    fn slot(&self) -> &'a Slot {
        &self.timetable.slots[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn interval(&self) -> Interval {
        self.slot().interval
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.slot().interval.start()
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.slot().interval.end()
    }

    pub fn is_open(&self) -> bool {
        self.slot().open
    }

    pub fn previous(&self) -> Option<TimetableNode<'a>> {
        if self.index == 0 {
            None
        } else {
            self.timetable.node(self.index - 1)
        }
    }

    pub fn next(&self) -> Option<TimetableNode<'a>> {
        self.timetable.node(self.index + 1)
    }
}

impl Debug for TimetableNode<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} {}", if self.is_open() { "open" } else { "closed" }, self.interval())
    }
}

impl Timetable {
    pub fn empty() -> Self {
        Self::default()
    }

    // open intervals must be sorted by start; touching ones are merged and gaps between
    // them become closed nodes
    fn from_open_intervals(open: Vec<Interval>) -> Self {
        let mut merged: Vec<Interval> = Vec::with_capacity(open.len());
        for interval in open {
            match merged.last_mut() {
                Some(last) => {
                    if let Some(span) = last.span(&interval) {
                        *last = span;
                    } else {
                        merged.push(interval);
                    }
                }
                None => merged.push(interval),
            }
        }

        let mut slots = Vec::with_capacity(merged.len() * 2);
        for (i, interval) in merged.iter().enumerate() {
            if i > 0 {
                if let Some(gap) = merged[i - 1].gap(interval) {
                    slots.push(Slot { interval: gap, open: false });
                }
            }
            slots.push(Slot { interval: *interval, open: true });
        }
        Self { slots }
    }

    fn node(&self, index: usize) -> Option<TimetableNode> {
        if index < self.slots.len() {
            Some(TimetableNode { timetable: self, index })
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn head(&self) -> Option<TimetableNode> {
        self.node(0)
    }

    pub fn tail(&self) -> Option<TimetableNode> {
        self.slots.len().checked_sub(1).and_then(|i| self.node(i))
    }

    pub fn nodes(&self) -> impl Iterator<Item=TimetableNode> + '_ {
        (0..self.slots.len()).map(move |index| TimetableNode { timetable: self, index })
    }

    /// The node whose interval contains `t`, or none when `t` falls outside the covered span.
    pub fn find_interval(&self, t: DateTime<Utc>) -> Option<TimetableNode> {
        let index = self.slots.partition_point(|s| s.interval.end() <= t);
        self.node(index).filter(|n| n.interval().contains(t))
    }
}

pub struct TimetableBuilder;

impl TimetableBuilder {
    /// Builds the timetable of three adjacent days with every open period anchored in `zone`.
    pub fn build(windows: &AdjacentOpeningWindows, zone: &Tz) -> LibraryResult<Timetable> {
        let mut open = vec![];
        for window in windows.windows() {
            open.extend(Self::open_intervals(window, zone)?);
        }
        open.sort_by_key(|i| i.start());
        Ok(Timetable::from_open_intervals(open))
    }

    fn open_intervals(window: &OpeningWindow, zone: &Tz) -> LibraryResult<Vec<Interval>> {
        if !window.open {
            return Ok(vec![]);
        }
        let next_date = window.date + Duration::days(1);
        if window.all_day {
            let start = to_instant(zone, window.date, NaiveTime::MIN)?;
            let end = to_instant(zone, next_date, NaiveTime::MIN)?;
            return Ok(vec![Interval::new(start, end)?]);
        }
        let mut intervals = vec![];
        for hours in window.effective_hours() {
            let end_date = if hours.ends_next_day() { next_date } else { window.date };
            let start = to_instant(zone, window.date, hours.start_time)?;
            let end = to_instant(zone, end_date, hours.end_time)?;
            match Interval::new(start, end) {
                Ok(interval) => intervals.push(interval),
                Err(_) => warn!("skipping opening hours {:?} of {} collapsed by the {} zone",
                                hours, window.date, zone),
            }
        }
        Ok(intervals)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
    use chrono_tz::Tz;
    use crate::calendar::dto::{AdjacentOpeningWindows, OpeningHours, OpeningWindow};
    use crate::duedate::domain::timetable::TimetableBuilder;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, d, h, 0, 0).unwrap()
    }

    fn hours(start: u32, end: u32) -> OpeningHours {
        OpeningHours::new(NaiveTime::from_hms_opt(start % 24, 0, 0).unwrap(), NaiveTime::from_hms_opt(end % 24, 0, 0).unwrap())
    }

    fn windows(previous: OpeningWindow, requested: OpeningWindow, next: OpeningWindow) -> AdjacentOpeningWindows {
        AdjacentOpeningWindows::new(previous, requested, next).unwrap()
    }

    #[tokio::test]
    async fn test_should_build_alternating_nodes() {
        let tt = TimetableBuilder::build(&windows(
            OpeningWindow::with_hours(day(1), vec![hours(9, 12), hours(13, 17)]),
            OpeningWindow::closed(day(2)),
            OpeningWindow::with_hours(day(3), vec![hours(9, 17)])), &Tz::UTC).unwrap();
        // 9-12 open, 12-13 closed, 13-17 open, 17-9 closed, 9-17 open
        assert_eq!(5, tt.len());
        let nodes: Vec<_> = tt.nodes().collect();
        for pair in nodes.windows(2) {
            assert_ne!(pair[0].is_open(), pair[1].is_open());
            assert_eq!(pair[0].end(), pair[1].start());
        }
        assert_eq!(at(1, 9), tt.head().unwrap().start());
        assert_eq!(at(3, 17), tt.tail().unwrap().end());
    }

    #[tokio::test]
    async fn test_should_find_exactly_one_node_for_covered_timestamps() {
        let tt = TimetableBuilder::build(&windows(
            OpeningWindow::with_hours(day(1), vec![hours(8, 12), hours(14, 22)]),
            OpeningWindow::with_hours(day(2), vec![hours(10, 16)]),
            OpeningWindow::all_day(day(3))), &Tz::UTC).unwrap();
        let mut t = tt.head().unwrap().start();
        let end = tt.tail().unwrap().end();
        while t < end {
            let node = tt.find_interval(t).expect("covered timestamp should have a node");
            assert!(node.interval().contains(t));
            assert_eq!(1, tt.nodes().filter(|n| n.interval().contains(t)).count());
            t += Duration::minutes(30);
        }
        assert!(tt.find_interval(end).is_none());
        assert!(tt.find_interval(at(1, 7)).is_none());
    }

    #[tokio::test]
    async fn test_should_merge_periods_across_midnight() {
        let tt = TimetableBuilder::build(&windows(
            OpeningWindow::with_hours(day(1), vec![hours(22, 24)]),
            OpeningWindow::with_hours(day(2), vec![hours(0, 6)]),
            OpeningWindow::closed(day(3))), &Tz::UTC).unwrap();
        assert_eq!(1, tt.len());
        let node = tt.head().unwrap();
        assert!(node.is_open());
        assert_eq!(at(1, 22), node.start());
        assert_eq!(at(2, 6), node.end());
    }

    #[tokio::test]
    async fn test_should_merge_overlapping_periods() {
        let tt = TimetableBuilder::build(&windows(
            OpeningWindow::with_hours(day(1), vec![hours(9, 14), hours(12, 17)]),
            OpeningWindow::closed(day(2)),
            OpeningWindow::closed(day(3))), &Tz::UTC).unwrap();
        assert_eq!(1, tt.len());
        assert_eq!(at(1, 17), tt.head().unwrap().end());
    }

    #[tokio::test]
    async fn test_should_span_all_day_windows() {
        let tt = TimetableBuilder::build(&windows(
            OpeningWindow::all_day(day(1)),
            OpeningWindow::all_day(day(2)),
            OpeningWindow::closed(day(3))), &Tz::UTC).unwrap();
        assert_eq!(1, tt.len());
        assert_eq!(at(1, 0), tt.head().unwrap().start());
        assert_eq!(at(3, 0), tt.head().unwrap().end());
    }

    #[tokio::test]
    async fn test_should_build_empty_timetable_without_open_time() {
        let mut closed_with_hours = OpeningWindow::with_hours(day(2), vec![hours(9, 17)]);
        closed_with_hours.open = false;
        let tt = TimetableBuilder::build(&windows(
            OpeningWindow::closed(day(1)), closed_with_hours, OpeningWindow::closed(day(3))), &Tz::UTC).unwrap();
        assert!(tt.is_empty());
        assert!(tt.head().is_none());
        assert!(tt.tail().is_none());
        assert!(tt.find_interval(at(2, 12)).is_none());
    }

    #[tokio::test]
    async fn test_should_navigate_nodes() {
        let tt = TimetableBuilder::build(&windows(
            OpeningWindow::with_hours(day(1), vec![hours(9, 17)]),
            OpeningWindow::closed(day(2)),
            OpeningWindow::with_hours(day(3), vec![hours(9, 17)])), &Tz::UTC).unwrap();
        let closed = tt.find_interval(at(2, 12)).unwrap();
        assert!(!closed.is_open());
        assert_eq!(at(1, 17), closed.previous().unwrap().end());
        assert_eq!(at(3, 9), closed.next().unwrap().start());
        assert!(tt.head().unwrap().previous().is_none());
        assert!(tt.tail().unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_should_anchor_hours_in_zone() {
        let zone: Tz = "Europe/Berlin".parse().unwrap();
        let tt = TimetableBuilder::build(&windows(
            OpeningWindow::closed(day(1)),
            OpeningWindow::with_hours(day(2), vec![hours(9, 17)]),
            OpeningWindow::closed(day(3))), &zone).unwrap();
        // CEST is UTC+2
        assert_eq!(at(2, 7), tt.head().unwrap().start());
        assert_eq!(at(2, 15), tt.head().unwrap().end());
    }
}
