//! Weekly timesheet grid: the cached week snapshot and slot bucketing.
//!
//! The snapshot is a pure function of (week start, entry list) and is cached
//! so every read within one render pass sees the identical object. All
//! mutation paths route through [`crate::store::Scheduler`], which is what
//! guarantees [`GridEngine::invalidate`] runs before the next read.

pub mod resize;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::debug;

use crate::model::time::{slot_start, time_to_minutes};
use crate::model::TimesheetEntry;

/// Default working-day target, in minutes (8h). Zero on weekends.
pub const DEFAULT_DAY_TARGET_MINUTES: i32 = 480;

/// One day column of the week view.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySnapshot {
    pub date: NaiveDate,
    pub weekday_name: &'static str,
    /// Entries dated this day, in input order.
    pub entries: Vec<TimesheetEntry>,
    pub total_minutes: i32,
    /// Expected minutes for the day: 0 on weekends, the configured target
    /// otherwise. Detection uses the computed date's weekday, never a flag
    /// on the entry.
    pub target_minutes: i32,
}

impl DaySnapshot {
    pub fn total_hours(&self) -> f64 {
        f64::from(self.total_minutes) / 60.0
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Entries whose owning slot is `slot` (a minute-of-day on a 15-minute
    /// boundary). An entry is owned by exactly the slot containing its
    /// start time; longer entries overflow visually into later rows without
    /// being listed there. Matching "touches this slot" instead would draw
    /// multi-slot entries once per row.
    pub fn entries_starting_in_slot(&self, slot: i32) -> Vec<&TimesheetEntry> {
        self.entries
            .iter()
            .filter(|e| {
                time_to_minutes(&e.start_time)
                    .map(|m| slot_start(m) == slot)
                    .unwrap_or(false)
            })
            .collect()
    }
}

/// Derived view of one week, seven days starting at `week_start`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekSnapshot {
    pub week_start: NaiveDate,
    pub days: Vec<DaySnapshot>,
}

impl WeekSnapshot {
    pub fn day(&self, date: NaiveDate) -> Option<&DaySnapshot> {
        self.days.iter().find(|d| d.date == date)
    }

    pub fn total_minutes(&self) -> i32 {
        self.days.iter().map(|d| d.total_minutes).sum()
    }
}

/// Build the week snapshot. Pure: no caching, no engine state.
pub fn compute_week(
    week_start: NaiveDate,
    entries: &[TimesheetEntry],
    day_target_minutes: i32,
) -> WeekSnapshot {
    let days = (0..7)
        .map(|offset| {
            let date = week_start + Duration::days(offset);
            let day_entries: Vec<TimesheetEntry> = entries
                .iter()
                .filter(|e| e.date == date)
                .cloned()
                .collect();
            let total_minutes = day_entries.iter().map(|e| e.duration_minutes).sum();
            let is_weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);

            DaySnapshot {
                date,
                weekday_name: weekday_name(date.weekday()),
                entries: day_entries,
                total_minutes,
                target_minutes: if is_weekend { 0 } else { day_target_minutes },
            }
        })
        .collect();

    WeekSnapshot { week_start, days }
}

/// Direction for week paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekDirection {
    Previous,
    Next,
}

/// Owns the current week and the single cached snapshot.
#[derive(Debug, Clone)]
pub struct GridEngine {
    week_start: NaiveDate,
    day_target_minutes: i32,
    cache: Option<WeekSnapshot>,
}

impl GridEngine {
    pub fn new(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            day_target_minutes: DEFAULT_DAY_TARGET_MINUTES,
            cache: None,
        }
    }

    pub fn with_day_target(week_start: NaiveDate, day_target_minutes: i32) -> Self {
        Self {
            week_start,
            day_target_minutes,
            cache: None,
        }
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    /// The cached snapshot, computed from `entries` if absent. Repeated
    /// calls within one pass return the identical cached object; the
    /// entries argument is ignored while the cache holds, which is exactly
    /// why every mutation must invalidate.
    pub fn snapshot(&mut self, entries: &[TimesheetEntry]) -> &WeekSnapshot {
        if self.cache.is_none() {
            debug!(week_start = %self.week_start, entries = entries.len(), "recomputing week snapshot");
        }
        let week_start = self.week_start;
        let day_target = self.day_target_minutes;
        self.cache
            .get_or_insert_with(|| compute_week(week_start, entries, day_target))
    }

    /// Discard the cached snapshot so the next read recomputes.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    pub fn set_week_start(&mut self, week_start: NaiveDate) {
        self.week_start = week_start;
        self.invalidate();
    }

    /// Page one week back or forward.
    pub fn navigate_week(&mut self, direction: WeekDirection) {
        let days = match direction {
            WeekDirection::Previous => -7,
            WeekDirection::Next => 7,
        };
        self.set_week_start(self.week_start + Duration::days(days));
    }

    pub fn set_day_target(&mut self, minutes: i32) {
        self.day_target_minutes = minutes;
        self.invalidate();
    }
}

/// Determine if weekend columns should be drawn: only when a weekend day
/// actually has entries (callers may still force them on via config).
pub fn should_show_weekends(snapshot: &WeekSnapshot) -> bool {
    snapshot
        .days
        .iter()
        .any(|d| d.is_weekend() && !d.entries.is_empty())
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
