pub mod time;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::time::{parse_duration_input, parse_time_input};

/// Work-order ids are plain integers, unique across the whole tree.
pub type WorkOrderId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WorkOrderStatus {
    #[default]
    Open,
    InProgress,
    OnHold,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// A maintenance work order. Child ordering and parent/child linkage live in
/// the arena ([`crate::tree::WorkOrderTree`]); the node itself only carries a
/// back-reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: WorkOrderId,
    pub parent_id: Option<WorkOrderId>,
    pub title: String,
    pub status: WorkOrderStatus,
    pub priority: Priority,
    // Display/filter only; the grid never reads these
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EntryStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
}

/// One scheduled interval of work against a work order.
///
/// `start_time` is "HH:MM" on a 15-minute boundary, `duration_minutes` a
/// positive multiple of 15, and the interval never crosses midnight. Entries
/// for the same order and day may overlap; the grid renders each exactly
/// once regardless (see [`crate::grid`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimesheetEntry {
    pub id: String,
    pub work_order_id: WorkOrderId,
    pub date: NaiveDate,
    pub start_time: String,
    pub duration_minutes: i32,
    pub status: EntryStatus,
    pub notes: String,
    pub updated_at: NaiveDateTime,
}

impl TimesheetEntry {
    /// Mark the entry as touched by an edit/resize.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().naive_utc();
    }
}

/// Mint a fresh entry id. V7 uuids sort by creation time, which keeps the
/// raw entry list roughly chronological.
pub fn new_entry_id() -> String {
    Uuid::now_v7().to_string()
}

/// Raw form input for creating or editing an entry. Nothing is trusted until
/// [`EntryDraft::validate`] turns it into a concrete entry payload.
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub work_order_id: Option<WorkOrderId>,
    pub date: Option<NaiveDate>,
    pub start_time: String,
    pub duration: String,
    pub notes: String,
}

/// A validated draft, ready to be applied through the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub work_order_id: WorkOrderId,
    pub date: NaiveDate,
    pub start_time: String,
    pub duration_minutes: i32,
    pub notes: String,
}

impl EntryDraft {
    /// The submission gate: require a work order, a date, a parseable start
    /// time and a positive duration, and keep the interval inside the day.
    /// Invalid forms are blocked here rather than surfaced as errors later.
    pub fn validate(&self) -> Option<ValidDraft> {
        let work_order_id = self.work_order_id?;
        let date = self.date?;
        let start_time = parse_time_input(&self.start_time)?;
        let duration_minutes = parse_duration_input(&self.duration)?;

        // parse_time_input only emits valid "HH:MM", so this cannot fail
        let start_minutes = time::time_to_minutes(&start_time).ok()?;
        if start_minutes + duration_minutes > time::MINUTES_PER_DAY {
            return None;
        }

        Some(ValidDraft {
            work_order_id,
            date,
            start_time,
            duration_minutes,
            notes: self.notes.trim().to_string(),
        })
    }
}

/// Literal sample data in the shape the hosting page supplies at start-up:
/// a small work-order tree plus a week of entries. The tuple is
/// `(orders, child lists)` where each child list is `(parent, children)` in
/// display order.
pub fn sample_work_orders() -> (Vec<WorkOrder>, Vec<(WorkOrderId, Vec<WorkOrderId>)>) {
    let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();

    let orders = vec![
        WorkOrder {
            id: 1,
            parent_id: None,
            title: "HVAC quarterly maintenance".to_string(),
            status: WorkOrderStatus::InProgress,
            priority: Priority::High,
            start_date: Some(d(2025, 1, 6)),
            due_date: Some(d(2025, 1, 31)),
        },
        WorkOrder {
            id: 2,
            parent_id: Some(1),
            title: "Replace rooftop unit filters".to_string(),
            status: WorkOrderStatus::Open,
            priority: Priority::Medium,
            start_date: Some(d(2025, 1, 6)),
            due_date: Some(d(2025, 1, 10)),
        },
        WorkOrder {
            id: 3,
            parent_id: Some(1),
            title: "Inspect condensate drains".to_string(),
            status: WorkOrderStatus::Open,
            priority: Priority::Low,
            start_date: None,
            due_date: Some(d(2025, 1, 17)),
        },
        WorkOrder {
            id: 4,
            parent_id: Some(2),
            title: "Order filter stock".to_string(),
            status: WorkOrderStatus::Completed,
            priority: Priority::Medium,
            start_date: None,
            due_date: None,
        },
        WorkOrder {
            id: 5,
            parent_id: None,
            title: "Elevator annual certification".to_string(),
            status: WorkOrderStatus::OnHold,
            priority: Priority::Critical,
            start_date: Some(d(2025, 2, 3)),
            due_date: Some(d(2025, 2, 28)),
        },
    ];

    let children = vec![(1, vec![2, 3]), (2, vec![4])];

    (orders, children)
}

/// Sample timesheet entries for the week of 2025-01-06.
pub fn sample_entries() -> Vec<TimesheetEntry> {
    let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
    let entry = |id: &str, wo, date, start: &str, mins, notes: &str| TimesheetEntry {
        id: id.to_string(),
        work_order_id: wo,
        date,
        start_time: start.to_string(),
        duration_minutes: mins,
        status: EntryStatus::Draft,
        notes: notes.to_string(),
        updated_at: Utc::now().naive_utc(),
    };

    vec![
        entry("ts-1", 1, d(6), "09:00", 60, "Site walkthrough"),
        entry("ts-2", 2, d(6), "10:30", 90, "Pulled old filters, unit 1-3"),
        entry("ts-3", 2, d(7), "09:00", 30, "Filter fitment check"),
        entry("ts-4", 3, d(7), "13:00", 120, "Drain pan inspection"),
        entry("ts-5", 1, d(8), "08:00", 240, "Compressor diagnostics"),
        entry("ts-6", 2, d(10), "15:30", 45, "Paperwork and sign-off"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> EntryDraft {
        EntryDraft {
            work_order_id: Some(2),
            date: NaiveDate::from_ymd_opt(2025, 1, 7),
            start_time: "9:00".to_string(),
            duration: "1h 30m".to_string(),
            notes: "  swap filters  ".to_string(),
        }
    }

    #[test]
    fn draft_validates_and_canonicalizes() {
        let valid = draft().validate().unwrap();
        assert_eq!(valid.start_time, "09:00");
        assert_eq!(valid.duration_minutes, 90);
        assert_eq!(valid.notes, "swap filters");
    }

    #[test]
    fn draft_requires_all_fields() {
        let mut missing_order = draft();
        missing_order.work_order_id = None;
        assert!(missing_order.validate().is_none());

        let mut missing_date = draft();
        missing_date.date = None;
        assert!(missing_date.validate().is_none());

        let mut bad_time = draft();
        bad_time.start_time = "25:00".to_string();
        assert!(bad_time.validate().is_none());

        let mut zero_duration = draft();
        zero_duration.duration = "0m".to_string();
        assert!(zero_duration.validate().is_none());
    }

    #[test]
    fn draft_rejects_interval_past_midnight() {
        let mut late = draft();
        late.start_time = "23:30".to_string();
        late.duration = "45m".to_string();
        assert!(late.validate().is_none());
    }

    #[test]
    fn sample_tree_child_lists_agree_with_parent_ids() {
        let (orders, children) = sample_work_orders();
        for (parent, kids) in &children {
            for kid in kids {
                let node = orders.iter().find(|o| o.id == *kid).unwrap();
                assert_eq!(node.parent_id, Some(*parent));
            }
        }
    }
}
