//! Drag-resize of timesheet entries.
//!
//! A resize is an explicit Idle -> Resizing -> Idle state machine. The
//! session captures the entry's origin start/duration once at pointer-down;
//! every pointer-move resolves its candidate from those origin values plus
//! the total pixel delta, so repeated snapping never drifts. Only one
//! session may be active at a time; a second pointer-down is ignored.

use tracing::debug;

use crate::model::time::{minutes_to_time, slot_start, time_to_minutes, SLOT_MINUTES};
use crate::model::TimesheetEntry;

/// Vertical pixels covered by one 15-minute slot row.
pub const PIXELS_PER_SLOT: f32 = 15.0;

/// Minimum entry duration after a resize.
pub const MIN_DURATION_MINUTES: i32 = 15;

/// Latest allowed end minute (start + duration), per the day-grid bounds.
const MAX_END_MINUTES: i32 = 1439;

/// Which handle of the entry block is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    /// Top handle: moves the start, end stays fixed.
    Start,
    /// Bottom handle: moves the end, start stays fixed.
    End,
}

/// Result of a resize attempt. Rejection is a normal outcome, not an
/// error: the entry simply keeps its previous values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeOutcome {
    Applied {
        start_time: String,
        duration_minutes: i32,
    },
    Rejected,
}

/// Convert a pointer delta in pixels to a minute delta snapped to the
/// nearest 15-minute increment.
pub fn snap_pixel_delta(delta_px: f32) -> i32 {
    (delta_px / PIXELS_PER_SLOT).round() as i32 * SLOT_MINUTES
}

/// Resolve a candidate (start, duration) from origin values, or None when
/// the candidate violates the bounds. No partial application: callers keep
/// the previous values on None.
fn resize_candidate(
    start_minutes: i32,
    duration_minutes: i32,
    edge: ResizeEdge,
    delta_minutes: i32,
) -> Option<(i32, i32)> {
    let (new_start, new_duration) = match edge {
        ResizeEdge::Start => (start_minutes + delta_minutes, duration_minutes - delta_minutes),
        ResizeEdge::End => (start_minutes, duration_minutes + delta_minutes),
    };

    if new_duration < MIN_DURATION_MINUTES {
        return None;
    }
    match edge {
        ResizeEdge::Start if new_start < 0 => return None,
        ResizeEdge::End if new_start + new_duration > MAX_END_MINUTES => return None,
        _ => {}
    }

    Some((new_start, new_duration))
}

/// One-shot resize of an entry by a pointer delta. Invalid candidates
/// leave the entry untouched and report [`ResizeOutcome::Rejected`].
pub fn apply_resize(entry: &TimesheetEntry, edge: ResizeEdge, delta_px: f32) -> ResizeOutcome {
    let Ok(start_minutes) = time_to_minutes(&entry.start_time) else {
        return ResizeOutcome::Rejected;
    };
    let delta_minutes = snap_pixel_delta(delta_px);

    match resize_candidate(start_minutes, entry.duration_minutes, edge, delta_minutes) {
        Some((new_start, new_duration)) => ResizeOutcome::Applied {
            start_time: minutes_to_time(new_start),
            duration_minutes: new_duration,
        },
        None => ResizeOutcome::Rejected,
    }
}

/// Origin values captured once when a resize session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub entry_id: String,
    pub edge: ResizeEdge,
    origin_start_minutes: i32,
    origin_duration_minutes: i32,
}

impl ResizeSession {
    pub fn origin_start_time(&self) -> String {
        minutes_to_time(self.origin_start_minutes)
    }

    pub fn origin_duration_minutes(&self) -> i32 {
        self.origin_duration_minutes
    }
}

/// The drag-resize state machine.
#[derive(Debug, Clone, Default)]
pub struct ResizeController {
    session: Option<ResizeSession>,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        self.session.as_ref()
    }

    /// Start a session on `entry`. Ignored (returns false) while another
    /// session is active. The entry's start is re-anchored to its owning
    /// slot boundary so the first snap is exact.
    pub fn begin(&mut self, entry: &TimesheetEntry, edge: ResizeEdge) -> bool {
        if self.session.is_some() {
            return false;
        }
        let Ok(start_minutes) = time_to_minutes(&entry.start_time) else {
            return false;
        };
        debug!(entry = %entry.id, ?edge, "resize session started");
        self.session = Some(ResizeSession {
            entry_id: entry.id.clone(),
            edge,
            origin_start_minutes: slot_start(start_minutes),
            origin_duration_minutes: entry.duration_minutes,
        });
        true
    }

    /// Resolve the candidate for the total pointer delta since pointer-down,
    /// measured against the captured origin. None when out of bounds; the
    /// caller keeps the entry's previous values in that case.
    pub fn resolve(&self, total_delta_px: f32) -> Option<(String, i32)> {
        let session = self.session.as_ref()?;
        let delta_minutes = snap_pixel_delta(total_delta_px);
        resize_candidate(
            session.origin_start_minutes,
            session.origin_duration_minutes,
            session.edge,
            delta_minutes,
        )
        .map(|(start, duration)| (minutes_to_time(start), duration))
    }

    /// End the session, keeping whatever values the moves applied.
    pub fn finish(&mut self) -> Option<ResizeSession> {
        self.session.take()
    }

    /// Abort the session; returns the origin values the caller should
    /// restore on the entry.
    pub fn cancel(&mut self) -> Option<(String, i32)> {
        self.session
            .take()
            .map(|s| (minutes_to_time(s.origin_start_minutes), s.origin_duration_minutes))
    }
}
