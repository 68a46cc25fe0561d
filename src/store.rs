//! The scheduler: single mutation gateway over the work-order tree, the
//! entry list, the navigator and the grid cache.
//!
//! Every operation that can change what the week snapshot would contain
//! (entry add/edit/remove/resize, week paging, navigation, switching into
//! the schedule view) goes through a method here that ends by invalidating
//! the grid cache. Call sites outside this module cannot forget the
//! invalidation step because they have no other mutation path.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::{Config, ViewMode};
use crate::error::EngineError;
use crate::grid::resize::{ResizeController, ResizeEdge};
use crate::grid::{self, GridEngine, WeekDirection, WeekSnapshot};
use crate::model::time::week_start;
use crate::model::{
    new_entry_id, sample_entries, sample_work_orders, EntryDraft, EntryStatus, Priority,
    TimesheetEntry, WorkOrder, WorkOrderId, WorkOrderStatus,
};
use crate::selection::Selection;
use crate::tree::{Navigator, WorkOrderTree};

/// A save/delete held back by the simulated latency of the original page.
/// At most one is pending at a time; dropping the scheduler abandons it
/// (the original has no teardown cleanup either).
#[derive(Debug, Clone)]
enum DeferredAction {
    SaveNew(EntryDraft),
    SaveEdit { id: String, draft: EntryDraft },
    Delete { id: String },
}

#[derive(Debug, Clone)]
struct DeferredOp {
    action: DeferredAction,
    due_at: Instant,
}

#[derive(Debug)]
pub struct Scheduler {
    config: Config,
    tree: WorkOrderTree,
    entries: Vec<TimesheetEntry>,
    navigator: Navigator,
    engine: GridEngine,
    selection: Selection,
    resize: ResizeController,
    view_mode: ViewMode,
    pending: Option<DeferredOp>,
}

impl Scheduler {
    pub fn new(
        config: Config,
        tree: WorkOrderTree,
        entries: Vec<TimesheetEntry>,
        initial_date: chrono::NaiveDate,
    ) -> Self {
        let view_mode = config.view_mode;
        let engine = GridEngine::with_day_target(week_start(initial_date), config.day_target_minutes);
        Self {
            config,
            tree,
            entries,
            navigator: Navigator::new(),
            engine,
            selection: Selection::new(),
            resize: ResizeController::new(),
            view_mode,
            pending: None,
        }
    }

    /// A scheduler loaded with the literal sample data the hosting page
    /// supplies at start-up.
    pub fn with_sample_data(config: Config) -> Self {
        let (orders, children) = sample_work_orders();
        let tree = WorkOrderTree::from_sample(orders, children);
        let initial = chrono::NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        Self::new(config, tree, sample_entries(), initial)
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    pub fn tree(&self) -> &WorkOrderTree {
        &self.tree
    }

    pub fn entries(&self) -> &[TimesheetEntry] {
        &self.entries
    }

    pub fn entry(&self, id: &str) -> Option<&TimesheetEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn week_start(&self) -> chrono::NaiveDate {
        self.engine.week_start()
    }

    pub fn resize_active(&self) -> bool {
        self.resize.is_active()
    }

    /// Work orders listed in the current navigation context.
    pub fn visible_orders(&self) -> Vec<&WorkOrder> {
        self.navigator
            .visible_children(&self.tree)
            .iter()
            .filter_map(|&id| self.tree.get(id))
            .collect()
    }

    /// Entries scoped to the current work order, or the whole list at the
    /// top level. This is the entry set the grid buckets.
    pub fn entries_for_current(&self) -> Vec<TimesheetEntry> {
        match self.navigator.current() {
            Some(id) => self
                .entries
                .iter()
                .filter(|e| e.work_order_id == id)
                .cloned()
                .collect(),
            None => self.entries.clone(),
        }
    }

    /// The cached week snapshot. Every call within one render pass returns
    /// the identical cached object; only gateway mutations refresh it.
    pub fn snapshot(&mut self) -> &WeekSnapshot {
        let scoped = self.entries_for_current();
        self.engine.snapshot(&scoped)
    }

    /// Whether weekend columns should be drawn for the current week.
    pub fn show_weekends(&mut self) -> bool {
        if self.config.always_show_weekends {
            return true;
        }
        grid::should_show_weekends(self.snapshot())
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn descend(&mut self, id: WorkOrderId) {
        if !self.tree.contains(id) {
            warn!(id, "descend into unknown work order ignored");
            return;
        }
        self.navigator.descend(id);
        self.engine.invalidate();
    }

    pub fn ascend_to(&mut self, id: WorkOrderId) -> Result<(), EngineError> {
        self.navigator.ascend_to(id)?;
        self.engine.invalidate();
        Ok(())
    }

    pub fn ascend_one(&mut self) {
        self.navigator.ascend_one();
        self.engine.invalidate();
    }

    /// Create a sub work order under the current node, or a top-level
    /// order when at the root view.
    pub fn create_sub_order(&mut self, title: &str, priority: Priority) -> WorkOrderId {
        match self.navigator.current() {
            Some(parent) => self
                .tree
                .create_sub_order(parent, title, priority)
                .unwrap_or_else(|| self.tree.create_order(title, priority)),
            None => self.tree.create_order(title, priority),
        }
    }

    // ------------------------------------------------------------------
    // Week + view
    // ------------------------------------------------------------------

    pub fn navigate_week(&mut self, direction: WeekDirection) {
        self.engine.navigate_week(direction);
    }

    /// Jump to the week containing `date`.
    pub fn set_week(&mut self, date: chrono::NaiveDate) {
        self.engine.set_week_start(week_start(date));
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == ViewMode::Schedule && self.view_mode != ViewMode::Schedule {
            // Entering the calendar view always re-reads fresh data
            self.engine.invalidate();
        }
        self.view_mode = mode;
    }

    // ------------------------------------------------------------------
    // Entry mutations (immediate)
    // ------------------------------------------------------------------

    /// Add an entry from a form draft. Invalid drafts are blocked at
    /// submission and nothing changes.
    pub fn add_entry(&mut self, draft: &EntryDraft) -> Option<String> {
        let valid = draft.validate()?;
        let id = new_entry_id();
        debug!(entry = %id, work_order = valid.work_order_id, "add entry");
        self.entries.push(TimesheetEntry {
            id: id.clone(),
            work_order_id: valid.work_order_id,
            date: valid.date,
            start_time: valid.start_time,
            duration_minutes: valid.duration_minutes,
            status: EntryStatus::Draft,
            notes: valid.notes,
            updated_at: chrono::Utc::now().naive_utc(),
        });
        self.engine.invalidate();
        Some(id)
    }

    /// Edit an existing entry in place from a form draft. The same
    /// submission gate applies; a rejected draft leaves the entry alone.
    pub fn edit_entry(&mut self, id: &str, draft: &EntryDraft) -> bool {
        let Some(valid) = draft.validate() else {
            return false;
        };
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        entry.work_order_id = valid.work_order_id;
        entry.date = valid.date;
        entry.start_time = valid.start_time;
        entry.duration_minutes = valid.duration_minutes;
        entry.notes = valid.notes;
        entry.touch();
        self.engine.invalidate();
        true
    }

    pub fn set_entry_status(&mut self, id: &str, status: EntryStatus) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        entry.status = status;
        entry.touch();
        self.engine.invalidate();
        true
    }

    pub fn remove_entry(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return false;
        }
        debug!(entry = %id, "removed entry");
        self.engine.invalidate();
        true
    }

    // ------------------------------------------------------------------
    // Drag-resize
    // ------------------------------------------------------------------

    /// Pointer-down on a resize handle. Ignored while another resize is
    /// active or the entry is unknown.
    pub fn begin_resize(&mut self, entry_id: &str, edge: ResizeEdge) -> bool {
        let Some(entry) = self.entries.iter().find(|e| e.id == entry_id) else {
            return false;
        };
        self.resize.begin(entry, edge)
    }

    /// Pointer-move: resolve the candidate for the total delta since
    /// pointer-down and apply it to the live entry. Out-of-bounds deltas
    /// leave the previous values in place.
    pub fn resize_move(&mut self, total_delta_px: f32) {
        let Some((start_time, duration)) = self.resize.resolve(total_delta_px) else {
            return;
        };
        let Some(session) = self.resize.session() else {
            return;
        };
        let entry_id = session.entry_id.clone();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == entry_id) {
            if entry.start_time != start_time || entry.duration_minutes != duration {
                entry.start_time = start_time;
                entry.duration_minutes = duration;
                entry.touch();
                self.engine.invalidate();
            }
        }
    }

    /// Pointer-up: keep whatever the moves applied.
    pub fn finish_resize(&mut self) {
        self.resize.finish();
    }

    /// Escape/right-click: restore the origin values captured at
    /// pointer-down.
    pub fn cancel_resize(&mut self) {
        let Some(session) = self.resize.session() else {
            return;
        };
        let entry_id = session.entry_id.clone();
        if let Some((start_time, duration)) = self.resize.cancel() {
            if let Some(entry) = self.entries.iter_mut().find(|e| e.id == entry_id) {
                entry.start_time = start_time;
                entry.duration_minutes = duration;
                entry.touch();
                self.engine.invalidate();
            }
        }
    }

    // ------------------------------------------------------------------
    // Bulk selection
    // ------------------------------------------------------------------

    pub fn toggle_select(&mut self, id: WorkOrderId) {
        self.selection.toggle(id);
    }

    pub fn select_all_visible(&mut self) {
        let visible = self.navigator.visible_children(&self.tree).to_vec();
        self.selection.select_all(&visible);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Set `status` on every selected order, then clear the selection.
    /// Unknown ids are skipped; already-updated orders stay updated (no
    /// rollback). Returns how many orders changed.
    pub fn apply_bulk_status(&mut self, status: WorkOrderStatus) -> usize {
        let mut updated = 0;
        for id in self.selection.sorted_ids() {
            match self.tree.get_mut(id) {
                Some(order) => {
                    order.status = status;
                    updated += 1;
                }
                None => warn!(id, "bulk status skipped unknown work order"),
            }
        }
        debug!(updated, ?status, "bulk status applied");
        self.selection.clear();
        updated
    }

    // ------------------------------------------------------------------
    // Deferred save/delete (simulated latency)
    // ------------------------------------------------------------------

    /// Queue an entry save behind the configured fake latency. Refused
    /// while another deferred operation is pending.
    pub fn save_entry_later(&mut self, draft: EntryDraft) -> bool {
        self.defer(DeferredAction::SaveNew(draft))
    }

    pub fn save_edit_later(&mut self, id: &str, draft: EntryDraft) -> bool {
        self.defer(DeferredAction::SaveEdit {
            id: id.to_string(),
            draft,
        })
    }

    pub fn delete_entry_later(&mut self, id: &str) -> bool {
        self.defer(DeferredAction::Delete { id: id.to_string() })
    }

    pub fn has_pending_deferred(&self) -> bool {
        self.pending.is_some()
    }

    /// Run the pending deferred operation if its delay has elapsed.
    /// Returns true when one was applied.
    pub fn poll_deferred(&mut self) -> bool {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|op| Instant::now() >= op.due_at);
        if !due {
            return false;
        }
        let Some(op) = self.pending.take() else {
            return false;
        };
        match op.action {
            DeferredAction::SaveNew(draft) => {
                self.add_entry(&draft);
            }
            DeferredAction::SaveEdit { id, draft } => {
                self.edit_entry(&id, &draft);
            }
            DeferredAction::Delete { id } => {
                self.remove_entry(&id);
            }
        }
        true
    }

    fn defer(&mut self, action: DeferredAction) -> bool {
        if self.pending.is_some() {
            warn!("deferred operation already pending, request refused");
            return false;
        }
        self.pending = Some(DeferredOp {
            action,
            due_at: Instant::now() + Duration::from_millis(self.config.save_latency_ms),
        });
        true
    }
}
