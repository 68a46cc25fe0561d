//! Bulk-selection overlay for the work-order list.
//!
//! A plain id set scoped to whatever list the navigator currently shows.
//! Bulk status changes iterate the selected ids in stable order and then
//! clear; there is deliberately no rollback on partial failure.

use std::collections::HashSet;

use crate::model::WorkOrderId;

#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: HashSet<WorkOrderId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: WorkOrderId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Select every id in the currently visible list.
    pub fn select_all(&mut self, visible: &[WorkOrderId]) {
        self.ids.extend(visible.iter().copied());
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_selected(&self, id: WorkOrderId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending order, so bulk updates apply in a stable
    /// order.
    pub fn sorted_ids(&self) -> Vec<WorkOrderId> {
        let mut ids: Vec<WorkOrderId> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}
