//! Arena-backed work-order tree.
//!
//! Nodes are addressed by id; each parent keeps an ordered list of child
//! ids and each child a `parent_id` back-reference. Keeping both in one
//! arena avoids the dual-source-of-truth problem of maintaining a nested
//! structure and a flat index side by side.

pub mod nav;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::model::{Priority, WorkOrder, WorkOrderId, WorkOrderStatus};

pub use nav::Navigator;

#[derive(Debug, Clone, Default)]
pub struct WorkOrderTree {
    nodes: HashMap<WorkOrderId, WorkOrder>,
    children: HashMap<WorkOrderId, Vec<WorkOrderId>>,
    // Top-level ids (no parent), in display order
    roots: Vec<WorkOrderId>,
    next_id: WorkOrderId,
}

impl WorkOrderTree {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Build a tree from flat sample data: the orders plus explicit child
    /// lists `(parent, children)` in display order. Orders whose parent has
    /// no child list entry are treated as top-level.
    pub fn from_sample(
        orders: Vec<WorkOrder>,
        child_lists: Vec<(WorkOrderId, Vec<WorkOrderId>)>,
    ) -> Self {
        let mut tree = Self::new();
        for order in orders {
            tree.next_id = tree.next_id.max(order.id + 1);
            if order.parent_id.is_none() {
                tree.roots.push(order.id);
            }
            tree.nodes.insert(order.id, order);
        }
        for (parent, kids) in child_lists {
            tree.children.insert(parent, kids);
        }
        tree
    }

    pub fn get(&self, id: WorkOrderId) -> Option<&WorkOrder> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: WorkOrderId) -> Option<&mut WorkOrder> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: WorkOrderId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level work-order ids in display order.
    pub fn top_level(&self) -> &[WorkOrderId] {
        &self.roots
    }

    /// Ordered child ids of `id` (empty slice for leaves).
    pub fn children_of(&self, id: WorkOrderId) -> &[WorkOrderId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Create a new top-level work order.
    pub fn create_order(&mut self, title: &str, priority: Priority) -> WorkOrderId {
        let id = self.alloc_id();
        self.nodes.insert(id, Self::blank(id, None, title, priority));
        self.roots.push(id);
        debug!(id, title, "created top-level work order");
        id
    }

    /// Create a sub work order under `parent`, appended to the end of its
    /// child list. Returns None if the parent does not exist.
    pub fn create_sub_order(
        &mut self,
        parent: WorkOrderId,
        title: &str,
        priority: Priority,
    ) -> Option<WorkOrderId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = self.alloc_id();
        self.nodes
            .insert(id, Self::blank(id, Some(parent), title, priority));
        self.children.entry(parent).or_default().push(id);
        debug!(id, parent, title, "created sub work order");
        Some(id)
    }

    /// Pre-order traversal of all descendants of `id` (not including `id`
    /// itself). Carries a visited set so a corrupted, cyclic shape still
    /// terminates and yields each node at most once.
    pub fn flatten_descendants(&self, id: WorkOrderId) -> Vec<WorkOrderId> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(id);
        self.flatten_into(id, &mut visited, &mut out);
        out
    }

    fn flatten_into(
        &self,
        id: WorkOrderId,
        visited: &mut HashSet<WorkOrderId>,
        out: &mut Vec<WorkOrderId>,
    ) {
        for &child in self.children_of(id) {
            if !visited.insert(child) {
                continue;
            }
            out.push(child);
            self.flatten_into(child, visited, out);
        }
    }

    fn alloc_id(&mut self) -> WorkOrderId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn blank(
        id: WorkOrderId,
        parent_id: Option<WorkOrderId>,
        title: &str,
        priority: Priority,
    ) -> WorkOrder {
        WorkOrder {
            id,
            parent_id,
            title: title.to_string(),
            status: WorkOrderStatus::Open,
            priority,
            start_date: None,
            due_date: None,
        }
    }
}
