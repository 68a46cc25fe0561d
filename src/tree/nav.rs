//! Breadcrumb navigation over the work-order tree.
//!
//! The breadcrumb stack records the path the user actually descended
//! through, not the full ancestor chain. Top of stack is the current
//! navigation context; an empty stack is the top-level list view.

use tracing::{debug, warn};

use crate::error::EngineError;
use crate::model::WorkOrderId;
use crate::tree::WorkOrderTree;

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    breadcrumbs: Vec<WorkOrderId>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The node whose children are listed, or None for the top-level view.
    pub fn current(&self) -> Option<WorkOrderId> {
        self.breadcrumbs.last().copied()
    }

    /// The visited path, root-most first.
    pub fn breadcrumbs(&self) -> &[WorkOrderId] {
        &self.breadcrumbs
    }

    /// Step into `id`. Descending into the node already on top of the
    /// stack is a no-op, so a double click does not stack duplicates.
    pub fn descend(&mut self, id: WorkOrderId) {
        if self.breadcrumbs.last() == Some(&id) {
            return;
        }
        debug!(id, depth = self.breadcrumbs.len() + 1, "descend");
        self.breadcrumbs.push(id);
    }

    /// Jump back to `id`, dropping everything descended after it. The UI
    /// only offers breadcrumb entries as targets, so a miss is a caller
    /// bug and is reported rather than silently corrected.
    pub fn ascend_to(&mut self, id: WorkOrderId) -> Result<(), EngineError> {
        let Some(pos) = self.breadcrumbs.iter().position(|&b| b == id) else {
            warn!(id, "ascend_to target not on breadcrumb path");
            return Err(EngineError::Navigation { id });
        };
        self.breadcrumbs.truncate(pos + 1);
        Ok(())
    }

    /// Pop one level; on an empty stack the current view becomes the
    /// top-level list.
    pub fn ascend_one(&mut self) {
        self.breadcrumbs.pop();
    }

    /// Back to the top-level list view.
    pub fn reset(&mut self) {
        self.breadcrumbs.clear();
    }

    /// Ids listed in the current context: the current node's children, or
    /// the top-level orders when no node is current.
    pub fn visible_children<'t>(&self, tree: &'t WorkOrderTree) -> &'t [WorkOrderId] {
        match self.current() {
            Some(id) => tree.children_of(id),
            None => tree.top_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample_work_orders;

    fn sample_tree() -> WorkOrderTree {
        let (orders, children) = sample_work_orders();
        WorkOrderTree::from_sample(orders, children)
    }

    #[test]
    fn descend_is_idempotent_on_top_of_stack() {
        let mut nav = Navigator::new();
        nav.descend(1);
        nav.descend(1);
        assert_eq!(nav.breadcrumbs(), &[1]);
        assert_eq!(nav.current(), Some(1));
    }

    #[test]
    fn ascend_to_truncates_the_path() {
        let tree = sample_tree();
        let mut nav = Navigator::new();
        nav.descend(1);
        nav.descend(2); // child of 1
        nav.ascend_to(1).unwrap();
        assert_eq!(nav.breadcrumbs(), &[1]);
        assert_eq!(nav.current(), Some(1));
        // 1's children (including 2) are listed again
        assert_eq!(nav.visible_children(&tree), &[2, 3]);
    }

    #[test]
    fn ascend_to_unvisited_node_is_an_error() {
        let mut nav = Navigator::new();
        nav.descend(1);
        assert_eq!(
            nav.ascend_to(5),
            Err(EngineError::Navigation { id: 5 })
        );
        // Path untouched on error
        assert_eq!(nav.breadcrumbs(), &[1]);
    }

    #[test]
    fn ascend_one_falls_back_to_top_level() {
        let tree = sample_tree();
        let mut nav = Navigator::new();
        nav.descend(1);
        nav.ascend_one();
        assert_eq!(nav.current(), None);
        assert_eq!(nav.visible_children(&tree), tree.top_level());
        // Popping the empty stack stays at top level
        nav.ascend_one();
        assert_eq!(nav.current(), None);
    }

    #[test]
    fn visible_children_follow_the_current_node() {
        let tree = sample_tree();
        let mut nav = Navigator::new();
        assert_eq!(nav.visible_children(&tree), &[1, 5]);
        nav.descend(1);
        assert_eq!(nav.visible_children(&tree), &[2, 3]);
        nav.descend(2);
        assert_eq!(nav.visible_children(&tree), &[4]);
    }
}
