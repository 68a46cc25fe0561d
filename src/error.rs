use thiserror::Error;

use crate::model::WorkOrderId;

/// Errors surfaced by the scheduling engine.
///
/// Resize rejections are not errors (see [`crate::grid::resize::ResizeOutcome`]);
/// they are a normal "no change happened" result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A wall-clock string was not "HH:MM" with a valid hour and minute.
    #[error("malformed time string: {input:?}")]
    Format { input: String },

    /// `ascend_to` was called with a work order that is not on the current
    /// breadcrumb path. The UI only offers breadcrumb entries as targets, so
    /// this indicates a caller bug rather than a user mistake.
    #[error("work order {id} is not on the breadcrumb path")]
    Navigation { id: WorkOrderId },
}
