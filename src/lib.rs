//! workgrid: the in-memory engine behind a maintenance-management
//! work-order page: a breadcrumb-navigated work-order hierarchy plus a
//! weekly timesheet grid with fixed 15-minute slots.
//!
//! The rendering layer is out of scope; hosts feed UI events into
//! [`store::Scheduler`] and read back [`grid::WeekSnapshot`] and the
//! navigator's visible list. All data is memory-resident.

pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod model;
pub mod selection;
pub mod store;
pub mod tree;

pub use config::{Config, ViewMode};
pub use error::EngineError;
pub use grid::resize::{apply_resize, ResizeController, ResizeEdge, ResizeOutcome};
pub use grid::{compute_week, DaySnapshot, GridEngine, WeekDirection, WeekSnapshot};
pub use model::{EntryDraft, TimesheetEntry, WorkOrder, WorkOrderId};
pub use selection::Selection;
pub use store::Scheduler;
pub use tree::{Navigator, WorkOrderTree};
