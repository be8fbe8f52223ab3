// SPDX-License-Identifier: MPL-2.0
//! The editing core: session state machine, history, crop and viewport
//! mapping, layer edits, background jobs and export flattening.
//!
//! # Modules
//!
//! - [`session`]: [`EditSession`], the single entry point for edits
//! - [`history`]: Bounded undo/redo of edit snapshots
//! - [`crop`]: Edit modes and preset crop ratios
//! - [`viewport`]: View ↔ raster coordinate mapping
//! - [`layer_edit`]: Batched layer changes from gestures and dialogs
//! - [`worker`]: Single-slot background runner with cancellation
//! - [`flatten`]: Compositing and JPEG export

pub mod crop;
pub mod flatten;
pub mod history;
pub mod layer_edit;
pub mod session;
pub mod viewport;
pub mod worker;

pub use crop::{CropRatio, EditMode};
pub use flatten::{composition_order, export_file_name, ExportJob, ExportSettings};
pub use history::{EditSnapshot, HistoryStack};
pub use layer_edit::{LayerEdit, TextStyleEdit};
pub use session::EditSession;
pub use viewport::Viewport;
pub use worker::{CancelFlag, FilterJob, FilteredImage, PendingTask, TaskSlot};
