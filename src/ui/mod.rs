//! Terminal user interface for the compiler playground
//!
//! The screen is a two-pane split: source editor on the left, the collapsible
//! compiler-output sections on the right, separated by a draggable splitter
//! column, with a one-line status bar at the bottom.
//!
//! # Architecture
//!
//! - `app` - Event loop, focus, and mouse gesture synthesis
//! - `split` - Two-pane resizer state machine
//! - `sections` - Collapse/expand state for the output sections
//! - `reflow` - Deferred re-measurement timer
//! - `editor` - Editable source buffer
//! - `panes` - Per-pane rendering
//! - `theme` - Color scheme

pub mod app;
pub mod editor;
pub mod panes;
pub mod reflow;
pub mod sections;
pub mod split;
pub mod theme;

pub use app::{App, SubmitFn, SubmitOutcome};
