//! Individual pane rendering modules
//!
//! Each pane owns its own drawing code and, where it makes sense, the pure
//! geometry helpers the event loop uses to hit-test clicks against what was
//! drawn.

pub mod output;
pub mod source;
pub mod status;
