//! # Introduction
//!
//! quadtty is a terminal compiler playground for a mini-C language. Source
//! typed into the left pane is compiled on demand; the right column shows the
//! compiler's artifacts in nine collapsible sections, from the token stream
//! through quadruple intermediate code down to 8086 assembly.
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Lexer → Parser → Quadruples → Assembly
//!            │                   │
//!            ▼                   ▼
//!     category tables       symbol table
//! ```
//!
//! 1. [`compiler`] — the pipeline: lexer, recursive-descent parser, quadruple
//!    generator with constant folding, symbol table, and 8086 backend.
//! 2. [`ui`] — ratatui-based TUI: split-pane editor/output layout with a
//!    draggable splitter and collapsible output sections; not part of the
//!    stable library API.
//! 3. [`config`] — TOML configuration in the platform config directory.
//! 4. [`logger`] — file logger, since the TUI owns the terminal.
//!
//! ## Supported mini-C subset
//!
//! Types: `int`, `char`, `string`, fixed-size arrays.
//! Control flow: `if/else`, `while`, `return`.
//! Functions with typed parameters and calls as statements or expressions.

pub mod compiler;
pub mod config;
pub mod logger;
pub mod ui;
