//! Core data model for the Mender repair pipeline.
//!
//! This crate provides the canonical type definitions shared by every stage
//! of the pipeline: byte spans, text edits, edit sets with their
//! merge/conflict-resolution algorithm, the right-to-left edit applier,
//! versioned source buffers, diagnostics, and the machine-readable run
//! report.
//!
//! # Core types
//!
//! - [`Span`] — a half-open byte range over UTF-8 source
//! - [`TextEdit`] and [`EditSet`] — span-scoped replacements for one file
//! - [`merge`] and [`MergeOutcome`] — deterministic conflict resolution
//! - [`apply_edits`] — pure, drift-free edit application
//! - [`SourceBuffer`] — a versioned, persistable view of one file
//! - [`Diagnostic`] and [`Severity`] — analysis findings
//! - [`RunReport`] — the sole success signal of a run
//!
//! # Example
//!
//! ```
//! use mender_core::{Span, TextEdit, apply_edits};
//!
//! let edits = vec![TextEdit::replace(Span::new(4, 5), "there")];
//! let applied = apply_edits("say world", &edits).expect("edits fit");
//! assert_eq!(applied.content(), "say there");
//! ```

mod apply;
mod buffer;
mod diagnostic;
mod edit;
mod edit_set;
mod error;
mod merge;
mod report;
mod span;

pub use apply::{Applied, apply_edits};
pub use buffer::SourceBuffer;
pub use diagnostic::{Diagnostic, Severity};
pub use edit::TextEdit;
pub use edit_set::EditSet;
pub use error::CoreError;
pub use merge::{MergeOutcome, merge};
pub use report::RunReport;
pub use span::Span;
