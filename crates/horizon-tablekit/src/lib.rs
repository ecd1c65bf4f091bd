//! Horizon TableKit - declarative data binding for table/list views.
//!
//! Application code describes table content (sections, rows, per-type
//! behaviors) as plain data. This library resolves which of that content is
//! visible, computes minimal animated diffs between consecutive versions of
//! it, and exposes the query surface an imperative table-view adapter needs
//! (counts, row/section lookups, descriptor resolution). The adapter itself
//! (cell reuse, layout, gesture handling) stays on the platform side.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Application │────>│ TableBinding │────>│ Presentation │
//! │ (sections)  │     │ resolve/diff │     │ (platform)   │
//! └─────────────┘     └──────────────┘     └──────────────┘
//!                        │          │
//!             ┌──────────┴───┐   ┌──┴─────────────────┐
//!             │  Visibility  │   │ DescriptorRegistry │
//!             │ (predicates) │   │ (tag -> behavior)  │
//!             └──────────────┘   └────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use horizon_tablekit::prelude::*;
//!
//! let binding = TableBinding::builder()
//!     .sections(vec![Section::eager(
//!         "fruits",
//!         vec![
//!             Row::diffable("label-cell", "apple".to_string()),
//!             Row::diffable("label-cell", "pear".to_string()),
//!         ],
//!     )])
//!     .build();
//!
//! // React to structural updates.
//! binding.signals().reload.connect(|update| {
//!     println!("sections changed: {}", !update.diff.sections.is_empty());
//! });
//!
//! // Replace the content wholesale; the diff drives incremental animation.
//! let update = binding.set_sections(vec![Section::eager(
//!     "fruits",
//!     vec![Row::diffable("label-cell", "pear".to_string())],
//! )]);
//! assert_eq!(update.diff.rows[0].script.deletions, vec![0]);
//! ```

pub use horizon_tablekit_core::*;

pub mod binding;
pub mod diff;
pub mod error;
pub mod model;
pub mod prelude;
pub mod registry;
pub mod visibility;
