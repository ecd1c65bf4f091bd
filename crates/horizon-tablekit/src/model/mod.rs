//! Item/section model for Horizon TableKit.
//!
//! The model is a two-level tree: an ordered sequence of [`Section`]s, each
//! an ordered sequence of [`Row`]s. Rows and sections carry opaque payloads
//! plus a descriptor identifier; items that should survive content changes
//! across reloads additionally expose the [`Diffable`] capability.
//!
//! The model is rebuilt wholesale by application code on each data change;
//! there is no incremental mutation API. The visibility resolver and the
//! diff engine consume immutable snapshots of it.
//!
//! # Core Types
//!
//! - [`Diffable`]: identity + content-equality protocol
//! - [`Row`]: descriptor identifier + opaque payload, optionally diffable
//! - [`Section`]: key + optional content + rows in one of three variants
//! - [`SectionRows`]: the closed variant set (eager / on-demand / separated)

mod diffable;
mod row;
mod section;

pub use diffable::Diffable;
pub use row::{LazyProducer, Row};
pub use section::{
    RowCountProducer, RowProducer, Section, SectionRows, SeparatorContext, SeparatorFactory,
    SeparatorStyle,
};
