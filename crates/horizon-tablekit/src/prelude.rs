//! Prelude module for Horizon TableKit.
//!
//! This module re-exports the most commonly used types for convenient
//! importing:
//!
//! ```ignore
//! use horizon_tablekit::prelude::*;
//! ```
//!
//! This provides access to:
//! - The item/section model (`Row`, `Section`, `Diffable`)
//! - Visibility resolution (`VisibilityConfig`, `resolve_visible`)
//! - The diff engine (`diff`, `compute_updates`, `NestedDiff`)
//! - The descriptor registry (`DescriptorRegistry`, `RowDescriptor`)
//! - The table binding (`TableBinding`, `ReloadUpdate`)
//! - Signals (`Signal`, `ConnectionId`)

// ============================================================================
// Model
// ============================================================================

pub use crate::model::{
    Diffable, Row, Section, SectionRows, SeparatorContext, SeparatorStyle,
};

// ============================================================================
// Visibility
// ============================================================================

pub use crate::visibility::{VisibilityConfig, VisibilityConfigBuilder, resolve_visible};

// ============================================================================
// Diff Engine
// ============================================================================

pub use crate::diff::{
    EditScript, Move, NestedDiff, RowPosition, RowUpdate, SectionRowScript, compute_updates,
    diff, flatten,
};

// ============================================================================
// Descriptor Registry
// ============================================================================

pub use crate::registry::{
    DescriptorRegistry, DescriptorResolver, RowDescriptor, SectionDescriptor,
};

// ============================================================================
// Binding
// ============================================================================

pub use crate::binding::{BindingSignals, ReloadUpdate, TableBinding, TableBindingBuilder};

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{BindingError, RegistryError};

// ============================================================================
// Signal/Slot System
// ============================================================================

pub use horizon_tablekit_core::{ConnectionGuard, ConnectionId, Signal, ThreadAffinity};
