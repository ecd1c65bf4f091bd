//! Error types for Horizon TableKit.
//!
//! Two classes of failure exist in this library, and they are handled very
//! differently:
//!
//! - **Caller-contract violations** (an unregistered descriptor identifier
//!   reaching resolution, a reload re-entered while a previous reload is
//!   still being applied) are surfaced loudly, at the point of misuse. The
//!   fallible `try_*`/`resolve_*` entry points return these errors; the
//!   infallible variants panic.
//! - **Degenerate diff input** (duplicate diff identifiers, rows without an
//!   identity) is never an error. The diff engine degrades to treating such
//!   items as distinct, because an extra reload is safe while a wrong match
//!   is not.
//!
//! Out-of-range queries are neither: they return `None` and mean "nothing
//! to do".

use thiserror::Error;

/// Errors raised by descriptor resolution.
///
/// An unknown identifier reaching resolution means application code built a
/// row or section whose type tag was never registered; that is a programming
/// error, signalled here at lookup time rather than deferred to render time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No row descriptor is registered for the given identifier, and no
    /// fallback resolver or default supplied one.
    #[error("no row descriptor registered for identifier `{0}`")]
    UnknownRowDescriptor(String),

    /// No section descriptor is registered for the given key, and no
    /// fallback resolver or default supplied one.
    #[error("no section descriptor registered for key `{0}`")]
    UnknownSectionDescriptor(String),
}

/// Errors raised by the table binding's update protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// A structural reload was requested while a previous reload's diff was
    /// still being applied. Stale indices would be handed to the platform
    /// animation calls; the nested reload is refused instead.
    #[error("reload re-entered while a previous reload was being applied")]
    ReentrantReload,
}
