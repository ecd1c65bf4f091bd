//! Logging facilities for Horizon TableKit.
//!
//! Horizon TableKit uses the `tracing` crate for instrumentation. To see
//! logs, install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     // Initialize tracing (you can customize this)
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! The constants in [`targets`] and [`span_names`] match the `target:`
//! strings used at every call site, so `EnvFilter` directives can scope
//! output to a single subsystem:
//!
//! ```text
//! RUST_LOG=horizon_tablekit::diff=trace,horizon_tablekit::binding=debug
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal emission.
    pub const SIGNAL: &str = "horizon_tablekit_core::signal";
    /// Thread affinity violations.
    pub const THREAD_CHECK: &str = "horizon_tablekit_core::thread_check";
    /// Visibility resolution.
    pub const VISIBILITY: &str = "horizon_tablekit::visibility";
    /// Diff computation.
    pub const DIFF: &str = "horizon_tablekit::diff";
    /// Descriptor registry lookups.
    pub const REGISTRY: &str = "horizon_tablekit::registry";
    /// Binding reload protocol.
    pub const BINDING: &str = "horizon_tablekit::binding";
}

/// Span names used throughout Horizon TableKit for tracing.
///
/// These constants can be used to filter traces for specific operations.
pub mod span_names {
    /// Full reload: resolve visibility, diff, notify.
    pub const RELOAD: &str = "horizon_tablekit::reload";
    /// Nested diff computation span.
    pub const DIFF: &str = "horizon_tablekit::diff";
    /// Visible projection resolution span.
    pub const RESOLVE_VISIBLE: &str = "horizon_tablekit::resolve_visible";
}
