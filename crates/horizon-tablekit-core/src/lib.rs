//! Core systems for Horizon TableKit.
//!
//! This crate provides the foundational components of the Horizon TableKit
//! data-binding library:
//!
//! - **Signal/Slot System**: Type-safe change notification between the
//!   binding layer and its consumers
//! - **Thread Affinity Checks**: Debug assertions backing the single-thread
//!   update discipline of the binding layer
//! - **Logging Targets**: Stable `tracing` target names for filtering
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_tablekit_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Thread Affinity Example
//!
//! ```
//! use horizon_tablekit_core::ThreadAffinity;
//!
//! struct Binding {
//!     affinity: ThreadAffinity,
//! }
//!
//! impl Binding {
//!     fn new() -> Self {
//!         Self { affinity: ThreadAffinity::current() }
//!     }
//!
//!     fn reload(&self) {
//!         self.affinity.debug_assert_same_thread("reload");
//!         // ... safe to mutate state ...
//!     }
//! }
//! ```

pub mod logging;
pub mod signal;
pub mod thread_check;

pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use thread_check::ThreadAffinity;
