//! Row model: a descriptor identifier plus an opaque payload.
//!
//! A row never carries rendering logic itself. Its descriptor identifier
//! selects a [`RowDescriptor`](crate::registry::RowDescriptor) from the
//! registry, and its payload is handed to that descriptor's callbacks. The
//! binding core inspects only the descriptor identifier and the optional
//! [`Diffable`] capability; payload contents are opaque to it.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::diffable::Diffable;

/// Type alias for a lazy payload producer.
///
/// Invoked the first time the payload is actually needed (at render time,
/// never during diff computation).
pub type LazyProducer = Arc<dyn Fn() -> Arc<dyn Any + Send + Sync> + Send + Sync>;

/// Payload storage for a row.
#[derive(Clone)]
enum RowPayload {
    /// Payload materialized up front.
    Eager(Arc<dyn Any + Send + Sync>),
    /// Payload produced on demand.
    Lazy(LazyProducer),
}

/// One row of table content.
///
/// A row is cheap to clone: the payload is shared behind an `Arc`.
///
/// # Identity
///
/// Rows built with [`Row::diffable`] expose the payload's [`Diffable`]
/// capability and can be matched across old/new versions of the content.
/// Rows built with [`Row::new`] or [`Row::lazy`] expose no identity and are
/// always treated as distinct by the diff engine: never matched, never
/// moved, never updated in place. Lazy rows in particular are never forced
/// merely to compute a diff.
///
/// # Example
///
/// ```
/// use horizon_tablekit::model::Row;
///
/// // A diffable row: a title cell whose identity is the string itself.
/// let title = Row::diffable("title-cell", "Inbox".to_string());
/// assert_eq!(title.diff_identifier().as_deref(), Some("Inbox"));
///
/// // A non-diffable row: always reloaded structurally.
/// let spinner = Row::new("spinner-cell", ());
/// assert!(spinner.diff_identifier().is_none());
/// ```
#[derive(Clone)]
pub struct Row {
    /// Identifier resolving the rendering descriptor. Not a diff identity.
    descriptor: String,
    payload: RowPayload,
    /// The payload's identity/equality capability, when it has one.
    diffable: Option<Arc<dyn Diffable>>,
}

impl Row {
    /// Creates a row with an eager, non-diffable payload.
    pub fn new<T>(descriptor: impl Into<String>, item: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            descriptor: descriptor.into(),
            payload: RowPayload::Eager(Arc::new(item)),
            diffable: None,
        }
    }

    /// Creates a row whose payload participates in diffing.
    ///
    /// The payload and its [`Diffable`] capability are the same allocation;
    /// no copy is made.
    pub fn diffable<T>(descriptor: impl Into<String>, item: T) -> Self
    where
        T: Diffable + 'static,
    {
        let shared = Arc::new(item);
        Self {
            descriptor: descriptor.into(),
            payload: RowPayload::Eager(shared.clone() as Arc<dyn Any + Send + Sync>),
            diffable: Some(shared),
        }
    }

    /// Creates a row whose payload is produced on demand.
    ///
    /// Lazy rows expose no diff identity: producing one would force the
    /// payload, and diff computation must not do that.
    pub fn lazy<T, F>(descriptor: impl Into<String>, producer: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            descriptor: descriptor.into(),
            payload: RowPayload::Lazy(Arc::new(move || Arc::new(producer()))),
            diffable: None,
        }
    }

    /// The identifier resolving this row's rendering descriptor.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Whether the payload is produced on demand.
    pub fn is_lazy(&self) -> bool {
        matches!(self.payload, RowPayload::Lazy(_))
    }

    /// Whether this row can be matched across versions of the content.
    pub fn is_diffable(&self) -> bool {
        self.diffable.is_some()
    }

    /// The payload's diffable capability, when it has one.
    pub fn diffable_payload(&self) -> Option<&dyn Diffable> {
        self.diffable.as_deref()
    }

    /// This row's diff identifier, or `None` for non-diffable rows.
    pub fn diff_identifier(&self) -> Option<String> {
        self.diffable.as_ref().map(|d| d.diff_identifier())
    }

    /// Whether this row's content equals `other`'s.
    ///
    /// `false` unless both rows are diffable and their contents compare
    /// equal; identity is not consulted here.
    pub fn is_content_equal_to(&self, other: &Row) -> bool {
        match (&self.diffable, &other.diffable) {
            (Some(a), Some(b)) => a.is_equal_to(Some(b.as_ref())),
            _ => false,
        }
    }

    /// The payload, downcast to its concrete type.
    ///
    /// Returns `None` if the payload has a different type. For lazy rows this
    /// forces the producer; call it from rendering code only.
    pub fn payload<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.resolve_payload().downcast::<T>().ok()
    }

    /// The payload, downcast to its concrete type, panicking on mismatch.
    ///
    /// A mismatch means the descriptor registered for this row's identifier
    /// expects a different payload type than the row carries, a programming
    /// error, surfaced immediately.
    #[track_caller]
    pub fn expect_payload<T>(&self) -> Arc<T>
    where
        T: Any + Send + Sync,
    {
        match self.payload::<T>() {
            Some(payload) => payload,
            None => panic!(
                "row `{}` payload is not a `{}`",
                self.descriptor,
                std::any::type_name::<T>(),
            ),
        }
    }

    /// Materializes the payload, invoking the producer for lazy rows.
    fn resolve_payload(&self) -> Arc<dyn Any + Send + Sync> {
        match &self.payload {
            RowPayload::Eager(payload) => payload.clone(),
            RowPayload::Lazy(producer) => producer(),
        }
    }
}

impl fmt::Debug for Row {
    /// Prints identity without forcing lazy payloads.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("descriptor", &self.descriptor)
            .field("diff_identifier", &self.diff_identifier())
            .field("lazy", &self.is_lazy())
            .finish()
    }
}

static_assertions::assert_impl_all!(Row: Send, Sync, Clone);
