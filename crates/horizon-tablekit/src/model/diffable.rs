//! Identity and content-equality protocol for diffable items.
//!
//! Anything that can appear in a diffed section exposes two capabilities:
//! a stable *diff identifier* used to match items across two versions of the
//! content, and a *content-equality* check used to decide whether a matched
//! item needs an in-place re-render.

use std::any::Any;

/// Capability of participating in diff computation.
///
/// # Diff identifier
///
/// [`diff_identifier`](Diffable::diff_identifier) must be stable across
/// content changes and unique within one comparison. It is how the engine
/// recognizes "the same item" in the old and new projections. It is *not*
/// the descriptor identifier: the descriptor identifier selects rendering
/// behavior for a whole class of rows, while the diff identifier names one
/// item instance.
///
/// # Content equality
///
/// [`is_equal_to`](Diffable::is_equal_to) is a *partial* relation, not an
/// equivalence: it must return `false`, never panic, when `other` is
/// absent or has an incompatible underlying type. Downcasting goes through
/// [`as_any`](Diffable::as_any).
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use horizon_tablekit::model::Diffable;
///
/// struct Contact {
///     id: u64,
///     name: String,
/// }
///
/// impl Diffable for Contact {
///     fn diff_identifier(&self) -> String {
///         format!("contact-{}", self.id)
///     }
///
///     fn is_equal_to(&self, other: Option<&dyn Diffable>) -> bool {
///         other
///             .and_then(|o| o.as_any().downcast_ref::<Contact>())
///             .is_some_and(|o| o.id == self.id && o.name == self.name)
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
/// ```
pub trait Diffable: Send + Sync {
    /// A stable string identifying this item across versions of the content.
    fn diff_identifier(&self) -> String;

    /// Whether this item's content equals `other`'s.
    ///
    /// Must return `false` for `None` and for values of a different
    /// underlying type.
    fn is_equal_to(&self, other: Option<&dyn Diffable>) -> bool;

    /// Accessor used by implementations to downcast `other` in
    /// [`is_equal_to`](Diffable::is_equal_to).
    fn as_any(&self) -> &dyn Any;
}

/// A plain string's identity is its value.
///
/// This is the base case used pervasively for untyped content such as titles
/// and simple labels: two strings are equal iff value-equal, whether stored
/// as `String` or `&'static str`.
impl Diffable for String {
    fn diff_identifier(&self) -> String {
        self.clone()
    }

    fn is_equal_to(&self, other: Option<&dyn Diffable>) -> bool {
        string_value(other).is_some_and(|s| s == self.as_str())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Diffable for &'static str {
    fn diff_identifier(&self) -> String {
        (*self).to_owned()
    }

    fn is_equal_to(&self, other: Option<&dyn Diffable>) -> bool {
        string_value(other).is_some_and(|s| s == *self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Extracts a string view from a diffable value of either string type.
fn string_value<'a>(value: Option<&'a dyn Diffable>) -> Option<&'a str> {
    let any = value?.as_any();
    if let Some(s) = any.downcast_ref::<String>() {
        return Some(s.as_str());
    }
    any.downcast_ref::<&'static str>().copied()
}
