//! Descriptor registry: mapping type tags to behavior bundles.
//!
//! A descriptor is a bundle of optional callbacks describing how rows or
//! sections of one type behave: whether they are hidden, how tall they are,
//! how their view is configured, how they react to selection. Behaviors are
//! plain data, a struct of optional function fields, so a dataset-wide
//! default can stand in for anything left unset.
//!
//! Resolution walks an explicit, ordered chain: the registry's own map,
//! then each fallback resolver in registration order, then the dataset
//! default. An identifier that exhausts the chain means an unregistered
//! type reached the UI: a programming error, surfaced at lookup time,
//! either as [`RegistryError`] from the `resolve_*` methods or as a panic
//! from the `expect_*` variants.
//!
//! The diff/visibility core never evaluates rendering callbacks; it reads
//! only the `hidden` fields (via [`DescriptorRegistry::visibility_config`])
//! and otherwise treats descriptor presence as an opaque predicate.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::diff::RowPosition;
use crate::error::RegistryError;
use crate::model::{Row, Section};
use crate::visibility::VisibilityConfig;

/// Type alias for a row height callback. Units are presentation points.
pub type RowHeightFn = Arc<dyn Fn(&Row) -> f32 + Send + Sync>;

/// Type alias for a row view-configuration callback.
///
/// The second argument is the platform view object, opaque to this library.
pub type RowConfigureFn = Arc<dyn Fn(&Row, &mut dyn Any) + Send + Sync>;

/// Type alias for a row selection callback.
pub type RowSelectFn = Arc<dyn Fn(&Row, RowPosition) + Send + Sync>;

/// Type alias for a row hide predicate carried by a descriptor.
pub type RowHiddenFn = Arc<dyn Fn(&Row) -> bool + Send + Sync>;

/// Type alias for a section header height callback.
pub type SectionHeightFn = Arc<dyn Fn(&Section) -> f32 + Send + Sync>;

/// Type alias for a section header view-configuration callback.
pub type SectionConfigureFn = Arc<dyn Fn(&Section, &mut dyn Any) + Send + Sync>;

/// Type alias for a section hide predicate carried by a descriptor.
pub type SectionHiddenFn = Arc<dyn Fn(&Section) -> bool + Send + Sync>;

/// Behavior bundle for one row type.
///
/// Every field is optional; unset behaviors fall through to the dataset
/// default at use time.
///
/// # Example
///
/// ```
/// use horizon_tablekit::registry::RowDescriptor;
///
/// let descriptor = RowDescriptor::new()
///     .with_height(|_| 44.0)
///     .with_on_select(|row, position| {
///         println!("selected {} at {:?}", row.descriptor(), position);
///     });
/// ```
#[derive(Clone, Default)]
pub struct RowDescriptor {
    /// Per-type hide predicate, consulted by visibility resolution.
    pub hidden: Option<RowHiddenFn>,
    /// Row height, when it differs from the view's default.
    pub height: Option<RowHeightFn>,
    /// Configures the platform view for a row.
    pub configure: Option<RowConfigureFn>,
    /// Reaction to the row being selected.
    pub on_select: Option<RowSelectFn>,
}

impl RowDescriptor {
    /// Creates a descriptor with no behaviors set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hide predicate.
    pub fn with_hidden<F>(mut self, hidden: F) -> Self
    where
        F: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.hidden = Some(Arc::new(hidden));
        self
    }

    /// Sets the height callback.
    pub fn with_height<F>(mut self, height: F) -> Self
    where
        F: Fn(&Row) -> f32 + Send + Sync + 'static,
    {
        self.height = Some(Arc::new(height));
        self
    }

    /// Sets the view-configuration callback.
    pub fn with_configure<F>(mut self, configure: F) -> Self
    where
        F: Fn(&Row, &mut dyn Any) + Send + Sync + 'static,
    {
        self.configure = Some(Arc::new(configure));
        self
    }

    /// Sets the selection callback.
    pub fn with_on_select<F>(mut self, on_select: F) -> Self
    where
        F: Fn(&Row, RowPosition) + Send + Sync + 'static,
    {
        self.on_select = Some(Arc::new(on_select));
        self
    }
}

/// Behavior bundle for one section type.
#[derive(Clone, Default)]
pub struct SectionDescriptor {
    /// Per-type hide predicate, consulted by visibility resolution.
    pub hidden: Option<SectionHiddenFn>,
    /// Header height, when the section shows a header.
    pub header_height: Option<SectionHeightFn>,
    /// Configures the platform header view for a section.
    pub configure_header: Option<SectionConfigureFn>,
}

impl SectionDescriptor {
    /// Creates a descriptor with no behaviors set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hide predicate.
    pub fn with_hidden<F>(mut self, hidden: F) -> Self
    where
        F: Fn(&Section) -> bool + Send + Sync + 'static,
    {
        self.hidden = Some(Arc::new(hidden));
        self
    }

    /// Sets the header height callback.
    pub fn with_header_height<F>(mut self, height: F) -> Self
    where
        F: Fn(&Section) -> f32 + Send + Sync + 'static,
    {
        self.header_height = Some(Arc::new(height));
        self
    }

    /// Sets the header view-configuration callback.
    pub fn with_configure_header<F>(mut self, configure: F) -> Self
    where
        F: Fn(&Section, &mut dyn Any) + Send + Sync + 'static,
    {
        self.configure_header = Some(Arc::new(configure));
        self
    }
}

/// A fallback source of descriptors, tried in registration order.
///
/// Implement this to bridge descriptors from another dataset or a shared
/// application-wide pool. Both methods default to "nothing here".
pub trait DescriptorResolver: Send + Sync {
    /// Resolves a row descriptor for the given identifier, if this source
    /// knows it.
    fn resolve_row(&self, _identifier: &str) -> Option<RowDescriptor> {
        None
    }

    /// Resolves a section descriptor for the given key, if this source
    /// knows it.
    fn resolve_section(&self, _key: &str) -> Option<SectionDescriptor> {
        None
    }
}

/// Maps row/section type tags to their behavior bundles.
#[derive(Clone, Default)]
pub struct DescriptorRegistry {
    rows: HashMap<String, RowDescriptor>,
    sections: HashMap<String, SectionDescriptor>,
    fallbacks: Vec<Arc<dyn DescriptorResolver>>,
    default_row: Option<RowDescriptor>,
    default_section: Option<SectionDescriptor>,
}

impl DescriptorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the descriptor for a row type, replacing any previous one.
    pub fn register_row(&mut self, identifier: impl Into<String>, descriptor: RowDescriptor) {
        self.rows.insert(identifier.into(), descriptor);
    }

    /// Registers the descriptor for a section key, replacing any previous one.
    pub fn register_section(&mut self, key: impl Into<String>, descriptor: SectionDescriptor) {
        self.sections.insert(key.into(), descriptor);
    }

    /// Appends a fallback resolver to the chain.
    ///
    /// Fallbacks are consulted in the order they were added, after the
    /// registry's own map and before the dataset default.
    pub fn push_fallback(&mut self, resolver: Arc<dyn DescriptorResolver>) {
        self.fallbacks.push(resolver);
    }

    /// Sets the dataset-wide default row descriptor.
    pub fn set_default_row(&mut self, descriptor: RowDescriptor) {
        self.default_row = Some(descriptor);
    }

    /// Sets the dataset-wide default section descriptor.
    pub fn set_default_section(&mut self, descriptor: SectionDescriptor) {
        self.default_section = Some(descriptor);
    }

    /// Whether a row descriptor is directly registered for the identifier.
    ///
    /// Fallbacks and the default do not count; this is the opaque
    /// "is this type known here" predicate.
    pub fn has_row(&self, identifier: &str) -> bool {
        self.rows.contains_key(identifier)
    }

    /// Whether a section descriptor is directly registered for the key.
    pub fn has_section(&self, key: &str) -> bool {
        self.sections.contains_key(key)
    }

    /// Resolves the descriptor for a row identifier.
    ///
    /// Walks: own map, fallback chain in order, dataset default. Returns
    /// [`RegistryError::UnknownRowDescriptor`] when the chain is exhausted.
    pub fn resolve_row(&self, identifier: &str) -> Result<RowDescriptor, RegistryError> {
        if let Some(descriptor) = self.rows.get(identifier) {
            return Ok(descriptor.clone());
        }
        for fallback in &self.fallbacks {
            if let Some(descriptor) = fallback.resolve_row(identifier) {
                tracing::trace!(
                    target: "horizon_tablekit::registry",
                    identifier,
                    "row descriptor resolved by fallback"
                );
                return Ok(descriptor);
            }
        }
        if let Some(descriptor) = &self.default_row {
            return Ok(descriptor.clone());
        }
        tracing::error!(
            target: "horizon_tablekit::registry",
            identifier,
            "unregistered row descriptor reached resolution"
        );
        Err(RegistryError::UnknownRowDescriptor(identifier.to_owned()))
    }

    /// Resolves the descriptor for a section key.
    pub fn resolve_section(&self, key: &str) -> Result<SectionDescriptor, RegistryError> {
        if let Some(descriptor) = self.sections.get(key) {
            return Ok(descriptor.clone());
        }
        for fallback in &self.fallbacks {
            if let Some(descriptor) = fallback.resolve_section(key) {
                tracing::trace!(
                    target: "horizon_tablekit::registry",
                    key,
                    "section descriptor resolved by fallback"
                );
                return Ok(descriptor);
            }
        }
        if let Some(descriptor) = &self.default_section {
            return Ok(descriptor.clone());
        }
        tracing::error!(
            target: "horizon_tablekit::registry",
            key,
            "unregistered section descriptor reached resolution"
        );
        Err(RegistryError::UnknownSectionDescriptor(key.to_owned()))
    }

    /// Resolves a row descriptor, panicking when the chain is exhausted.
    ///
    /// Use from rendering paths where an unknown identifier means the UI is
    /// about to show nothing meaningful: failing fast beats degrading.
    #[track_caller]
    pub fn expect_row(&self, identifier: &str) -> RowDescriptor {
        match self.resolve_row(identifier) {
            Ok(descriptor) => descriptor,
            Err(error) => panic!("{error}"),
        }
    }

    /// Resolves a section descriptor, panicking when the chain is exhausted.
    #[track_caller]
    pub fn expect_section(&self, key: &str) -> SectionDescriptor {
        match self.resolve_section(key) {
            Ok(descriptor) => descriptor,
            Err(error) => panic!("{error}"),
        }
    }

    /// Collects the hide predicates carried by registered descriptors.
    ///
    /// The result is the registry's contribution to visibility resolution;
    /// application-level configuration is layered over it via
    /// [`VisibilityConfig::merged_over`].
    pub fn visibility_config(&self) -> VisibilityConfig {
        let mut config = VisibilityConfig::default();
        for (identifier, descriptor) in &self.rows {
            if let Some(hidden) = &descriptor.hidden {
                config.insert_row_predicate(identifier.clone(), hidden.clone());
            }
        }
        for (key, descriptor) in &self.sections {
            if let Some(hidden) = &descriptor.hidden {
                config.insert_section_predicate(key.clone(), hidden.clone());
            }
        }
        config
    }
}

static_assertions::assert_impl_all!(DescriptorRegistry: Send, Sync, Clone);
