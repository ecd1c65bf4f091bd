//! The table binding: reload protocol, queries, and change notification.
//!
//! [`TableBinding`] owns the section array, the last-resolved visible
//! projection, the descriptor registry, and the visibility configuration.
//! Application code replaces the section array wholesale; the binding
//! captures the previously-displayed projection first, resolves the new
//! one, computes the nested diff and the update pairs between them, and
//! hands the result to consumers both as a return value and through the
//! [`reload`](BindingSignals::reload) signal.
//!
//! # Threading discipline
//!
//! The binding is single-threaded and non-reentrant by contract. All
//! structural updates must happen on the thread that built the binding; a
//! nested reload from inside a reload notification would hand stale indices
//! to the platform animation calls. Mutating entry points carry
//! thread-affinity debug assertions, and reentrant reloads are refused with
//! [`BindingError::ReentrantReload`] (the infallible variants panic).
//! Queries are deliberately lenient instead: an out-of-range index returns
//! `None`, which callers treat as "nothing to do". That is the common case during
//! teardown races between a structural update and an in-flight interaction
//! callback.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use horizon_tablekit_core::{Signal, ThreadAffinity};

use crate::diff::{NestedDiff, RowUpdate, compute_updates, diff};
use crate::error::BindingError;
use crate::model::{Row, Section};
use crate::registry::DescriptorRegistry;
use crate::visibility::{VisibilityConfig, resolve_visible};

/// Everything a presentation layer needs to apply one reload.
#[derive(Debug, Clone)]
pub struct ReloadUpdate {
    /// The structural edit script.
    pub diff: NestedDiff,
    /// In-place re-renders for same-identity, changed-content rows.
    pub updates: Vec<RowUpdate>,
}

impl ReloadUpdate {
    /// `true` when there is nothing to animate and nothing to re-render.
    pub fn is_empty(&self) -> bool {
        self.diff.is_empty() && self.updates.is_empty()
    }
}

/// Signals emitted by a [`TableBinding`].
///
/// `about_to_reload` fires before the model is replaced; `reload` fires
/// after the new projection is in place, carrying the computed update.
/// `visibility_invalidated` fires when the visibility configuration is
/// replaced, before the resulting reload.
pub struct BindingSignals {
    /// Emitted before a structural update replaces the model.
    pub about_to_reload: Signal<()>,
    /// Emitted after a structural update, with the diff to apply.
    pub reload: Signal<ReloadUpdate>,
    /// Emitted when the visibility configuration changes.
    pub visibility_invalidated: Signal<()>,
}

impl BindingSignals {
    fn new() -> Self {
        Self {
            about_to_reload: Signal::new(),
            reload: Signal::new(),
            visibility_invalidated: Signal::new(),
        }
    }
}

/// Clears the reload-in-progress flag when the protocol finishes.
struct ReloadGuard<'a>(&'a AtomicBool);

impl Drop for ReloadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Declarative table content bound to an imperative table view.
///
/// # Example
///
/// ```
/// use horizon_tablekit::binding::TableBinding;
/// use horizon_tablekit::model::{Row, Section};
/// use horizon_tablekit::registry::{DescriptorRegistry, RowDescriptor};
///
/// let mut registry = DescriptorRegistry::new();
/// registry.register_row("label-cell", RowDescriptor::new().with_height(|_| 44.0));
///
/// let binding = TableBinding::builder()
///     .registry(registry)
///     .sections(vec![Section::eager(
///         "greetings",
///         vec![Row::diffable("label-cell", "hello".to_string())],
///     )])
///     .build();
///
/// assert_eq!(binding.visible_section_count(), 1);
///
/// // Replace the content; the returned update drives the animated apply.
/// let update = binding.set_sections(vec![Section::eager(
///     "greetings",
///     vec![
///         Row::diffable("label-cell", "hello".to_string()),
///         Row::diffable("label-cell", "world".to_string()),
///     ],
/// )]);
/// assert_eq!(update.diff.rows[0].script.insertions, vec![1]);
/// ```
pub struct TableBinding {
    sections: RwLock<Vec<Section>>,
    /// The projection currently presented by the UI.
    visible: RwLock<Vec<Section>>,
    registry: DescriptorRegistry,
    visibility: RwLock<VisibilityConfig>,
    signals: BindingSignals,
    affinity: ThreadAffinity,
    reloading: AtomicBool,
}

impl TableBinding {
    /// Starts building a binding.
    pub fn builder() -> TableBindingBuilder {
        TableBindingBuilder {
            registry: DescriptorRegistry::new(),
            visibility: VisibilityConfig::default(),
            sections: Vec::new(),
        }
    }

    /// The binding's signals.
    pub fn signals(&self) -> &BindingSignals {
        &self.signals
    }

    /// The descriptor registry this binding routes through.
    pub fn registry(&self) -> &DescriptorRegistry {
        &self.registry
    }

    // -------------------------------------------------------------------------
    // Structural updates
    // -------------------------------------------------------------------------

    /// Replaces the model and computes the transition to it.
    ///
    /// The previously-displayed projection is captured before replacement to
    /// serve as the diff baseline. Emits `about_to_reload` before and
    /// `reload` after; returns the same update the signal carries.
    ///
    /// # Errors
    ///
    /// [`BindingError::ReentrantReload`] if a reload is already in flight on
    /// this binding.
    pub fn try_set_sections(
        &self,
        sections: Vec<Section>,
    ) -> Result<ReloadUpdate, BindingError> {
        self.affinity.debug_assert_same_thread("set_sections");
        self.reload_protocol(Some(sections))
    }

    /// Replaces the model, panicking on a reentrant reload.
    #[track_caller]
    pub fn set_sections(&self, sections: Vec<Section>) -> ReloadUpdate {
        match self.try_set_sections(sections) {
            Ok(update) => update,
            Err(error) => panic!("{error}"),
        }
    }

    /// Recomputes the visible projection under the current configuration.
    ///
    /// Use after external state consulted by hide predicates has changed.
    /// Same protocol and signals as [`set_sections`](Self::set_sections),
    /// without replacing the model.
    pub fn try_invalidate_visibility(&self) -> Result<ReloadUpdate, BindingError> {
        self.affinity.debug_assert_same_thread("invalidate_visibility");
        self.reload_protocol(None)
    }

    /// Recomputes the visible projection, panicking on a reentrant reload.
    #[track_caller]
    pub fn invalidate_visibility(&self) -> ReloadUpdate {
        match self.try_invalidate_visibility() {
            Ok(update) => update,
            Err(error) => panic!("{error}"),
        }
    }

    /// Replaces the visibility configuration and recomputes the projection.
    ///
    /// The supplied configuration is layered over the hide predicates
    /// carried by registered descriptors.
    #[track_caller]
    pub fn set_visibility(&self, config: VisibilityConfig) -> ReloadUpdate {
        self.affinity.debug_assert_same_thread("set_visibility");
        *self.visibility.write() = config.merged_over(&self.registry.visibility_config());
        self.signals.visibility_invalidated.emit(());
        self.invalidate_visibility()
    }

    /// Runs the reload protocol: capture old, replace, resolve, diff, notify.
    #[tracing::instrument(skip_all, target = "horizon_tablekit::binding", level = "trace")]
    fn reload_protocol(
        &self,
        replace: Option<Vec<Section>>,
    ) -> Result<ReloadUpdate, BindingError> {
        if self.reloading.swap(true, Ordering::Acquire) {
            tracing::error!(
                target: "horizon_tablekit::binding",
                "reload re-entered while a previous reload was being applied"
            );
            return Err(BindingError::ReentrantReload);
        }
        let _guard = ReloadGuard(&self.reloading);

        self.signals.about_to_reload.emit(());

        let old_visible = self.visible.read().clone();
        if let Some(sections) = replace {
            *self.sections.write() = sections;
        }
        let new_visible = {
            let sections = self.sections.read();
            let visibility = self.visibility.read();
            resolve_visible(&sections, &visibility)
        };

        let update = ReloadUpdate {
            diff: diff(&old_visible, &new_visible),
            updates: compute_updates(&old_visible, &new_visible),
        };
        *self.visible.write() = new_visible;

        tracing::debug!(
            target: "horizon_tablekit::binding",
            section_ops = update.diff.sections.len(),
            updates = update.updates.len(),
            "reload complete"
        );
        self.signals.reload.emit(update.clone());
        Ok(update)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Number of sections in the visible projection.
    pub fn visible_section_count(&self) -> usize {
        self.visible.read().len()
    }

    /// Number of visible rows in the given section, or `None` past the end.
    pub fn visible_row_count(&self, section: usize) -> Option<usize> {
        self.visible
            .read()
            .get(section)
            .map(Section::visible_row_count)
    }

    /// The visible row at the given position, or `None` out of range.
    ///
    /// Absence is not an error: during teardown races an interaction
    /// callback can legitimately ask about a row that just went away.
    pub fn visible_row(&self, section: usize, row: usize) -> Option<Row> {
        self.visible
            .read()
            .get(section)
            .and_then(|s| s.visible_row(row))
            .cloned()
    }

    /// The visible section at the given index, or `None` out of range.
    pub fn visible_section(&self, index: usize) -> Option<Section> {
        self.visible.read().get(index).cloned()
    }
}

/// Builder for [`TableBinding`].
pub struct TableBindingBuilder {
    registry: DescriptorRegistry,
    visibility: VisibilityConfig,
    sections: Vec<Section>,
}

impl TableBindingBuilder {
    /// Sets the descriptor registry.
    pub fn registry(mut self, registry: DescriptorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the application-level visibility configuration.
    pub fn visibility(mut self, visibility: VisibilityConfig) -> Self {
        self.visibility = visibility;
        self
    }

    /// Sets the initial section array.
    pub fn sections(mut self, sections: Vec<Section>) -> Self {
        self.sections = sections;
        self
    }

    /// Builds the binding, resolving the initial projection silently.
    ///
    /// The binding is bound to the calling thread; no signals fire for the
    /// initial resolution.
    pub fn build(self) -> TableBinding {
        let visibility = self
            .visibility
            .merged_over(&self.registry.visibility_config());
        let visible = resolve_visible(&self.sections, &visibility);
        TableBinding {
            sections: RwLock::new(self.sections),
            visible: RwLock::new(visible),
            registry: self.registry,
            visibility: RwLock::new(visibility),
            signals: BindingSignals::new(),
            affinity: ThreadAffinity::current(),
            reloading: AtomicBool::new(false),
        }
    }
}

static_assertions::assert_impl_all!(TableBinding: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    fn row(id: &str) -> Row {
        Row::diffable("cell", id.to_string())
    }

    fn binding_with(sections: Vec<Section>) -> TableBinding {
        TableBinding::builder().sections(sections).build()
    }

    #[test]
    fn test_initial_projection_is_queryable() {
        let binding = binding_with(vec![Section::eager("s", vec![row("a"), row("b")])]);
        assert_eq!(binding.visible_section_count(), 1);
        assert_eq!(binding.visible_row_count(0), Some(2));
        assert_eq!(
            binding.visible_row(0, 1).unwrap().diff_identifier().as_deref(),
            Some("b")
        );
    }

    #[test]
    fn test_out_of_range_queries_return_none() {
        let binding = binding_with(vec![Section::eager("s", vec![row("a")])]);
        assert_eq!(binding.visible_row_count(5), None);
        assert!(binding.visible_row(0, 9).is_none());
        assert!(binding.visible_row(9, 0).is_none());
        assert!(binding.visible_section(3).is_none());
    }

    #[test]
    fn test_reload_returns_and_emits_the_same_update() {
        let binding = binding_with(vec![Section::eager("s", vec![row("a")])]);

        let observed = Arc::new(Mutex::new(Vec::new()));
        let o = observed.clone();
        binding.signals().about_to_reload.connect(move |_| {
            o.lock().push("about_to_reload".to_string());
        });
        let o = observed.clone();
        binding.signals().reload.connect(move |update| {
            o.lock()
                .push(format!("reload:{}", update.diff.rows[0].script.insertions.len()));
        });

        let update = binding.set_sections(vec![Section::eager(
            "s",
            vec![row("a"), row("b")],
        )]);
        assert_eq!(update.diff.rows[0].script.insertions, vec![1]);
        assert_eq!(
            *observed.lock(),
            vec!["about_to_reload".to_string(), "reload:1".to_string()]
        );
        // The projection the queries see is the post-reload one.
        assert_eq!(binding.visible_row_count(0), Some(2));
    }

    #[test]
    fn test_hidden_section_reappearing_is_a_section_insert() {
        let show = Arc::new(AtomicBool::new(false));

        let visible_flag = show.clone();
        let config = VisibilityConfig::builder()
            .hide_rows_where("cell", move |_| !visible_flag.load(Ordering::SeqCst))
            .build();
        let binding = TableBinding::builder()
            .visibility(config)
            .sections(vec![Section::eager(
                "s",
                vec![row("a"), row("b"), row("c")],
            )])
            .build();

        // All rows hidden: the section is excluded outright.
        assert_eq!(binding.visible_section_count(), 0);

        show.store(true, Ordering::SeqCst);
        let update = binding.invalidate_visibility();

        // The transition is a section-level insert, not row-level inserts
        // into a previously-absent section.
        assert_eq!(update.diff.sections.insertions, vec![0]);
        assert!(update.diff.rows.is_empty());
        assert_eq!(binding.visible_row_count(0), Some(3));
    }

    #[test]
    fn test_registry_hidden_predicates_apply() {
        let mut registry = DescriptorRegistry::new();
        registry.register_row(
            "secret-cell",
            crate::registry::RowDescriptor::new().with_hidden(|_| true),
        );

        let binding = TableBinding::builder()
            .registry(registry)
            .sections(vec![Section::eager(
                "s",
                vec![row("a"), Row::diffable("secret-cell", "b".to_string())],
            )])
            .build();

        assert_eq!(binding.visible_row_count(0), Some(1));
    }

    #[test]
    fn test_reentrant_reload_is_refused() {
        let binding = Arc::new(binding_with(vec![Section::eager("s", vec![row("a")])]));

        let result = Arc::new(Mutex::new(None));
        let r = result.clone();
        let b = binding.clone();
        binding.signals().reload.connect(move |_| {
            *r.lock() = Some(b.try_set_sections(Vec::new()));
        });

        let update = binding.set_sections(vec![Section::eager("s", vec![row("b")])]);
        assert!(!update.is_empty());
        assert!(matches!(
            result.lock().as_ref(),
            Some(Err(BindingError::ReentrantReload))
        ));
        // The refused nested reload left the model untouched.
        assert_eq!(binding.visible_section_count(), 1);
    }

    #[test]
    fn test_set_visibility_layers_over_registry() {
        let mut registry = DescriptorRegistry::new();
        registry.register_row(
            "secret-cell",
            crate::registry::RowDescriptor::new().with_hidden(|_| true),
        );

        let binding = TableBinding::builder()
            .registry(registry)
            .sections(vec![Section::eager(
                "s",
                vec![Row::diffable("secret-cell", "a".to_string()), row("b")],
            )])
            .build();
        assert_eq!(binding.visible_row_count(0), Some(1));

        // Application override un-hides the secret rows.
        let update = binding.set_visibility(
            VisibilityConfig::builder()
                .hide_rows_where("secret-cell", |_| false)
                .build(),
        );
        assert_eq!(update.diff.rows[0].script.insertions, vec![0]);
        assert_eq!(binding.visible_row_count(0), Some(2));
    }

    #[test]
    fn test_update_pairs_flow_through_reload() {
        let binding = binding_with(vec![Section::eager(
            "s",
            vec![Row::diffable("cell", "x".to_string())],
        )]);

        // Same identity, same content: nothing to do.
        let update = binding.set_sections(vec![Section::eager(
            "s",
            vec![Row::diffable("cell", "x".to_string())],
        )]);
        assert!(update.is_empty());
    }
}
