//! Visibility resolution: projecting the full model onto what is shown.
//!
//! The resolver takes the full section array and a [`VisibilityConfig`] of
//! hide predicates and produces the *visible projection*: hidden rows
//! excluded, sections that are hidden or ended up with zero visible rows
//! dropped entirely, relative order preserved throughout. The projection is
//! what the diff engine compares and what the presentation layer queries.
//!
//! Two different conditions both exclude a section: being hidden by
//! predicate (even with visible rows), and ending up empty (even when not
//! hidden). Callers must not conflate them.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{Row, Section};

/// Type alias for a row hide predicate.
///
/// Returns `true` if the row should be hidden.
pub type RowHidePredicate = Arc<dyn Fn(&Row) -> bool + Send + Sync>;

/// Type alias for a section hide predicate.
///
/// Returns `true` if the section should be hidden, regardless of its rows.
pub type SectionHidePredicate = Arc<dyn Fn(&Section) -> bool + Send + Sync>;

/// Hide predicates for rows and sections.
///
/// Rows are tested against the predicate registered for their descriptor
/// identifier, falling back to the dataset-wide default, defaulting to "not
/// hidden" if neither is supplied. Sections resolve the same way by key.
///
/// # Example
///
/// ```
/// use horizon_tablekit::visibility::VisibilityConfig;
///
/// let config = VisibilityConfig::builder()
///     .hide_rows_where("debug-cell", |_| true)
///     .default_row_hidden(|_| false)
///     .build();
/// ```
#[derive(Clone, Default)]
pub struct VisibilityConfig {
    row_predicates: HashMap<String, RowHidePredicate>,
    default_row: Option<RowHidePredicate>,
    section_predicates: HashMap<String, SectionHidePredicate>,
    default_section: Option<SectionHidePredicate>,
}

impl VisibilityConfig {
    /// Starts building a configuration.
    pub fn builder() -> VisibilityConfigBuilder {
        VisibilityConfigBuilder {
            config: VisibilityConfig::default(),
        }
    }

    /// Whether the given row is hidden under this configuration.
    pub fn row_hidden(&self, row: &Row) -> bool {
        if let Some(predicate) = self.row_predicates.get(row.descriptor()) {
            return predicate(row);
        }
        if let Some(predicate) = &self.default_row {
            return predicate(row);
        }
        false
    }

    /// Whether the given section is hidden under this configuration.
    pub fn section_hidden(&self, section: &Section) -> bool {
        if let Some(predicate) = self.section_predicates.get(section.key()) {
            return predicate(section);
        }
        if let Some(predicate) = &self.default_section {
            return predicate(section);
        }
        false
    }

    /// Combines this configuration over `base`.
    ///
    /// Entries present here win; `base` fills the gaps. Used to layer
    /// application-supplied predicates over the ones carried by registered
    /// descriptors.
    pub fn merged_over(mut self, base: &VisibilityConfig) -> VisibilityConfig {
        for (tag, predicate) in &base.row_predicates {
            self.row_predicates
                .entry(tag.clone())
                .or_insert_with(|| predicate.clone());
        }
        for (key, predicate) in &base.section_predicates {
            self.section_predicates
                .entry(key.clone())
                .or_insert_with(|| predicate.clone());
        }
        if self.default_row.is_none() {
            self.default_row = base.default_row.clone();
        }
        if self.default_section.is_none() {
            self.default_section = base.default_section.clone();
        }
        self
    }

    pub(crate) fn insert_row_predicate(&mut self, tag: String, predicate: RowHidePredicate) {
        self.row_predicates.insert(tag, predicate);
    }

    pub(crate) fn insert_section_predicate(
        &mut self,
        key: String,
        predicate: SectionHidePredicate,
    ) {
        self.section_predicates.insert(key, predicate);
    }
}

/// Builder for [`VisibilityConfig`].
pub struct VisibilityConfigBuilder {
    config: VisibilityConfig,
}

impl VisibilityConfigBuilder {
    /// Hides rows with the given descriptor identifier when the predicate
    /// returns `true`.
    pub fn hide_rows_where<F>(mut self, descriptor: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.config
            .row_predicates
            .insert(descriptor.into(), Arc::new(predicate));
        self
    }

    /// Hides sections with the given key when the predicate returns `true`.
    pub fn hide_sections_where<F>(mut self, key: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Section) -> bool + Send + Sync + 'static,
    {
        self.config
            .section_predicates
            .insert(key.into(), Arc::new(predicate));
        self
    }

    /// Sets the dataset-wide default row predicate.
    pub fn default_row_hidden<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.config.default_row = Some(Arc::new(predicate));
        self
    }

    /// Sets the dataset-wide default section predicate.
    pub fn default_section_hidden<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Section) -> bool + Send + Sync + 'static,
    {
        self.config.default_section = Some(Arc::new(predicate));
        self
    }

    /// Finishes the configuration.
    pub fn build(self) -> VisibilityConfig {
        self.config
    }
}

/// Computes the visible projection of `sections` under `config`.
///
/// For each section in original order:
///
/// 1. Eager and separated sections recompute their visible rows by testing
///    each row against the resolved hide predicate; on-demand sections
///    materialize their producers instead (the producer already emits only
///    visible rows, and is invoked at most once per row).
/// 2. The section itself is tested against the resolved section predicate.
/// 3. The section is included iff it is not hidden AND it has at least one
///    visible row.
///
/// Runs in O(total rows). The input is not mutated; the projection is a new
/// section array whose visible sequences are freshly derived.
pub fn resolve_visible(sections: &[Section], config: &VisibilityConfig) -> Vec<Section> {
    let row_hidden = |row: &Row| config.row_hidden(row);
    let mut projection = Vec::with_capacity(sections.len());
    for section in sections {
        let visible = section.resolve_rows(&row_hidden);
        if config.section_hidden(section) {
            tracing::trace!(
                target: "horizon_tablekit::visibility",
                key = section.key(),
                "section hidden by predicate"
            );
            continue;
        }
        if visible.is_empty() {
            tracing::trace!(
                target: "horizon_tablekit::visibility",
                key = section.key(),
                "section has no visible rows"
            );
            continue;
        }
        projection.push(section.with_visible(visible));
    }
    tracing::debug!(
        target: "horizon_tablekit::visibility",
        total = sections.len(),
        visible = projection.len(),
        "resolved visible projection"
    );
    projection
}

static_assertions::assert_impl_all!(VisibilityConfig: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SeparatorStyle;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn row(id: &str) -> Row {
        Row::diffable("cell", id.to_string())
    }

    fn ids(section: &Section) -> Vec<String> {
        section
            .visible_rows()
            .iter()
            .filter_map(|r| r.diff_identifier())
            .collect()
    }

    #[test]
    fn test_no_predicates_everything_visible() {
        let sections = vec![Section::eager("s", vec![row("a"), row("b")])];
        let projection = resolve_visible(&sections, &VisibilityConfig::default());
        assert_eq!(projection.len(), 1);
        assert_eq!(ids(&projection[0]), vec!["a", "b"]);
    }

    #[test]
    fn test_filtering_preserves_relative_order() {
        let sections = vec![Section::eager(
            "s",
            vec![row("a"), row("b"), row("c"), row("d")],
        )];
        let config = VisibilityConfig::builder()
            .hide_rows_where("cell", |r| {
                matches!(r.diff_identifier().as_deref(), Some("b") | Some("d"))
            })
            .build();
        let projection = resolve_visible(&sections, &config);
        // Survivors form a subsequence of the original order.
        assert_eq!(ids(&projection[0]), vec!["a", "c"]);
    }

    #[test]
    fn test_per_type_predicate_overrides_default() {
        let sections = vec![Section::eager(
            "s",
            vec![Row::diffable("kept", "a".to_string()), row("b")],
        )];
        // Default hides everything; the per-type predicate for "kept" wins.
        let config = VisibilityConfig::builder()
            .default_row_hidden(|_| true)
            .hide_rows_where("kept", |_| false)
            .build();
        let projection = resolve_visible(&sections, &config);
        assert_eq!(projection.len(), 1);
        assert_eq!(ids(&projection[0]), vec!["a"]);
    }

    #[test]
    fn test_empty_section_is_elided() {
        let sections = vec![
            Section::eager("empty", vec![row("a")]),
            Section::eager("kept", vec![row("b")]),
        ];
        let config = VisibilityConfig::builder()
            .hide_rows_where("cell", |r| r.diff_identifier().as_deref() == Some("a"))
            .build();
        let projection = resolve_visible(&sections, &config);
        // The section itself was never hidden, but it has nothing to show.
        assert_eq!(projection.len(), 1);
        assert_eq!(projection[0].key(), "kept");
    }

    #[test]
    fn test_hidden_section_excluded_despite_visible_rows() {
        let sections = vec![
            Section::eager("secret", vec![row("a")]),
            Section::eager("kept", vec![row("b")]),
        ];
        let config = VisibilityConfig::builder()
            .hide_sections_where("secret", |_| true)
            .build();
        let projection = resolve_visible(&sections, &config);
        assert_eq!(projection.len(), 1);
        assert_eq!(projection[0].key(), "kept");
    }

    #[test]
    fn test_on_demand_sections_are_exempt_from_row_filtering() {
        let sections = vec![Section::on_demand(
            "feed",
            || 2,
            |index| Row::diffable("cell", format!("row-{index}")),
        )];
        // A default predicate that hides everything must not touch
        // producer-supplied rows.
        let config = VisibilityConfig::builder().default_row_hidden(|_| true).build();
        let projection = resolve_visible(&sections, &config);
        assert_eq!(projection.len(), 1);
        assert_eq!(ids(&projection[0]), vec!["row-0", "row-1"]);
    }

    #[test]
    fn test_on_demand_producers_called_once_per_row() {
        let row_calls = Arc::new(AtomicUsize::new(0));
        let rc = row_calls.clone();
        let sections = vec![Section::on_demand(
            "feed",
            || 4,
            move |index| {
                rc.fetch_add(1, Ordering::SeqCst);
                Row::diffable("cell", format!("row-{index}"))
            },
        )];
        resolve_visible(&sections, &VisibilityConfig::default());
        assert_eq!(row_calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_separators_follow_filtering() {
        let style = SeparatorStyle::new(|_| Row::new("separator", ()));
        let sections = vec![Section::separated(
            "s",
            vec![row("a"), row("b"), row("c")],
            style,
        )];
        let config = VisibilityConfig::builder()
            .hide_rows_where("cell", |r| r.diff_identifier().as_deref() == Some("b"))
            .build();
        let projection = resolve_visible(&sections, &config);
        // a | sep | c: the separator count tracks surviving content rows.
        let descriptors: Vec<&str> = projection[0]
            .visible_rows()
            .iter()
            .map(|r| r.descriptor())
            .collect();
        assert_eq!(descriptors, vec!["cell", "separator", "cell"]);
    }

    #[test]
    fn test_merged_over_prefers_self() {
        let base = VisibilityConfig::builder()
            .hide_rows_where("cell", |_| true)
            .default_row_hidden(|_| true)
            .build();
        let overlay = VisibilityConfig::builder()
            .hide_rows_where("cell", |_| false)
            .build();
        let merged = overlay.merged_over(&base);

        let visible_row = row("a");
        assert!(!merged.row_hidden(&visible_row));
        // The base default survives where the overlay had nothing.
        let other = Row::diffable("other", "b".to_string());
        assert!(merged.row_hidden(&other));
    }
}
