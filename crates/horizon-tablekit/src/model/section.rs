//! Section model: an ordered group of rows with a key and optional content.
//!
//! Sections come in three variants behind one closed sum type,
//! [`SectionRows`]: eager, on-demand, and separated. The variant set is
//! fixed; everything that consumes sections matches exhaustively.

use std::fmt;
use std::sync::Arc;

use super::diffable::Diffable;
use super::row::Row;

/// Type alias for an on-demand row count producer.
pub type RowCountProducer = Arc<dyn Fn() -> usize + Send + Sync>;

/// Type alias for an on-demand row producer.
///
/// Contract: the producer emits only rows that should be visible. On-demand
/// sections are exempt from per-row visibility filtering.
pub type RowProducer = Arc<dyn Fn(usize) -> Row + Send + Sync>;

/// Type alias for a separator row factory.
///
/// Called once per separator slot with the transition it sits on.
pub type SeparatorFactory = Arc<dyn Fn(&SeparatorContext<'_>) -> Row + Send + Sync>;

/// Row storage for a section.
#[derive(Clone)]
pub enum SectionRows {
    /// Rows materialized as a concrete ordered sequence; visibility is
    /// recomputed by evaluating a per-row hidden predicate.
    Eager(Vec<Row>),

    /// Row count and row-at-index supplied by producer functions. The
    /// producer contractually emits only visible rows, so these sections
    /// cannot be filtered after the fact.
    OnDemand {
        /// Number of (visible) rows.
        count: RowCountProducer,
        /// Row at the given index.
        row_at: RowProducer,
    },

    /// Eager rows with synthetic separator rows interposed between visible
    /// content rows.
    Separated {
        /// The content rows, filtered like an eager section's.
        rows: Vec<Row>,
        /// How separators are synthesized.
        separators: SeparatorStyle,
    },
}

/// The transition a separator row sits on.
///
/// Edge separators see `None` on the outer side.
pub struct SeparatorContext<'a> {
    /// The visible content row above the separator, if any.
    pub previous: Option<&'a Row>,
    /// The visible content row below the separator, if any.
    pub next: Option<&'a Row>,
    /// The separator's position in the section's visible row sequence.
    pub index: usize,
}

/// Separator synthesis configuration for a [`SectionRows::Separated`] section.
#[derive(Clone)]
pub struct SeparatorStyle {
    factory: SeparatorFactory,
    leading: bool,
    trailing: bool,
}

impl SeparatorStyle {
    /// Creates a style that places separators between content rows only.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&SeparatorContext<'_>) -> Row + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            leading: false,
            trailing: false,
        }
    }

    /// Also place a separator before the first visible content row.
    pub fn with_leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    /// Also place a separator after the last visible content row.
    pub fn with_trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }

    /// Weaves separators through the given visible content rows.
    ///
    /// An empty content sequence produces no separators at all.
    pub(crate) fn interpose(&self, content: Vec<Row>) -> Vec<Row> {
        if content.is_empty() {
            return content;
        }
        let mut out = Vec::with_capacity(content.len() * 2 + 1);
        if self.leading {
            let context = SeparatorContext {
                previous: None,
                next: content.first(),
                index: out.len(),
            };
            out.push((self.factory)(&context));
        }
        for i in 0..content.len() {
            if i > 0 {
                let context = SeparatorContext {
                    previous: Some(&content[i - 1]),
                    next: Some(&content[i]),
                    index: out.len(),
                };
                out.push((self.factory)(&context));
            }
            out.push(content[i].clone());
        }
        if self.trailing {
            let context = SeparatorContext {
                previous: content.last(),
                next: None,
                index: out.len(),
            };
            out.push((self.factory)(&context));
        }
        out
    }
}

/// An ordered group of rows.
///
/// The key resolves the section-level rendering descriptor and doubles as
/// the section's identity for diffing; the optional content payload (a
/// header title, a header model) feeds the section-level content-equality
/// check. The visible row sequence is derived: it is recomputed by the
/// visibility resolver and starts out as "every row visible" for eager and
/// separated sections, and empty for on-demand sections until first
/// resolution.
///
/// # Example
///
/// ```
/// use horizon_tablekit::model::{Row, Section};
///
/// let section = Section::eager(
///     "contacts",
///     vec![
///         Row::diffable("contact-cell", "Ada".to_string()),
///         Row::diffable("contact-cell", "Grace".to_string()),
///     ],
/// )
/// .with_content("Contacts".to_string());
///
/// assert_eq!(section.visible_row_count(), 2);
/// ```
#[derive(Clone)]
pub struct Section {
    /// Resolves the section descriptor; also the section's diff identity.
    key: String,
    /// Optional header/content payload compared during section matching.
    content: Option<Arc<dyn Diffable>>,
    rows: SectionRows,
    /// Derived visible row sequence.
    visible: Vec<Row>,
}

impl Section {
    /// Creates a section with concrete rows.
    pub fn eager(key: impl Into<String>, rows: Vec<Row>) -> Self {
        let visible = rows.clone();
        Self {
            key: key.into(),
            content: None,
            rows: SectionRows::Eager(rows),
            visible,
        }
    }

    /// Creates a section whose rows are supplied on demand.
    ///
    /// The producers must already account for visibility; the resolver will
    /// not filter their output. The visible sequence stays empty until the
    /// section passes through a resolution.
    pub fn on_demand<C, R>(key: impl Into<String>, count: C, row_at: R) -> Self
    where
        C: Fn() -> usize + Send + Sync + 'static,
        R: Fn(usize) -> Row + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            content: None,
            rows: SectionRows::OnDemand {
                count: Arc::new(count),
                row_at: Arc::new(row_at),
            },
            visible: Vec::new(),
        }
    }

    /// Creates a section that interposes separators between its visible rows.
    pub fn separated(key: impl Into<String>, rows: Vec<Row>, separators: SeparatorStyle) -> Self {
        let visible = separators.interpose(rows.clone());
        Self {
            key: key.into(),
            content: None,
            rows: SectionRows::Separated { rows, separators },
            visible,
        }
    }

    /// Attaches a content payload (typically a header model or title).
    pub fn with_content<T>(mut self, content: T) -> Self
    where
        T: Diffable + 'static,
    {
        self.content = Some(Arc::new(content));
        self
    }

    /// The section's key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The section's content payload, if any.
    pub fn content(&self) -> Option<&dyn Diffable> {
        self.content.as_deref()
    }

    /// The section's row storage.
    pub fn rows(&self) -> &SectionRows {
        &self.rows
    }

    /// Whether rows are produced on demand.
    pub fn is_on_demand(&self) -> bool {
        matches!(self.rows, SectionRows::OnDemand { .. })
    }

    /// The derived visible row sequence.
    pub fn visible_rows(&self) -> &[Row] {
        &self.visible
    }

    /// Number of visible rows.
    pub fn visible_row_count(&self) -> usize {
        self.visible.len()
    }

    /// The visible row at `index`, or `None` past the end.
    pub fn visible_row(&self, index: usize) -> Option<&Row> {
        self.visible.get(index)
    }

    /// Whether this section's content payload matches `other`'s.
    ///
    /// Content absent on both sides matches; absent on exactly one side does
    /// not. Changing this would alter diff output in subtle ways, so the
    /// asymmetry is deliberate and pinned by tests.
    pub(crate) fn content_matches(&self, other: &Section) -> bool {
        match (&self.content, &other.content) {
            (None, None) => true,
            (Some(a), Some(b)) => a.is_equal_to(Some(b.as_ref())),
            _ => false,
        }
    }

    /// Recomputes the visible row sequence under the given hidden predicate.
    ///
    /// Eager and separated sections filter their rows (filtering never
    /// reorders); separated sections then weave separators through whatever
    /// survived. On-demand sections materialize their producers, invoking
    /// `count` once and `row_at` once per row.
    pub(crate) fn resolve_rows(&self, row_hidden: &dyn Fn(&Row) -> bool) -> Vec<Row> {
        match &self.rows {
            SectionRows::Eager(rows) => {
                rows.iter().filter(|row| !row_hidden(row)).cloned().collect()
            }
            SectionRows::Separated { rows, separators } => {
                let content: Vec<Row> =
                    rows.iter().filter(|row| !row_hidden(row)).cloned().collect();
                separators.interpose(content)
            }
            SectionRows::OnDemand { count, row_at } => {
                (0..count()).map(|index| row_at(index)).collect()
            }
        }
    }

    /// A copy of this section with its visible sequence replaced.
    pub(crate) fn with_visible(&self, visible: Vec<Row>) -> Section {
        Section {
            key: self.key.clone(),
            content: self.content.clone(),
            rows: self.rows.clone(),
            visible,
        }
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self.rows {
            SectionRows::Eager(_) => "eager",
            SectionRows::OnDemand { .. } => "on-demand",
            SectionRows::Separated { .. } => "separated",
        };
        f.debug_struct("Section")
            .field("key", &self.key)
            .field("variant", &variant)
            .field("visible_rows", &self.visible.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Section: Send, Sync, Clone);
