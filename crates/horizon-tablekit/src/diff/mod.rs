//! Nested diff computation between two visible projections.
//!
//! The engine compares an old and a new visible projection and produces a
//! two-level edit script: section operations, plus row operations for every
//! section present on both sides. Platform animation APIs require section
//! and row operations to be expressed separately and applied in a specific
//! order; a flat diff cannot express that.
//!
//! # Matching
//!
//! - Sections match iff their keys are equal AND their content payloads
//!   match (both absent, or both diffable and content-equal).
//! - Rows match on their diff identifier alone; content changes are the
//!   update pass's business ([`compute_updates`]), not the structural
//!   script's.
//! - Rows without an identity (including all lazy rows) and second and
//!   later occurrences of a duplicated identifier never match anything:
//!   they are always a delete plus an insert. A missed match costs an
//!   extra reload, which is safe; a wrong match is not. The engine
//!   therefore never fails on malformed input.
//!
//! # Apply order
//!
//! Consumers apply a [`NestedDiff`] as: section deletions, section moves,
//! section insertions, then per-kept-section row deletions / moves /
//! insertions. Deletions address pre-update indices, insertions
//! post-update indices.

mod script;
mod update;

pub use script::{EditScript, Move};
pub use update::{RowUpdate, compute_updates};

use crate::model::{Row, Section};

/// Position of one row in a projection: section index, then row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowPosition {
    /// Index of the section within the projection.
    pub section: usize,
    /// Index of the row within the section's visible rows.
    pub row: usize,
}

/// Row-level operations for a section present in both projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRowScript {
    /// The section's index in the old projection.
    pub old_section: usize,
    /// The section's index in the new projection.
    pub new_section: usize,
    /// The row operations within that section.
    pub script: EditScript,
}

/// A two-level edit script between two visible projections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedDiff {
    /// Section-level operations.
    pub sections: EditScript,
    /// Row-level operations, one entry per section kept on both sides, in
    /// old-projection order.
    pub rows: Vec<SectionRowScript>,
}

impl NestedDiff {
    /// `true` when the diff carries no operations at any level.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.rows.iter().all(|r| r.script.is_empty())
    }
}

/// Flattens a projection into a linear sequence of positioned rows.
///
/// A plain two-level traversal preserving order. Used by the update pass;
/// the nested diff itself works section-wise so its script keeps section
/// boundaries.
pub fn flatten(sections: &[Section]) -> Vec<(RowPosition, Row)> {
    let mut flat = Vec::new();
    for (section_index, section) in sections.iter().enumerate() {
        for (row_index, row) in section.visible_rows().iter().enumerate() {
            flat.push((
                RowPosition {
                    section: section_index,
                    row: row_index,
                },
                row.clone(),
            ));
        }
    }
    flat
}

/// A section prepared for matching: demoted duplicates never match.
struct SectionElement<'a> {
    section: &'a Section,
    matchable: bool,
}

/// Prepares sections for matching, demoting duplicate keys.
///
/// The first section with a given key wins; later ones are treated as
/// always-distinct. Key collisions are a caller error; this keeps them
/// deterministic instead of fatal.
fn section_elements(sections: &[Section]) -> Vec<SectionElement<'_>> {
    let mut seen = std::collections::HashSet::new();
    sections
        .iter()
        .map(|section| SectionElement {
            section,
            matchable: seen.insert(section.key().to_owned()),
        })
        .collect()
}

/// Prepares rows for matching: identity strings with duplicates demoted.
fn row_match_ids(rows: &[Row]) -> Vec<Option<String>> {
    let mut seen = std::collections::HashSet::new();
    rows.iter()
        .map(|row| {
            let id = row.diff_identifier()?;
            seen.insert(id.clone()).then_some(id)
        })
        .collect()
}

/// Computes the nested diff between two visible projections.
///
/// Pure function over immutable snapshots; `diff(x, x)` is empty for any
/// projection `x`.
#[tracing::instrument(skip_all, target = "horizon_tablekit::diff", level = "trace")]
pub fn diff(old: &[Section], new: &[Section]) -> NestedDiff {
    let old_elements = section_elements(old);
    let new_elements = section_elements(new);

    let section_eq = |a: &SectionElement<'_>, b: &SectionElement<'_>| {
        a.matchable
            && b.matchable
            && a.section.key() == b.section.key()
            && a.section.content_matches(b.section)
    };
    let (sections, kept) = script::edit_script_with(&old_elements, &new_elements, section_eq);

    let row_eq = |a: &Option<String>, b: &Option<String>| {
        matches!((a, b), (Some(x), Some(y)) if x == y)
    };
    let rows = kept
        .into_iter()
        .map(|(old_section, new_section)| {
            let old_ids = row_match_ids(old[old_section].visible_rows());
            let new_ids = row_match_ids(new[new_section].visible_rows());
            let (script, _) = script::edit_script_with(&old_ids, &new_ids, row_eq);
            SectionRowScript {
                old_section,
                new_section,
                script,
            }
        })
        .collect();

    let nested = NestedDiff { sections, rows };
    tracing::debug!(
        target: "horizon_tablekit::diff",
        section_ops = nested.sections.len(),
        kept_sections = nested.rows.len(),
        "computed nested diff"
    );
    nested
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> Row {
        Row::diffable("cell", id.to_string())
    }

    fn section(key: &str, ids: &[&str]) -> Section {
        Section::eager(key, ids.iter().map(|id| row(id)).collect())
    }

    #[test]
    fn test_diff_is_idempotent() {
        let projection = vec![
            section("a", &["1", "2"]),
            section("b", &["3"]).with_content("B".to_string()),
        ];
        let nested = diff(&projection, &projection);
        assert!(nested.is_empty());
        // Both sections are kept, with empty row scripts.
        assert_eq!(nested.rows.len(), 2);
    }

    #[test]
    fn test_row_level_scenario() {
        // old: [a, b, c]  new: [b, a, d]
        let old = vec![section("s", &["a", "b", "c"])];
        let new = vec![section("s", &["b", "a", "d"])];
        let nested = diff(&old, &new);

        assert!(nested.sections.is_empty());
        assert_eq!(nested.rows.len(), 1);
        let script = &nested.rows[0].script;
        assert_eq!(script.deletions, vec![2]); // "c"
        assert_eq!(script.insertions, vec![2]); // "d"
        assert_eq!(script.moves, vec![Move { from: 0, to: 1 }]); // "a"
    }

    #[test]
    fn test_section_insert_and_delete() {
        let old = vec![section("a", &["1"]), section("b", &["2"])];
        let new = vec![section("b", &["2"]), section("c", &["3"])];
        let nested = diff(&old, &new);

        assert_eq!(nested.sections.deletions, vec![0]); // "a"
        assert_eq!(nested.sections.insertions, vec![1]); // "c"
        assert!(nested.sections.moves.is_empty());
        // Only "b" exists on both sides.
        assert_eq!(nested.rows.len(), 1);
        assert_eq!(nested.rows[0].old_section, 1);
        assert_eq!(nested.rows[0].new_section, 0);
        assert!(nested.rows[0].script.is_empty());
    }

    #[test]
    fn test_section_move() {
        let old = vec![
            section("a", &["1"]),
            section("b", &["2"]),
            section("c", &["3"]),
        ];
        let new = vec![
            section("c", &["3"]),
            section("a", &["1"]),
            section("b", &["2"]),
        ];
        let nested = diff(&old, &new);
        assert!(nested.sections.deletions.is_empty());
        assert!(nested.sections.insertions.is_empty());
        assert_eq!(nested.sections.moves, vec![Move { from: 2, to: 0 }]);
    }

    #[test]
    fn test_section_content_change_is_delete_plus_insert() {
        // Same key, different content payload: the sections do not match, so
        // the old one is torn down and the new one inserted; rows get no
        // incremental script.
        let old = vec![section("s", &["1"]).with_content("Old title".to_string())];
        let new = vec![section("s", &["1"]).with_content("New title".to_string())];
        let nested = diff(&old, &new);

        assert!(nested.rows.is_empty());
        assert_eq!(nested.sections.deletions, vec![0]);
        assert_eq!(nested.sections.insertions, vec![0]);
        assert!(nested.sections.moves.is_empty());
    }

    #[test]
    fn test_content_on_one_side_never_matches() {
        let old = vec![section("s", &["1"])];
        let new = vec![section("s", &["1"]).with_content("Title".to_string())];
        let nested = diff(&old, &new);
        assert_eq!(nested.sections.deletions, vec![0]);
        assert_eq!(nested.sections.insertions, vec![0]);
        assert!(nested.rows.is_empty());
    }

    #[test]
    fn test_duplicate_section_keys_first_wins() {
        let old = vec![section("dup", &["1"]), section("dup", &["2"])];
        let new = vec![section("dup", &["1"])];
        let nested = diff(&old, &new);
        // The first "dup" matches; the demoted duplicate is deleted.
        assert_eq!(nested.sections.deletions, vec![1]);
        assert!(nested.sections.insertions.is_empty());
        assert_eq!(nested.rows.len(), 1);
    }

    #[test]
    fn test_identityless_rows_always_reload() {
        let old = vec![Section::eager(
            "s",
            vec![Row::new("spinner", ()), row("a")],
        )];
        let new = vec![Section::eager(
            "s",
            vec![row("a"), Row::new("spinner", ())],
        )];
        let nested = diff(&old, &new);
        let script = &nested.rows[0].script;
        // The spinner cannot be matched: delete old position, insert new.
        assert_eq!(script.deletions, vec![0]);
        assert_eq!(script.insertions, vec![1]);
        assert!(script.moves.is_empty());
    }

    #[test]
    fn test_lazy_rows_never_match_and_never_force() {
        let old = vec![Section::eager(
            "s",
            vec![Row::lazy("heavy", || -> String { panic!("forced during diff") })],
        )];
        let new = vec![Section::eager(
            "s",
            vec![Row::lazy("heavy", || -> String { panic!("forced during diff") })],
        )];
        let nested = diff(&old, &new);
        let script = &nested.rows[0].script;
        assert_eq!(script.deletions, vec![0]);
        assert_eq!(script.insertions, vec![0]);
    }

    #[test]
    fn test_flatten_preserves_traversal_order() {
        let projection = vec![section("a", &["1", "2"]), section("b", &["3"])];
        let flat = flatten(&projection);
        let positions: Vec<(usize, usize)> =
            flat.iter().map(|(p, _)| (p.section, p.row)).collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(flat[2].1.diff_identifier().as_deref(), Some("3"));
    }
}
