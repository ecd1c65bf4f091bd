//! In-place update pairs: same identity, changed content.
//!
//! Structural scripts handle items that appeared, vanished, or relocated.
//! An item that kept its identity but changed its content needs neither:
//! it needs an in-place re-render at its current position. This pass finds
//! those pairs.

use std::collections::{HashMap, HashSet};

use super::{RowPosition, flatten};
use crate::model::{Row, Section};

/// A same-identity, changed-content match between the projections.
#[derive(Debug, Clone)]
pub struct RowUpdate {
    /// Where the currently-displayed row lives in the old projection.
    pub from: RowPosition,
    /// Where the row lives in the new projection.
    pub to: RowPosition,
    /// The new row, to re-render in place.
    pub row: Row,
}

/// Maps diff identifier to the first occurrence of that identity.
///
/// First occurrence wins by traversal order (section order, then row
/// order); later duplicates are silently ignored. Uniqueness is the
/// caller's responsibility; collisions degrade matching, they never fail.
fn identity_map(sections: &[Section]) -> HashMap<String, (RowPosition, Row)> {
    let mut map = HashMap::new();
    for (position, row) in flatten(sections) {
        if let Some(id) = row.diff_identifier() {
            map.entry(id).or_insert((position, row));
        }
    }
    map
}

/// Computes the update pairs between two visible projections.
///
/// An update is emitted for every identifier present in both projections
/// whose old and new rows are not content-equal. Rows present on only one
/// side, rows whose content is unchanged, and rows without an identity
/// produce nothing. Output follows new-projection traversal order.
pub fn compute_updates(old: &[Section], new: &[Section]) -> Vec<RowUpdate> {
    let old_rows = identity_map(old);
    let mut seen = HashSet::new();
    let mut updates = Vec::new();

    for (position, row) in flatten(new) {
        let Some(id) = row.diff_identifier() else {
            continue;
        };
        if !seen.insert(id.clone()) {
            // First occurrence wins; this duplicate does not participate.
            continue;
        }
        let Some((old_position, old_row)) = old_rows.get(&id) else {
            continue;
        };
        if !old_row.is_content_equal_to(&row) {
            updates.push(RowUpdate {
                from: *old_position,
                to: position,
                row,
            });
        }
    }

    tracing::debug!(
        target: "horizon_tablekit::diff",
        updates = updates.len(),
        "computed update pairs"
    );
    updates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Diffable;
    use std::any::Any;

    /// A payload whose identity survives content changes.
    struct Counter {
        id: &'static str,
        value: i64,
    }

    impl Diffable for Counter {
        fn diff_identifier(&self) -> String {
            self.id.to_owned()
        }

        fn is_equal_to(&self, other: Option<&dyn Diffable>) -> bool {
            other
                .and_then(|o| o.as_any().downcast_ref::<Counter>())
                .is_some_and(|o| o.id == self.id && o.value == self.value)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn counter_row(id: &'static str, value: i64) -> Row {
        Row::diffable("counter-cell", Counter { id, value })
    }

    #[test]
    fn test_changed_content_produces_one_update() {
        let old = vec![Section::eager("s", vec![counter_row("x", 1)])];
        let new = vec![Section::eager("s", vec![counter_row("x", 2)])];

        // The structural diff sees nothing: identity is unchanged.
        let nested = crate::diff::diff(&old, &new);
        assert!(nested.is_empty());

        let updates = compute_updates(&old, &new);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].from, RowPosition { section: 0, row: 0 });
        assert_eq!(updates[0].to, RowPosition { section: 0, row: 0 });
        assert_eq!(updates[0].row.expect_payload::<Counter>().value, 2);
    }

    #[test]
    fn test_unchanged_content_produces_nothing() {
        let projection = vec![Section::eager(
            "s",
            vec![counter_row("x", 1), counter_row("y", 2)],
        )];
        assert!(compute_updates(&projection, &projection).is_empty());
    }

    #[test]
    fn test_one_sided_identifiers_produce_nothing() {
        let old = vec![Section::eager("s", vec![counter_row("gone", 1)])];
        let new = vec![Section::eager("s", vec![counter_row("fresh", 1)])];
        assert!(compute_updates(&old, &new).is_empty());
    }

    #[test]
    fn test_non_diffable_rows_produce_nothing() {
        let old = vec![Section::eager("s", vec![Row::new("plain", 1i64)])];
        let new = vec![Section::eager("s", vec![Row::new("plain", 2i64)])];
        assert!(compute_updates(&old, &new).is_empty());
    }

    #[test]
    fn test_update_tracks_position_change() {
        let old = vec![Section::eager(
            "s",
            vec![counter_row("a", 1), counter_row("x", 1)],
        )];
        let new = vec![
            Section::eager("t", vec![counter_row("b", 1)]),
            Section::eager("s", vec![counter_row("x", 9)]),
        ];
        let updates = compute_updates(&old, &new);
        assert_eq!(updates.len(), 1);
        // Old position locates the on-screen view; new position and row
        // drive the re-render.
        assert_eq!(updates[0].from, RowPosition { section: 0, row: 1 });
        assert_eq!(updates[0].to, RowPosition { section: 1, row: 0 });
    }

    #[test]
    fn test_duplicate_identifiers_first_occurrence_wins() {
        // Two rows claim identity "x" on each side; only the first pair on
        // each side participates.
        let old = vec![Section::eager(
            "s",
            vec![counter_row("x", 1), counter_row("x", 99)],
        )];
        let new = vec![Section::eager(
            "s",
            vec![counter_row("x", 2), counter_row("x", 77)],
        )];
        let updates = compute_updates(&old, &new);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].row.expect_payload::<Counter>().value, 2);
    }
}
