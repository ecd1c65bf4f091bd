//! Longest-common-subsequence edit scripts with move coalescing.
//!
//! This module is the single-level primitive under the nested diff: given an
//! old and a new sequence plus a matching relation, it computes which
//! indices survive, which are deleted, which are inserted, and which
//! delete/insert pairs of one identity collapse into a move.

/// One element relocated between the old and new sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// Index in the old sequence.
    pub from: usize,
    /// Index in the new sequence.
    pub to: usize,
}

/// A single-level edit script.
///
/// `deletions` hold old-sequence indices, `insertions` new-sequence indices,
/// both ascending. A move counts as neither; it pairs an old index with a
/// new index for the same identity. Platform adapters apply deletions
/// against pre-update indices and insertions against post-update indices,
/// which is exactly how the platform batch-update APIs interpret them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditScript {
    /// Old-sequence indices removed, ascending.
    pub deletions: Vec<usize>,
    /// New-sequence indices added, ascending.
    pub insertions: Vec<usize>,
    /// Identity-preserving relocations.
    pub moves: Vec<Move>,
}

impl EditScript {
    /// `true` when the script contains no operations at all.
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.insertions.is_empty() && self.moves.is_empty()
    }

    /// Total number of operations.
    pub fn len(&self) -> usize {
        self.deletions.len() + self.insertions.len() + self.moves.len()
    }
}

/// Computes the longest common subsequence as (old index, new index) pairs.
///
/// Classic dynamic program, O(n·m) time and space; table content is kept
/// as `u32` since UI lists are nowhere near that bound.
fn lcs_pairs<T, F>(old: &[T], new: &[T], eq: &F) -> Vec<(usize, usize)>
where
    F: Fn(&T, &T) -> bool,
{
    let n = old.len();
    let m = new.len();
    if n == 0 || m == 0 {
        return Vec::new();
    }

    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if eq(&old[i], &new[j]) {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut pairs = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if eq(&old[i], &new[j]) {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}

/// Computes the edit script between `old` and `new` under `eq`.
///
/// Returns the script together with the matched (old, new) index pairs the
/// nested diff needs for its per-section row pass. After the LCS pass,
/// every remaining deletion is probed against the remaining insertions:
/// the first insertion matching the deleted element (in ascending order)
/// absorbs it into a move. First occurrence wins; an element `eq` never
/// matches stays a plain delete or insert.
pub(crate) fn edit_script_with<T, F>(
    old: &[T],
    new: &[T],
    eq: F,
) -> (EditScript, Vec<(usize, usize)>)
where
    F: Fn(&T, &T) -> bool,
{
    let pairs = lcs_pairs(old, new, &eq);

    let mut matched_old = vec![false; old.len()];
    let mut matched_new = vec![false; new.len()];
    for &(i, j) in &pairs {
        matched_old[i] = true;
        matched_new[j] = true;
    }

    let unmatched_old: Vec<usize> = (0..old.len()).filter(|&i| !matched_old[i]).collect();
    let mut remaining_insertions: Vec<usize> =
        (0..new.len()).filter(|&j| !matched_new[j]).collect();

    let mut deletions = Vec::new();
    let mut moves = Vec::new();
    for from in unmatched_old {
        let relocated = remaining_insertions
            .iter()
            .position(|&to| eq(&old[from], &new[to]));
        match relocated {
            Some(slot) => {
                let to = remaining_insertions.remove(slot);
                moves.push(Move { from, to });
            }
            None => deletions.push(from),
        }
    }

    (
        EditScript {
            deletions,
            insertions: remaining_insertions,
            moves,
        },
        pairs,
    )
}
