use alloc::vec;
use alloc::vec::Vec;

use crate::changeset::{Changeset, ForestChangeset, Move, SectionItemChanges};
use crate::forest::Forest;
use crate::key::{DiffKey, KeyIndexMap};

/// Computes the full edit script transforming `old` into `new`.
///
/// Sections and items are matched by key equality, independent of position; payload equality (via
/// `R: PartialEq`) detects mutations of retained identities. For every retained section the item
/// lists are diffed with the same algorithm, producing nested per-section changesets.
///
/// A section's own payload, for mutation purposes, is its supplement map: item-level content
/// changes surface exclusively through the nested item changeset.
///
/// Keys must be unique within their sibling scope (among sections; among items of one section).
/// Duplicates are a caller-contract violation: debug builds assert, release builds produce an
/// unspecified (but memory-safe) changeset.
///
/// The output is deterministic and order-stable: for a fixed pair of forests the same changeset is
/// produced, with removals/mutations in ascending old-index order, inserts ascending by new index,
/// and moves ascending by destination. `diff(a, a)` is empty.
pub fn diff<K: DiffKey, R: PartialEq>(old: &Forest<K, R>, new: &Forest<K, R>) -> ForestChangeset {
    let old_keys: Vec<&K> = old.sections.iter().map(|s| &s.key).collect();
    let new_keys: Vec<&K> = new.sections.iter().map(|s| &s.key).collect();

    let sections = diff_keyed(&old_keys, &new_keys, |o, n| {
        old.sections[o].supplements == new.sections[n].supplements
    });

    // Retained sections = stable pairs + move pairs, ordered by new index.
    let mut retained: Vec<(usize, usize)> =
        sections.stable_pairs(old_keys.len(), new_keys.len());
    retained.extend(sections.moves.iter().map(|m| (m.source, m.destination)));
    retained.sort_unstable_by_key(|&(_, n)| n);

    let mut item_changes = Vec::new();
    for (old_section, new_section) in retained {
        let old_items = &old.sections[old_section].items;
        let new_items = &new.sections[new_section].items;
        let old_item_keys: Vec<&K> = old_items.iter().map(|it| &it.key).collect();
        let new_item_keys: Vec<&K> = new_items.iter().map(|it| &it.key).collect();
        let items = diff_keyed(&old_item_keys, &new_item_keys, |o, n| {
            old_items[o].payload == new_items[n].payload
        });
        if !items.is_empty() {
            item_changes.push(SectionItemChanges {
                old_section,
                new_section,
                items,
            });
        }
    }

    let changeset = ForestChangeset {
        sections,
        item_changes,
    };
    rdebug!(
        section_changes = changeset.sections.change_count(),
        sections_with_item_changes = changeset.item_changes.len(),
        "diff"
    );
    changeset
}

/// Diffs one level of keyed, ordered elements.
///
/// `payload_unchanged(old_index, new_index)` is consulted for every retained key to decide whether
/// the element mutated. Retained elements that keep their relative order are not reported as
/// moves, even when surrounding removals/inserts shift their absolute index; the minimal move set
/// is the complement of the longest increasing subsequence of new indices taken in old order.
pub fn diff_keyed<K: DiffKey>(
    old_keys: &[K],
    new_keys: &[K],
    mut payload_unchanged: impl FnMut(usize, usize) -> bool,
) -> Changeset {
    let mut new_index = KeyIndexMap::<K>::default();
    for (n, key) in new_keys.iter().enumerate() {
        let prev = new_index.insert(key.clone(), n);
        if prev.is_some() {
            rwarn!(index = n, "duplicate key in new snapshot");
            debug_assert!(prev.is_none(), "duplicate key in new snapshot at index {n}");
        }
    }
    let mut old_index = KeyIndexMap::<K>::default();
    for (o, key) in old_keys.iter().enumerate() {
        let prev = old_index.insert(key.clone(), o);
        if prev.is_some() {
            rwarn!(index = o, "duplicate key in old snapshot");
            debug_assert!(prev.is_none(), "duplicate key in old snapshot at index {o}");
        }
    }

    let mut removals = Vec::new();
    // Retained elements in old order, annotated with their new index.
    let mut retained: Vec<(usize, usize)> = Vec::new();
    for (o, key) in old_keys.iter().enumerate() {
        match new_index.get(key) {
            Some(&n) => retained.push((o, n)),
            None => removals.push(o),
        }
    }

    let inserts: Vec<usize> = new_keys
        .iter()
        .enumerate()
        .filter(|(_, key)| !old_index.contains_key(*key))
        .map(|(n, _)| n)
        .collect();

    let stable = lis_membership(&retained);

    let mut mutations = Vec::new();
    let mut moves = Vec::new();
    for (slot, &(o, n)) in retained.iter().enumerate() {
        let mutated = !payload_unchanged(o, n);
        if stable[slot] {
            if mutated {
                mutations.push(o);
            }
        } else {
            moves.push(Move {
                source: o,
                destination: n,
                is_mutated: mutated,
            });
        }
    }
    moves.sort_unstable_by_key(|m| m.destination);

    Changeset {
        removals,
        inserts,
        mutations,
        moves,
    }
}

/// Marks which retained elements belong to the longest strictly increasing subsequence of their
/// new indices (patience algorithm, `O(n log n)`). Marked elements keep their relative order and
/// need no move operation.
fn lis_membership(retained: &[(usize, usize)]) -> Vec<bool> {
    let n = retained.len();
    let mut member = vec![false; n];
    if n == 0 {
        return member;
    }

    // tails[l] = position (in `retained`) of the smallest tail of an increasing run of length l+1.
    let mut tails: Vec<usize> = Vec::with_capacity(n);
    let mut prev: Vec<Option<usize>> = vec![None; n];

    for (pos, &(_, new_idx)) in retained.iter().enumerate() {
        // Binary search for the first tail whose new index is >= new_idx.
        let mut lo = 0usize;
        let mut hi = tails.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            if retained[tails[mid]].1 < new_idx {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        prev[pos] = if lo > 0 { Some(tails[lo - 1]) } else { None };
        if lo == tails.len() {
            tails.push(pos);
        } else {
            tails[lo] = pos;
        }
    }

    let mut cursor = tails.last().copied();
    while let Some(pos) = cursor {
        member[pos] = true;
        cursor = prev[pos];
    }
    member
}
