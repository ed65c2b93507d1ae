use alloc::vec;
use alloc::vec::Vec;

/// A retained element that changed position between the old and new snapshot.
///
/// `is_mutated` means the same key survived at a new position *with a new payload*: its content
/// and cached size must be treated as unknown even though identity is preserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    /// Index in the old snapshot.
    pub source: usize,
    /// Index in the new snapshot.
    pub destination: usize,
    pub is_mutated: bool,
}

/// One level of structural edits between two keyed, ordered snapshots.
///
/// Coordinate conventions (all orderings are produced by the differ and relied on by the applier):
/// - `removals` and `mutations` are **old** indices, ascending.
/// - `inserts` are **new** indices, ascending.
/// - `moves` are ordered by ascending destination.
///
/// A `mutations` entry is a retained element whose payload changed while its relative position did
/// not; positional changes with payload changes surface as `Move { is_mutated: true }`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Changeset {
    pub removals: Vec<usize>,
    pub inserts: Vec<usize>,
    pub mutations: Vec<usize>,
    pub moves: Vec<Move>,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty()
            && self.inserts.is_empty()
            && self.mutations.is_empty()
            && self.moves.is_empty()
    }

    pub fn change_count(&self) -> usize {
        self.removals.len() + self.inserts.len() + self.mutations.len() + self.moves.len()
    }

    /// Old indices vacated by this changeset (removals plus move sources), as a membership mask.
    pub(crate) fn vacated_mask(&self, old_len: usize) -> Vec<bool> {
        let mut mask = vec![false; old_len];
        for &i in &self.removals {
            assert!(i < old_len, "removal index {i} out of bounds (len {old_len})");
            mask[i] = true;
        }
        for m in &self.moves {
            assert!(
                m.source < old_len,
                "move source {} out of bounds (len {old_len})",
                m.source
            );
            mask[m.source] = true;
        }
        mask
    }

    /// New indices occupied by this changeset (inserts plus move destinations), as a mask.
    pub(crate) fn occupied_mask(&self, new_len: usize) -> Vec<bool> {
        let mut mask = vec![false; new_len];
        for &i in &self.inserts {
            assert!(i < new_len, "insert index {i} out of bounds (len {new_len})");
            mask[i] = true;
        }
        for m in &self.moves {
            assert!(
                m.destination < new_len,
                "move destination {} out of bounds (len {new_len})",
                m.destination
            );
            mask[m.destination] = true;
        }
        mask
    }

    /// The canonical old → new mapping for elements this changeset does not relocate.
    ///
    /// Zips the non-vacated old indices with the non-occupied new indices, both ascending. The two
    /// sides must pair up exactly; a length mismatch means the changeset was not produced against
    /// this pair of snapshots, which is a fatal caller error.
    pub(crate) fn stable_pairs(&self, old_len: usize, new_len: usize) -> Vec<(usize, usize)> {
        let vacated = self.vacated_mask(old_len);
        let occupied = self.occupied_mask(new_len);
        let old_stable = (0..old_len).filter(|&i| !vacated[i]);
        let mut new_stable = (0..new_len).filter(|&i| !occupied[i]);
        let mut pairs = Vec::new();
        for o in old_stable {
            let n = new_stable.next().unwrap_or_else(|| {
                panic!("changeset shape mismatch: more stable old slots than new slots")
            });
            pairs.push((o, n));
        }
        assert!(
            new_stable.next().is_none(),
            "changeset shape mismatch: more stable new slots than old slots"
        );
        pairs
    }
}

/// The nested item-level edits for one section retained across the update.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionItemChanges {
    /// The section's index in the old forest.
    pub old_section: usize,
    /// The section's index in the new forest.
    pub new_section: usize,
    pub items: Changeset,
}

/// The full edit script between two forests: section-level edits plus, for each retained section,
/// the item-level edits within it.
///
/// `item_changes` is ordered by ascending `new_section`; retained sections whose item lists did
/// not change are elided.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForestChangeset {
    pub sections: Changeset,
    pub item_changes: Vec<SectionItemChanges>,
}

impl ForestChangeset {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.item_changes.iter().all(|c| c.items.is_empty())
    }

    pub fn change_count(&self) -> usize {
        self.sections.change_count()
            + self
                .item_changes
                .iter()
                .map(|c| c.items.change_count())
                .sum::<usize>()
    }

    /// The nested item changeset for the retained section at `new_section`, if any was recorded.
    pub fn item_changes_for(&self, new_section: usize) -> Option<&SectionItemChanges> {
        self.item_changes
            .iter()
            .find(|c| c.new_section == new_section)
    }
}
