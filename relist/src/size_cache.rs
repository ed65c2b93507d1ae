use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;
use core::mem;

use crate::changeset::{Changeset, ForestChangeset};
use crate::forest::{Forest, ItemPath, Section, SupplementName};
use crate::options::Margins;

/// A measured 2D size, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The result of a size cache query.
///
/// The "not available" variants are expected results callers branch on, never errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizeQueryResult {
    /// Caching is disabled; measure directly.
    NotCaching,
    /// The queried slot does not exist (e.g. the section presents no such supplement).
    NoSuchSlot,
    /// Caching is enabled but this slot has not been measured (or was invalidated).
    NoCachedResult,
    Cached(Size),
}

impl SizeQueryResult {
    /// The cached size, if this query hit.
    pub fn cached(self) -> Option<Size> {
        match self {
            Self::Cached(size) => Some(size),
            _ => None,
        }
    }
}

/// The tuple under which every cached measurement was taken.
///
/// Any change wholesale-invalidates the cache (all slots become Unknown) without changing its
/// positional shape: the contents were measured under the old bounds, but the forest did not move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvalidationKey {
    /// The fixed-axis extent measurements are constrained to; `None` for compressed sizing.
    pub constraint: Option<u32>,
    pub margins: Margins,
}

// A slot is Unknown (`None`) until a measurement is recorded into it.
type Slot = Option<Size>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct SectionRow {
    supplements: BTreeMap<SupplementName, Slot>,
    items: Vec<Slot>,
}

impl SectionRow {
    fn seeded<K, R>(section: &Section<K, R>) -> Self {
        Self {
            supplements: section
                .supplements
                .keys()
                .map(|name| (name.clone(), None))
                .collect(),
            items: vec![None; section.items.len()],
        }
    }

    fn clear(&mut self) {
        for slot in self.supplements.values_mut() {
            *slot = None;
        }
        for slot in &mut self.items {
            *slot = None;
        }
    }
}

/// A position-indexed store of previously measured sizes.
///
/// Measurement is assumed expensive; the cache amortizes it across redraws where content and
/// bounds are unchanged. It is a pure cache: correctness (never returning a stale size) strictly
/// dominates hit rate, and its absence only costs re-measurement.
///
/// Entries are created lazily by `record_*`, relocated/invalidated in lock-step with a changeset
/// by [`SizeCache::apply_changeset`], and wholesale-reset when the invalidation key changes or on
/// a full reload.
#[derive(Clone, Debug)]
pub struct SizeCache {
    enabled: bool,
    invalidation_key: InvalidationKey,
    rows: Vec<SectionRow>,
}

impl SizeCache {
    /// Creates a cache with an empty positional shape.
    ///
    /// Seed the shape from the committed forest via [`SizeCache::reset_to_shape`].
    pub fn new(enabled: bool, invalidation_key: InvalidationKey) -> Self {
        Self {
            enabled,
            invalidation_key,
            rows: Vec::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Toggles caching. Turning it off releases all storage; turning it on (re-)seeds an
    /// all-Unknown cache shaped to `forest`.
    pub fn set_enabled<K, R>(&mut self, enabled: bool, forest: &Forest<K, R>) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        rdebug!(enabled, "SizeCache::set_enabled");
        if enabled {
            self.reset_to_shape(forest);
        } else {
            self.rows = Vec::new();
        }
    }

    pub fn invalidation_key(&self) -> InvalidationKey {
        self.invalidation_key
    }

    /// Replaces the invalidation key. On change, every slot becomes Unknown; the shape stays.
    pub fn set_invalidation_key(&mut self, key: InvalidationKey) {
        if self.invalidation_key == key {
            return;
        }
        self.invalidation_key = key;
        rdebug!("SizeCache::set_invalidation_key: invalidating all slots");
        for row in &mut self.rows {
            row.clear();
        }
    }

    /// Discards everything and re-seeds an all-Unknown cache shaped to `forest`.
    ///
    /// This is the no-changeset (full reload) path: no key-based salvage is attempted.
    pub fn reset_to_shape<K, R>(&mut self, forest: &Forest<K, R>) {
        if !self.enabled {
            self.rows = Vec::new();
            return;
        }
        self.rows = forest.sections.iter().map(SectionRow::seeded).collect();
        rtrace!(sections = self.rows.len(), "SizeCache::reset_to_shape");
    }

    /// Queries the cached size for an item slot.
    ///
    /// `path` must lie within the committed forest's shape when caching is enabled; querying
    /// outside it is a caller error.
    pub fn item(&self, path: ItemPath) -> SizeQueryResult {
        if !self.enabled {
            return SizeQueryResult::NotCaching;
        }
        let row = self.row(path.section);
        assert!(
            path.item < row.items.len(),
            "item index {} out of cache bounds (section {} has {} item slots)",
            path.item,
            path.section,
            row.items.len()
        );
        match row.items[path.item] {
            Some(size) => SizeQueryResult::Cached(size),
            None => SizeQueryResult::NoCachedResult,
        }
    }

    /// Queries the cached size for a supplement slot.
    ///
    /// A section that does not present the named supplement yields `NoSuchSlot`.
    pub fn supplement(&self, section: usize, name: &str) -> SizeQueryResult {
        if !self.enabled {
            return SizeQueryResult::NotCaching;
        }
        match self.row(section).supplements.get(name) {
            None => SizeQueryResult::NoSuchSlot,
            Some(None) => SizeQueryResult::NoCachedResult,
            Some(Some(size)) => SizeQueryResult::Cached(*size),
        }
    }

    /// Stores a freshly measured item size. Ignored while caching is disabled.
    pub fn record_item(&mut self, path: ItemPath, size: Size) {
        if !self.enabled {
            return;
        }
        let section = path.section;
        let row = self.row_mut(section);
        assert!(
            path.item < row.items.len(),
            "item index {} out of cache bounds (section {section} has {} item slots)",
            path.item,
            row.items.len()
        );
        row.items[path.item] = Some(size);
    }

    /// Stores a freshly measured supplement size. Ignored while caching is disabled.
    ///
    /// Recording into a slot the section does not present is a caller error.
    pub fn record_supplement(&mut self, section: usize, name: &str, size: Size) {
        if !self.enabled {
            return;
        }
        let slot = self
            .row_mut(section)
            .supplements
            .get_mut(name)
            .unwrap_or_else(|| panic!("section {section} presents no supplement named {name:?}"));
        *slot = Some(size);
    }

    /// The number of slots currently holding a measured size.
    pub fn cached_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| {
                row.items.iter().filter(|s| s.is_some()).count()
                    + row.supplements.values().filter(|s| s.is_some()).count()
            })
            .sum()
    }

    /// Relocates and invalidates entries in lock-step with a changeset.
    ///
    /// - Vacated old rows (removals, move sources) are dropped.
    /// - Occupied new rows (inserts, move destinations of mutated moves) start all-Unknown.
    /// - An unmutated moved section carries its whole row to the new position.
    /// - A mutated section (moved or stable) has its supplement slots reset; its item slots are
    ///   governed by the nested item-level changeset like every other retained section's.
    ///
    /// The changeset must have been produced by diffing the previously committed forest against
    /// `new_forest`; mismatched bookkeeping is a fatal programmer error.
    pub fn apply_changeset<K, R>(
        &mut self,
        changeset: &ForestChangeset,
        new_forest: &Forest<K, R>,
    ) {
        if !self.enabled {
            return;
        }

        let old_rows = mem::take(&mut self.rows);
        let old_len = old_rows.len();
        let new_len = new_forest.section_count();
        let sections = &changeset.sections;

        rtrace!(
            old_sections = old_len,
            new_sections = new_len,
            changes = changeset.change_count(),
            "SizeCache::apply_changeset"
        );

        let mut taken: Vec<Option<SectionRow>> = old_rows.into_iter().map(Some).collect();
        let mut rows: Vec<SectionRow> = new_forest.sections.iter().map(SectionRow::seeded).collect();

        let mut mutated_old = vec![false; old_len];
        for &o in &sections.mutations {
            assert!(o < old_len, "mutation index {o} out of bounds (len {old_len})");
            mutated_old[o] = true;
        }

        // Retained sections: stable pairs plus unmutated moves carry their row; a mutated
        // retained section keeps only its item slots (supplements were re-seeded Unknown).
        let mut carry = |taken: &mut Vec<Option<SectionRow>>,
                         rows: &mut Vec<SectionRow>,
                         o: usize,
                         n: usize,
                         mutated: bool| {
            let old_row = taken[o]
                .take()
                .unwrap_or_else(|| panic!("old section {o} consumed twice by changeset"));
            if mutated {
                rows[n].items = old_row.items;
            } else {
                rows[n] = old_row;
            }
        };

        for (o, n) in sections.stable_pairs(old_len, new_len) {
            carry(&mut taken, &mut rows, o, n, mutated_old[o]);
        }
        for m in &sections.moves {
            carry(&mut taken, &mut rows, m.source, m.destination, m.is_mutated);
        }

        // Nested item-level changesets re-home each retained section's item slots.
        for changes in &changeset.item_changes {
            let n = changes.new_section;
            assert!(
                n < new_len,
                "item changes reference section {n} out of bounds (len {new_len})"
            );
            let old_items = mem::take(&mut rows[n].items);
            let new_count = new_forest.item_count(n);
            rows[n].items = relocate_items(&changes.items, old_items, new_count);
        }

        // Retained sections without recorded item changes kept their carried slots verbatim;
        // their length must already match the new forest's shape.
        for (n, row) in rows.iter().enumerate() {
            assert!(
                row.items.len() == new_forest.item_count(n),
                "cache shape mismatch at section {n}: {} item slots vs {} items",
                row.items.len(),
                new_forest.item_count(n)
            );
        }

        self.rows = rows;
    }

    fn row(&self, section: usize) -> &SectionRow {
        assert!(
            section < self.rows.len(),
            "section index {section} out of cache bounds (len {})",
            self.rows.len()
        );
        &self.rows[section]
    }

    fn row_mut(&mut self, section: usize) -> &mut SectionRow {
        assert!(
            section < self.rows.len(),
            "section index {section} out of cache bounds (len {})",
            self.rows.len()
        );
        &mut self.rows[section]
    }
}

/// Applies one level of item edits to a section's item slots.
///
/// Removed and moved-from slots are dropped at their old position; inserted slots start Unknown;
/// an unmutated move carries its slot; mutated slots (moved or stable) become Unknown.
fn relocate_items(changes: &Changeset, old_items: Vec<Slot>, new_count: usize) -> Vec<Slot> {
    let old_count = old_items.len();
    let mut items = vec![None; new_count];

    let mut mutated_old = vec![false; old_count];
    for &o in &changes.mutations {
        assert!(o < old_count, "mutation index {o} out of bounds (len {old_count})");
        mutated_old[o] = true;
    }

    for (o, n) in changes.stable_pairs(old_count, new_count) {
        if !mutated_old[o] {
            items[n] = old_items[o];
        }
    }
    for m in &changes.moves {
        if !m.is_mutated {
            items[m.destination] = old_items[m.source];
        }
    }
    items
}
