use alloc::vec::Vec;

use crate::changeset::ForestChangeset;
use crate::forest::{Forest, ItemPath, SupplementName};
use crate::size_cache::SizeCache;

/// The host view container's native batch-update primitives.
///
/// Coordinate contract (matching native collection-container semantics): removal paths and move
/// sources are **pre-batch** (old) coordinates; insertion paths and move destinations are
/// **post-batch** (new) coordinates. All operations issued inside one [`perform_batch`] must be
/// applied as a single atomic, animatable transaction — buffering them and resolving removals
/// descending before insertions ascending is the container's job.
///
/// [`perform_batch`]: ContainerAdapter::perform_batch
pub trait ContainerAdapter<K, R> {
    /// Whether the container can currently animate an incremental batch (e.g. it is attached to
    /// a live display). When `false`, the applier skips incremental updates entirely and asks for
    /// a full [`reload`](ContainerAdapter::reload) instead.
    fn is_live(&self) -> bool;

    /// Performs a synchronous, non-incremental full refresh from the new forest.
    fn reload(&mut self, new_forest: &Forest<K, R>);

    /// Applies all operations issued by `work` as one atomic transaction.
    ///
    /// `new_forest` is the data source for content the container must materialize for inserted
    /// slots. The default implementation simply runs `work` inline.
    fn perform_batch(&mut self, new_forest: &Forest<K, R>, work: impl FnOnce(&mut Self))
    where
        Self: Sized,
    {
        let _ = new_forest;
        work(self);
    }

    /// Removes sections at the given old indices (descending).
    fn remove_sections(&mut self, indices: &[usize]);
    /// Inserts sections at the given new indices (ascending).
    fn insert_sections(&mut self, indices: &[usize]);
    /// Moves one section from an old index to a new index, preserving its views.
    fn move_section(&mut self, from: usize, to: usize);

    /// Removes items at the given old paths (descending).
    fn remove_items(&mut self, paths: &[ItemPath]);
    /// Inserts items at the given new paths (ascending).
    fn insert_items(&mut self, paths: &[ItemPath]);
    /// Moves one item from an old path to a new path, preserving its view.
    fn move_item(&mut self, from: ItemPath, to: ItemPath);

    /// Rebinds already-visible supplement views without destroying them.
    ///
    /// `moved` pairs `(old section index, new section index)` for every retained section whose
    /// supplements need rebinding (it moved, or its supplement content changed in place);
    /// `names` are the supplement slots those sections present in `new_forest`.
    fn update_supplements(
        &mut self,
        names: &[SupplementName],
        moved: &[(usize, usize)],
        new_forest: &Forest<K, R>,
    );
}

/// How an update reached the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The changeset was applied as one incremental native batch.
    Incremental,
    /// The container was not live; cache and container were rebuilt from scratch.
    FullReload,
}

/// Applies a changeset to the size cache and the external container, in lock-step.
///
/// The changeset must have been produced by [`crate::diff`] between the previously committed
/// forest and `new_forest`; inconsistent index bookkeeping is a fatal programmer error, since
/// continuing would silently corrupt cache and view state.
///
/// Mutated moves (same key, new position, new payload) are decomposed into remove+insert for the
/// container — the content is unknown, so the view is recreated rather than moved — before the
/// removal/insertion lists are issued, which also guarantees a move landing on a freshly inserted
/// index is never double-inserted. Unmutated moves use the native move primitive and keep their
/// views and cached sizes.
///
/// A container that is not live cannot animate partial updates; the applier then discards the
/// cache, re-seeds it to the new forest's shape, and asks the container for a full reload.
pub fn apply<K, R, C: ContainerAdapter<K, R>>(
    changeset: &ForestChangeset,
    new_forest: &Forest<K, R>,
    cache: &mut SizeCache,
    container: &mut C,
) -> ApplyOutcome {
    if !container.is_live() {
        rdebug!("apply: container not live, taking the full-reload path");
        cache.reset_to_shape(new_forest);
        container.reload(new_forest);
        return ApplyOutcome::FullReload;
    }

    let sections = &changeset.sections;
    let new_len = new_forest.section_count();
    let old_len = (new_len + sections.removals.len())
        .checked_sub(sections.inserts.len())
        .unwrap_or_else(|| panic!("changeset shape mismatch: more section inserts than slots"));

    // Validates the changeset's section bookkeeping against the new forest's shape.
    let stable = sections.stable_pairs(old_len, new_len);

    let mut section_removals = sections.removals.clone();
    let mut section_inserts = sections.inserts.clone();
    for m in &sections.moves {
        if m.is_mutated {
            section_removals.push(m.source);
            section_inserts.push(m.destination);
        }
    }
    section_removals.sort_unstable_by(|a, b| b.cmp(a));
    section_inserts.sort_unstable();

    // Sections whose supplement views survive but need rebinding: unmutated moves, plus stable
    // sections whose supplement content changed in place.
    let stable_new_of = |o: usize| -> usize {
        stable
            .iter()
            .find(|&&(so, _)| so == o)
            .map(|&(_, sn)| sn)
            .unwrap_or_else(|| panic!("mutation index {o} does not address a stable section"))
    };
    let mut rebound: Vec<(usize, usize)> = sections
        .moves
        .iter()
        .filter(|m| !m.is_mutated)
        .map(|m| (m.source, m.destination))
        .collect();
    for &o in &sections.mutations {
        rebound.push((o, stable_new_of(o)));
    }
    rebound.sort_unstable_by_key(|&(_, n)| n);

    let mut supplement_names: Vec<SupplementName> = rebound
        .iter()
        .flat_map(|&(_, n)| new_forest.sections[n].supplements.keys().cloned())
        .collect();
    supplement_names.sort_unstable();
    supplement_names.dedup();

    // Item edits for retained sections. Sections recreated by a decomposed mutated move are
    // skipped: the section insert re-materializes their entire item list.
    let mut item_removals: Vec<ItemPath> = Vec::new();
    let mut item_inserts: Vec<ItemPath> = Vec::new();
    let mut item_moves: Vec<(ItemPath, ItemPath)> = Vec::new();
    for changes in &changeset.item_changes {
        let recreated = sections
            .moves
            .iter()
            .any(|m| m.is_mutated && m.source == changes.old_section);
        if recreated {
            continue;
        }

        let items = &changes.items;
        let new_count = new_forest.item_count(changes.new_section);
        let old_count = (new_count + items.removals.len())
            .checked_sub(items.inserts.len())
            .unwrap_or_else(|| {
                panic!(
                    "changeset shape mismatch in section {}: more item inserts than slots",
                    changes.new_section
                )
            });
        let item_stable = items.stable_pairs(old_count, new_count);

        for &i in &items.removals {
            item_removals.push(ItemPath::new(changes.old_section, i));
        }
        for &i in &items.inserts {
            item_inserts.push(ItemPath::new(changes.new_section, i));
        }
        for m in &items.moves {
            let from = ItemPath::new(changes.old_section, m.source);
            let to = ItemPath::new(changes.new_section, m.destination);
            if m.is_mutated {
                item_removals.push(from);
                item_inserts.push(to);
            } else {
                item_moves.push((from, to));
            }
        }
        // Plain mutations: content changed in place, so the item view is recreated at its
        // stable-mapped new path.
        for &o in &items.mutations {
            let n = item_stable
                .iter()
                .find(|&&(so, _)| so == o)
                .map(|&(_, sn)| sn)
                .unwrap_or_else(|| {
                    panic!(
                        "mutation index {o} does not address a stable item in section {}",
                        changes.new_section
                    )
                });
            item_removals.push(ItemPath::new(changes.old_section, o));
            item_inserts.push(ItemPath::new(changes.new_section, n));
        }
    }
    item_removals.sort_unstable_by(|a, b| b.cmp(a));
    item_inserts.sort_unstable();

    rdebug!(
        section_removals = section_removals.len(),
        section_inserts = section_inserts.len(),
        section_moves = sections.moves.len(),
        item_removals = item_removals.len(),
        item_inserts = item_inserts.len(),
        item_moves = item_moves.len(),
        "apply: incremental batch"
    );

    container.perform_batch(new_forest, |c| {
        if !section_removals.is_empty() {
            c.remove_sections(&section_removals);
        }
        if !section_inserts.is_empty() {
            c.insert_sections(&section_inserts);
        }
        for m in sections.moves.iter().filter(|m| !m.is_mutated) {
            c.move_section(m.source, m.destination);
        }
        if !item_removals.is_empty() {
            c.remove_items(&item_removals);
        }
        if !item_inserts.is_empty() {
            c.insert_items(&item_inserts);
        }
        for &(from, to) in &item_moves {
            c.move_item(from, to);
        }
        if !rebound.is_empty() {
            c.update_supplements(&supplement_names, &rebound, new_forest);
        }
    });

    cache.apply_changeset(changeset, new_forest);
    ApplyOutcome::Incremental
}
