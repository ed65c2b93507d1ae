use alloc::vec::Vec;

use relist::{ContainerAdapter, Forest, Item, ItemPath, Section, SupplementName};

/// One recorded native call, in issue order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerOp {
    RemoveSections(Vec<usize>),
    InsertSections(Vec<usize>),
    MoveSection { from: usize, to: usize },
    RemoveItems(Vec<ItemPath>),
    InsertItems(Vec<ItemPath>),
    MoveItem { from: ItemPath, to: ItemPath },
    UpdateSupplements {
        names: Vec<SupplementName>,
        moved: Vec<(usize, usize)>,
    },
    BatchBegin,
    BatchEnd,
    Reload,
}

/// A [`ContainerAdapter`] for tests: records every native call and maintains a shadow forest by
/// replaying the batch with native collection-container semantics (removals and move sources in
/// pre-batch coordinates, insertions and move destinations in post-batch coordinates, resolved
/// atomically at batch end with content pulled from the data-source forest).
///
/// After an update, the shadow must equal the new forest — if it does not, the applier issued an
/// incomplete or mis-ordered op set.
#[derive(Clone, Debug)]
pub struct RecordingContainer<K, R> {
    live: bool,
    ops: Vec<ContainerOp>,
    shadow: Forest<K, R>,
    reload_count: usize,
}

impl<K: Clone, R: Clone> RecordingContainer<K, R> {
    pub fn new(live: bool) -> Self {
        Self {
            live,
            ops: Vec::new(),
            shadow: Forest::new(),
            reload_count: 0,
        }
    }

    /// Seeds the shadow with the currently committed forest (the state a real container would
    /// already display before the first incremental update).
    pub fn with_shadow(mut self, forest: Forest<K, R>) -> Self {
        self.shadow = forest;
        self
    }

    pub fn set_live(&mut self, live: bool) {
        self.live = live;
    }

    /// The recorded native calls, in issue order.
    pub fn ops(&self) -> &[ContainerOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// The container's reconstructed display state.
    pub fn shadow(&self) -> &Forest<K, R> {
        &self.shadow
    }

    pub fn reload_count(&self) -> usize {
        self.reload_count
    }

    fn replay(&mut self, batch: &[ContainerOp], source: &Forest<K, R>) {
        // Captured content for native moves, keyed by destination.
        let mut moved_items: Vec<(ItemPath, Item<K, R>)> = Vec::new();
        let mut item_removals: Vec<ItemPath> = Vec::new();
        let mut section_moves: Vec<(usize, usize)> = Vec::new();
        let mut section_removals: Vec<usize> = Vec::new();
        let mut item_inserts: Vec<ItemPath> = Vec::new();
        let mut section_inserts: Vec<usize> = Vec::new();
        let mut supplement_updates: Vec<(usize, usize)> = Vec::new();

        for op in batch {
            match op {
                ContainerOp::RemoveSections(indices) => {
                    section_removals.extend_from_slice(indices)
                }
                ContainerOp::InsertSections(indices) => section_inserts.extend_from_slice(indices),
                ContainerOp::MoveSection { from, to } => {
                    section_removals.push(*from);
                    section_moves.push((*from, *to));
                }
                ContainerOp::RemoveItems(paths) => item_removals.extend_from_slice(paths),
                ContainerOp::InsertItems(paths) => item_inserts.extend_from_slice(paths),
                ContainerOp::MoveItem { from, to } => {
                    item_removals.push(*from);
                    moved_items.push((
                        *to,
                        self.shadow.sections[from.section].items[from.item].clone(),
                    ));
                }
                ContainerOp::UpdateSupplements { moved, .. } => {
                    supplement_updates.extend_from_slice(moved)
                }
                ContainerOp::BatchBegin | ContainerOp::BatchEnd | ContainerOp::Reload => {}
            }
        }

        // 1. Drop vacated item slots, pre-batch coordinates, descending.
        item_removals.sort_unstable_by(|a, b| b.cmp(a));
        for path in &item_removals {
            self.shadow.sections[path.section].items.remove(path.item);
        }

        // 2. Capture moved sections after item pruning so carried items reflect the batch, then
        //    drop vacated sections, descending.
        let moved_sections: Vec<(usize, Section<K, R>)> = section_moves
            .iter()
            .map(|&(from, to)| (to, self.shadow.sections[from].clone()))
            .collect();
        section_removals.sort_unstable_by(|a, b| b.cmp(a));
        for &index in &section_removals {
            self.shadow.sections.remove(index);
        }

        // 3. Materialize occupied sections, post-batch coordinates, ascending: fresh sections come
        //    complete from the data source; moved sections keep their captured content.
        let mut occupied: Vec<(usize, Section<K, R>)> = moved_sections;
        occupied.extend(
            section_inserts
                .iter()
                .map(|&n| (n, source.sections[n].clone())),
        );
        occupied.sort_unstable_by_key(|&(n, _)| n);
        for (n, content) in occupied {
            self.shadow.sections.insert(n, content);
        }

        // 4. Materialize occupied item slots, post-batch coordinates, ascending.
        let mut occupied_items: Vec<(ItemPath, Item<K, R>)> = moved_items;
        occupied_items.extend(item_inserts.iter().map(|&path| {
            let item = source
                .item(path)
                .unwrap_or_else(|| panic!("insert path outside the data source forest"));
            (path, item.clone())
        }));
        occupied_items.sort_unstable_by_key(|&(path, _)| path);
        for (path, item) in occupied_items {
            self.shadow.sections[path.section].items.insert(path.item, item);
        }

        // 5. Rebind supplement content for retained sections, from the data source.
        for &(_, new_index) in &supplement_updates {
            self.shadow.sections[new_index].supplements =
                source.sections[new_index].supplements.clone();
        }
    }
}

impl<K: Clone, R: Clone> ContainerAdapter<K, R> for RecordingContainer<K, R> {
    fn is_live(&self) -> bool {
        self.live
    }

    fn reload(&mut self, new_forest: &Forest<K, R>) {
        self.ops.push(ContainerOp::Reload);
        self.shadow = new_forest.clone();
        self.reload_count += 1;
    }

    fn perform_batch(&mut self, new_forest: &Forest<K, R>, work: impl FnOnce(&mut Self)) {
        self.ops.push(ContainerOp::BatchBegin);
        let start = self.ops.len();
        work(self);
        let batch = self.ops[start..].to_vec();
        self.replay(&batch, new_forest);
        self.ops.push(ContainerOp::BatchEnd);
    }

    fn remove_sections(&mut self, indices: &[usize]) {
        self.ops.push(ContainerOp::RemoveSections(indices.to_vec()));
    }

    fn insert_sections(&mut self, indices: &[usize]) {
        self.ops.push(ContainerOp::InsertSections(indices.to_vec()));
    }

    fn move_section(&mut self, from: usize, to: usize) {
        self.ops.push(ContainerOp::MoveSection { from, to });
    }

    fn remove_items(&mut self, paths: &[ItemPath]) {
        self.ops.push(ContainerOp::RemoveItems(paths.to_vec()));
    }

    fn insert_items(&mut self, paths: &[ItemPath]) {
        self.ops.push(ContainerOp::InsertItems(paths.to_vec()));
    }

    fn move_item(&mut self, from: ItemPath, to: ItemPath) {
        self.ops.push(ContainerOp::MoveItem { from, to });
    }

    fn update_supplements(
        &mut self,
        names: &[SupplementName],
        moved: &[(usize, usize)],
        _new_forest: &Forest<K, R>,
    ) {
        self.ops.push(ContainerOp::UpdateSupplements {
            names: names.to_vec(),
            moved: moved.to_vec(),
        });
    }
}
