use alloc::borrow::Cow;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::Cell;

use relist::{
    ApplyOutcome, BoundSize, Constraint, Forest, HEADER, ItemPath, ListOptions, Margins, Section,
    Size, SizingStrategy,
};

use crate::{ContainerOp, Deletable, Focusable, ItemCapabilities, ListController, RecordingContainer};

fn section(key: u64, items: &[(u64, u64)]) -> Section<u64, u64> {
    let mut s = Section::new(key);
    for &(k, payload) in items {
        s = s.with_item(k, payload);
    }
    s
}

fn caching_options() -> ListOptions {
    ListOptions::new()
        .with_caches_size_information(true)
        .with_bound_size(BoundSize {
            width: 320,
            height: 480,
        })
}

/// Deterministic PRNG for the randomized reconciliation tests.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

fn gen_forest(rng: &mut Lcg) -> Forest<u64, u64> {
    // Small key pools force overlap, so successive forests share keys and the diff produces a
    // mix of removals, inserts, moves, and mutations.
    let section_count = rng.below(4) as usize;
    let mut forest = Forest::new();
    let mut used_sections = Vec::new();
    for _ in 0..section_count {
        let key = rng.below(6);
        if used_sections.contains(&key) {
            continue;
        }
        used_sections.push(key);
        let mut s = Section::new(key);
        if rng.below(2) == 0 {
            s = s.with_supplement(HEADER, rng.below(3));
        }
        let item_count = rng.below(5) as usize;
        let mut used_items = Vec::new();
        for _ in 0..item_count {
            let item_key = rng.below(10);
            if used_items.contains(&item_key) {
                continue;
            }
            used_items.push(item_key);
            s = s.with_item(item_key, rng.below(4));
        }
        forest = forest.with_section(s);
    }
    forest
}

#[test]
fn update_reconciles_the_container_shadow() {
    let old = Forest::from_sections([
        section(1, &[(10, 0), (11, 0)]).with_supplement(HEADER, 7),
        section(2, &[(20, 0)]),
        section(3, &[(30, 0), (31, 0), (32, 0)]),
    ]);
    let new = Forest::from_sections([
        section(3, &[(31, 0), (30, 9), (33, 0)]),
        section(1, &[(10, 0), (11, 0)]).with_supplement(HEADER, 8),
        section(4, &[(40, 0)]),
    ]);

    let mut controller = ListController::new(caching_options());
    let mut container = RecordingContainer::new(true);
    assert_eq!(controller.update(old.clone(), &mut container), ApplyOutcome::Incremental);
    assert_eq!(container.shadow(), &old);

    container.clear_ops();
    assert_eq!(controller.update(new.clone(), &mut container), ApplyOutcome::Incremental);
    assert_eq!(container.shadow(), &new);
    assert_eq!(controller.forest(), &new);
}

#[test]
fn a_chain_of_random_updates_keeps_the_shadow_in_sync() {
    let mut rng = Lcg(0x5eed);
    for _ in 0..200 {
        let mut controller: ListController<u64, u64> = ListController::new(caching_options());
        let mut container = RecordingContainer::new(true);
        for _ in 0..4 {
            let next = gen_forest(&mut rng);
            controller.update(next.clone(), &mut container);
            assert_eq!(container.shadow(), &next);
        }
    }
}

#[test]
fn a_dead_container_gets_a_full_reload() {
    let old = Forest::from_sections([section(1, &[(10, 0)])]);
    let new = Forest::from_sections([section(1, &[(10, 1), (11, 0)])]);

    let mut controller = ListController::new(caching_options());
    let mut container = RecordingContainer::new(true);
    controller.update(old, &mut container);
    controller.item_size(ItemPath::new(0, 0), &|_: &u64, _: Constraint, _: Margins| Size {
        width: 320,
        height: 44,
    });
    assert_eq!(controller.cache().cached_count(), 1);

    container.set_live(false);
    assert_eq!(controller.update(new.clone(), &mut container), ApplyOutcome::FullReload);
    assert_eq!(container.reload_count(), 1);
    assert_eq!(container.shadow(), &new);
    // The fallback wipes every cached measurement along with the incremental path.
    assert_eq!(controller.cache().cached_count(), 0);
}

#[test]
fn batch_ops_are_ordered_removals_before_inserts() {
    let old = Forest::from_sections([
        section(1, &[(10, 0)]),
        section(2, &[(20, 0)]),
        section(3, &[(30, 0)]),
    ]);
    let new = Forest::from_sections([section(3, &[(30, 0), (31, 0)]), section(1, &[])]);

    let mut controller = ListController::new(caching_options());
    let mut container = RecordingContainer::new(true);
    controller.update(old, &mut container);
    container.clear_ops();
    controller.update(new, &mut container);

    let ops = container.ops();
    assert_eq!(ops.first(), Some(&ContainerOp::BatchBegin));
    assert_eq!(ops.last(), Some(&ContainerOp::BatchEnd));

    let position = |wanted: fn(&ContainerOp) -> bool| ops.iter().position(wanted);
    let removals = position(|op| matches!(op, ContainerOp::RemoveSections(_) | ContainerOp::RemoveItems(_)));
    let inserts = position(|op| matches!(op, ContainerOp::InsertSections(_) | ContainerOp::InsertItems(_)));
    if let (Some(r), Some(i)) = (removals, inserts) {
        assert!(r < i, "removals must be issued before inserts: {ops:?}");
    }

    for op in ops {
        match op {
            ContainerOp::RemoveSections(indices) => {
                assert!(indices.windows(2).all(|w| w[0] > w[1]), "{indices:?}")
            }
            ContainerOp::InsertItems(paths) => {
                assert!(paths.windows(2).all(|w| w[0] < w[1]), "{paths:?}")
            }
            _ => {}
        }
    }
}

#[test]
fn item_size_measures_once_then_serves_the_cache() {
    let forest = Forest::from_sections([section(1, &[(10, 3)])]);
    let mut controller = ListController::new(caching_options());
    let mut container = RecordingContainer::new(true);
    controller.update(forest, &mut container);

    let calls = Cell::new(0usize);
    let measurer = |payload: &u64, constraint: Constraint, _: Margins| {
        calls.set(calls.get() + 1);
        Size {
            width: constraint.max_width.unwrap_or(0),
            height: 40 + *payload as u32,
        }
    };

    let path = ItemPath::new(0, 0);
    let first = controller.item_size(path, &measurer);
    let second = controller.item_size(path, &measurer);
    assert_eq!(first, Some(Size { width: 320, height: 43 }));
    assert_eq!(second, first);
    assert_eq!(calls.get(), 1);

    // A bound change on the sizing axis invalidates the cached result; the next query
    // re-measures under the new constraint.
    let mut options = controller.options().clone();
    options.bound_size.width = 280;
    controller.set_options(options);
    let third = controller.item_size(path, &measurer);
    assert_eq!(third, Some(Size { width: 280, height: 43 }));
    assert_eq!(calls.get(), 2);
}

#[test]
fn caching_disabled_measures_every_query() {
    let forest = Forest::from_sections([section(1, &[(10, 0)])]);
    let mut controller = ListController::new(ListOptions::new());
    let mut container = RecordingContainer::new(true);
    controller.update(forest, &mut container);

    let calls = Cell::new(0usize);
    let measurer = |_: &u64, _: Constraint, _: Margins| {
        calls.set(calls.get() + 1);
        Size { width: 1, height: 1 }
    };
    let path = ItemPath::new(0, 0);
    controller.item_size(path, &measurer);
    controller.item_size(path, &measurer);
    assert_eq!(calls.get(), 2);
}

#[test]
fn supplement_size_requires_the_slot_to_exist() {
    let forest = Forest::from_sections([
        section(1, &[(10, 0)]).with_supplement(HEADER, 5),
        section(2, &[]),
    ]);
    let mut controller = ListController::new(caching_options());
    let mut container = RecordingContainer::new(true);
    controller.update(forest, &mut container);

    let measurer = |payload: &u64, _: Constraint, _: Margins| Size {
        width: 320,
        height: *payload as u32,
    };
    assert_eq!(
        controller.supplement_size(0, "header", &measurer),
        Some(Size { width: 320, height: 5 })
    );
    assert_eq!(controller.supplement_size(1, "header", &measurer), None);
    assert_eq!(controller.supplement_size(0, "footer", &measurer), None);
    assert_eq!(controller.supplement_size(9, "header", &measurer), None);
}

#[test]
fn measure_constraint_follows_the_sizing_strategy() {
    let options = ListOptions::new()
        .with_bound_size(BoundSize {
            width: 100,
            height: 200,
        })
        .with_layout_margins(Margins {
            top: 1,
            left: 2,
            bottom: 3,
            right: 4,
        })
        .with_sizing_strategy(SizingStrategy::Compressed);
    let mut controller: ListController<u64, u64> = ListController::new(options);
    let mut container = RecordingContainer::new(true);
    controller.update(Forest::from_sections([section(1, &[(10, 0)])]), &mut container);

    let seen = Cell::new(Constraint::default());
    let measurer = |_: &u64, constraint: Constraint, _: Margins| {
        seen.set(constraint);
        Size { width: 0, height: 0 }
    };
    controller.item_size(ItemPath::new(0, 0), &measurer);
    assert_eq!(seen.get(), Constraint { max_width: None, max_height: None });
}

#[test]
fn toggling_caching_through_options_reseeds_the_cache() {
    let forest = Forest::from_sections([section(1, &[(10, 0)])]);
    let mut controller = ListController::new(caching_options());
    let mut container = RecordingContainer::new(true);
    controller.update(forest, &mut container);

    let measurer = |_: &u64, _: Constraint, _: Margins| Size { width: 1, height: 1 };
    controller.item_size(ItemPath::new(0, 0), &measurer);
    assert_eq!(controller.cache().cached_count(), 1);

    let mut options = controller.options().clone();
    options.caches_size_information = false;
    controller.set_options(options);
    assert_eq!(controller.cache().cached_count(), 0);

    let mut options = controller.options().clone();
    options.caches_size_information = true;
    controller.set_options(options);
    assert_eq!(controller.cache().cached_count(), 0);
    controller.item_size(ItemPath::new(0, 0), &measurer);
    assert_eq!(controller.cache().cached_count(), 1);
}

#[test]
fn explicit_reload_refreshes_container_and_cache() {
    let old = Forest::from_sections([section(1, &[(10, 0)])]);
    let new = Forest::from_sections([section(2, &[(20, 0), (21, 0)])]);

    let mut controller = ListController::new(caching_options());
    let mut container = RecordingContainer::new(true);
    controller.update(old, &mut container);
    controller.item_size(ItemPath::new(0, 0), &|_: &u64, _: Constraint, _: Margins| Size {
        width: 1,
        height: 1,
    });

    controller.reload(new.clone(), &mut container);
    assert_eq!(container.reload_count(), 1);
    assert_eq!(container.shadow(), &new);
    assert_eq!(controller.forest(), &new);
    assert_eq!(controller.cache().cached_count(), 0);
}

#[test]
fn supplement_names_reach_the_container_on_moves() {
    let old = Forest::from_sections([
        section(1, &[(10, 0)]).with_supplement(HEADER, 1),
        section(2, &[(20, 0)]),
    ]);
    let new = Forest::from_sections([
        section(2, &[(20, 0)]),
        section(1, &[(10, 0)]).with_supplement(HEADER, 1),
    ]);

    let mut controller = ListController::new(caching_options());
    let mut container = RecordingContainer::new(true);
    controller.update(old, &mut container);
    container.clear_ops();
    controller.update(new, &mut container);

    let update = container.ops().iter().find_map(|op| match op {
        ContainerOp::UpdateSupplements { names, moved } => Some((names.clone(), moved.clone())),
        _ => None,
    });
    let (names, moved) = update.unwrap();
    assert_eq!(names, vec![Cow::Borrowed("header")]);
    assert!(moved.contains(&(0, 1)));
}

mod capabilities {
    use super::*;

    struct Row {
        locked: bool,
    }

    impl Deletable for Row {
        fn can_delete(&self) -> bool {
            !self.locked
        }
    }

    impl ItemCapabilities for Row {
        fn as_deletable(&self) -> Option<&dyn Deletable> {
            Some(self)
        }
    }

    struct Banner;

    impl ItemCapabilities for Banner {}

    #[test]
    fn capability_accessors_replace_downcasts() {
        let row = Row { locked: false };
        let locked = Row { locked: true };
        let banner = Banner;

        assert!(row.as_deletable().is_some_and(|d| d.can_delete()));
        assert!(locked.as_deletable().is_some_and(|d| !d.can_delete()));
        assert!(banner.as_deletable().is_none());
        assert!(banner.as_focusable().is_none());
    }

    struct Field;

    impl Focusable for Field {
        fn wants_focus(&self) -> bool {
            true
        }
    }

    impl ItemCapabilities for Field {
        fn as_focusable(&self) -> Option<&dyn Focusable> {
            Some(self)
        }
    }

    #[test]
    fn focus_defaults_to_off() {
        struct Plain;
        impl Focusable for Plain {}
        assert!(!Plain.wants_focus());
        assert!(Field.as_focusable().is_some_and(|f| f.wants_focus()));
    }
}
