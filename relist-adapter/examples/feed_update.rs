use relist::{
    BoundSize, Constraint, Forest, HEADER, ItemPath, ListOptions, Margins, Section, Size,
};
use relist_adapter::{ListController, RecordingContainer};

fn main() {
    let options = ListOptions::new()
        .with_caches_size_information(true)
        .with_bound_size(BoundSize::new(320, 480));
    let mut controller: ListController<&str, u32> = ListController::new(options);
    let mut container = RecordingContainer::new(true);

    // First update: everything is an insert.
    let feed = Forest::from_sections([
        Section::new("pinned")
            .with_supplement(HEADER, 1)
            .with_item("p1", 0),
        Section::new("recent")
            .with_item("r1", 0)
            .with_item("r2", 0)
            .with_item("r3", 0),
    ]);
    let outcome = controller.update(feed, &mut container);
    println!("first update: {outcome:?}");

    // Layout queries measure through the cache.
    let measurer = |payload: &u32, constraint: Constraint, _: Margins| Size {
        width: constraint.max_width.unwrap_or(0),
        height: 44 + *payload,
    };
    let size = controller.item_size(ItemPath::new(1, 0), &measurer);
    println!("r1 size: {size:?} (cached={})", controller.cache().cached_count() > 0);

    // Second update: a new post arrives on top and one post is edited.
    container.clear_ops();
    let feed = Forest::from_sections([
        Section::new("pinned")
            .with_supplement(HEADER, 1)
            .with_item("p1", 0),
        Section::new("recent")
            .with_item("r4", 0)
            .with_item("r1", 0)
            .with_item("r2", 9)
            .with_item("r3", 0),
    ]);
    let outcome = controller.update(feed, &mut container);
    println!("second update: {outcome:?}");
    for op in container.ops() {
        println!("  {op:?}");
    }
    println!("container in sync: {}", container.shadow() == controller.forest());

    // A container that is off-screen falls back to a full reload.
    container.set_live(false);
    let outcome = controller.update(Forest::new(), &mut container);
    println!("while detached: {outcome:?} (reloads={})", container.reload_count());
}
