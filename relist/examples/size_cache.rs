use relist::{
    BoundSize, Forest, ItemPath, ListOptions, Section, Size, SizeCache, SizeQueryResult, diff,
};

fn measure(payload: u32, width: u32) -> Size {
    Size {
        width,
        height: 40 + payload,
    }
}

fn main() {
    let options = ListOptions::new()
        .with_caches_size_information(true)
        .with_bound_size(BoundSize::new(320, 480));

    let old: Forest<u64, u32> = Forest::from_sections([
        Section::new(1).with_item(10, 0).with_item(11, 3),
        Section::new(2).with_item(20, 5),
    ]);

    let mut cache = SizeCache::new(options.caches_size_information, options.invalidation_key());
    cache.reset_to_shape(&old);

    // Fill the cache the way a layout pass would: miss, measure, record.
    let width = options.bound_size.width;
    for section in 0..old.section_count() {
        for item in 0..old.item_count(section) {
            let path = ItemPath::new(section, item);
            if let SizeQueryResult::NoCachedResult = cache.item(path) {
                let payload = old.item(path).map(|i| i.payload).unwrap_or(0);
                cache.record_item(path, measure(payload, width));
            }
        }
    }
    println!("cached after fill: {}", cache.cached_count());

    // Reorder the sections and edit one item; cached sizes ride along with their slots.
    let new: Forest<u64, u32> = Forest::from_sections([
        Section::new(2).with_item(20, 5),
        Section::new(1).with_item(10, 9).with_item(11, 3),
    ]);
    let changeset = diff(&old, &new);
    cache.apply_changeset(&changeset, &new);

    println!("cached after reorder: {}", cache.cached_count());
    println!("moved slot: {:?}", cache.item(ItemPath::new(0, 0)));
    println!("edited slot: {:?}", cache.item(ItemPath::new(1, 0)));

    // Shrinking the width bound orphans every cached measurement at once.
    let narrower = options.with_bound_size(BoundSize::new(280, 480));
    cache.set_invalidation_key(narrower.invalidation_key());
    println!("cached after bound change: {}", cache.cached_count());
}
