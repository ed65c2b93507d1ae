use relist::{Forest, Section, diff};

fn main() {
    // Old state: four sections, keyed "a".."d".
    let old: Forest<&str, u32> = Forest::from_sections([
        Section::new("a").with_item("a1", 0).with_item("a2", 0),
        Section::new("b").with_item("b1", 0),
        Section::new("c"),
        Section::new("d").with_item("d1", 0),
    ]);

    // New state: "b" removed, "d" hoisted to the front, one of "a"'s items edited.
    let new: Forest<&str, u32> = Forest::from_sections([
        Section::new("d").with_item("d1", 0),
        Section::new("a").with_item("a1", 7).with_item("a2", 0),
        Section::new("c"),
    ]);

    let changeset = diff(&old, &new);
    println!("empty={}", changeset.is_empty());
    println!("section removals={:?}", changeset.sections.removals);
    println!("section inserts={:?}", changeset.sections.inserts);
    for m in &changeset.sections.moves {
        println!(
            "section move {} -> {} (mutated={})",
            m.source, m.destination, m.is_mutated
        );
    }
    for changes in &changeset.item_changes {
        println!(
            "items of old section {} (now {}): removals={:?} inserts={:?} mutations={:?}",
            changes.old_section,
            changes.new_section,
            changes.items.removals,
            changes.items.inserts,
            changes.items.mutations
        );
    }
    println!("total ops={}", changeset.change_count());
}
