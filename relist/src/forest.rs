use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// The name of a supplement slot (e.g. "header"/"footer", or a custom label).
///
/// The set of names is open, but a section holds at most one renderable per name, and an adapter
/// must declare which names it understands before it can distinguish "this section has no footer"
/// from "footers are not a thing here".
pub type SupplementName = Cow<'static, str>;

/// The conventional supplement slot rendered above a section's items.
pub const HEADER: SupplementName = Cow::Borrowed("header");
/// The conventional supplement slot rendered below a section's items.
pub const FOOTER: SupplementName = Cow::Borrowed("footer");

/// An index path addressing one item slot: `(section index, item index)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemPath {
    pub section: usize,
    pub item: usize,
}

impl ItemPath {
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

/// A keyed item: a stable identity plus an opaque, equality-comparable payload.
///
/// Items are immutable value snapshots. A new `Item` with the same key but a different payload
/// represents a *mutation* of that logical slot, which the differ detects via `R: PartialEq`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item<K, R> {
    pub key: K,
    pub payload: R,
}

impl<K, R> Item<K, R> {
    pub fn new(key: K, payload: R) -> Self {
        Self { key, payload }
    }
}

/// A keyed section: an ordered list of items plus optional named supplements.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section<K, R> {
    pub key: K,
    pub supplements: BTreeMap<SupplementName, R>,
    pub items: Vec<Item<K, R>>,
}

impl<K, R> Section<K, R> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            supplements: BTreeMap::new(),
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, key: K, payload: R) -> Self {
        self.items.push(Item::new(key, payload));
        self
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = Item<K, R>>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn with_supplement(mut self, name: SupplementName, payload: R) -> Self {
        self.supplements.insert(name, payload);
        self
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the renderable in the named slot, if this section presents one.
    pub fn supplement(&self, name: &str) -> Option<&R> {
        self.supplements.get(name)
    }

    pub fn has_supplement(&self, name: &str) -> bool {
        self.supplements.contains_key(name)
    }
}

/// The entire committed state at any instant: an ordered collection of sections.
///
/// A forest is replaced wholesale on each update; the previous forest is only needed long enough
/// to diff against the new one.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Forest<K, R> {
    pub sections: Vec<Section<K, R>>,
}

impl<K, R> Forest<K, R> {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    pub fn from_sections(sections: impl IntoIterator<Item = Section<K, R>>) -> Self {
        Self {
            sections: sections.into_iter().collect(),
        }
    }

    pub fn with_section(mut self, section: Section<K, R>) -> Self {
        self.sections.push(section);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn section(&self, index: usize) -> Option<&Section<K, R>> {
        self.sections.get(index)
    }

    pub fn item_count(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, |s| s.items.len())
    }

    /// Per-section item counts, in section order.
    pub fn item_counts(&self) -> Vec<usize> {
        self.sections.iter().map(|s| s.items.len()).collect()
    }

    pub fn item(&self, path: ItemPath) -> Option<&Item<K, R>> {
        self.sections.get(path.section)?.items.get(path.item)
    }

    pub fn total_item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}
