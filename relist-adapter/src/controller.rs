use relist::{
    ApplyOutcome, ContainerAdapter, DiffKey, Forest, ItemPath, ListOptions, Measure, Size,
    SizeCache, SizeQueryResult, apply, diff,
};

/// A framework-neutral controller that owns one surface's committed state — the forest, its size
/// cache, and the list options — and drives updates against a [`ContainerAdapter`].
///
/// The controller is the single writer of its forest/cache pair. If multiple UI surfaces must
/// reflect the same logical data, give each its own controller fed by the same upstream producer.
///
/// Updates are synchronous and non-reentrant (`&mut self`): each [`ListController::update`] runs
/// to completion before the next is accepted, so callers must serialize updates (at most one in
/// flight).
#[derive(Clone, Debug)]
pub struct ListController<K, R> {
    options: ListOptions,
    forest: Forest<K, R>,
    cache: SizeCache,
}

impl<K: DiffKey, R: PartialEq> ListController<K, R> {
    /// Creates a controller with an empty committed forest.
    pub fn new(options: ListOptions) -> Self {
        let cache = SizeCache::new(options.caches_size_information, options.invalidation_key());
        Self {
            options,
            forest: Forest::new(),
            cache,
        }
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// The currently committed forest.
    pub fn forest(&self) -> &Forest<K, R> {
        &self.forest
    }

    pub fn cache(&self) -> &SizeCache {
        &self.cache
    }

    /// Replaces the options, reconciling the cache with them.
    ///
    /// Toggling `caches_size_information` clears or re-seeds the cache; changing the bound/margin
    /// tuple selected by the sizing strategy invalidates every cached measurement in place.
    pub fn set_options(&mut self, options: ListOptions) {
        self.cache
            .set_enabled(options.caches_size_information, &self.forest);
        self.cache.set_invalidation_key(options.invalidation_key());
        self.options = options;
    }

    /// Diffs the committed forest against `new_forest`, applies the changeset to the cache and
    /// the container as one logical transaction, and commits `new_forest`.
    ///
    /// Returns how the container was updated: incrementally, or via the full-reload fallback when
    /// it was not live.
    pub fn update<C: ContainerAdapter<K, R>>(
        &mut self,
        new_forest: Forest<K, R>,
        container: &mut C,
    ) -> ApplyOutcome {
        let changeset = diff(&self.forest, &new_forest);
        let outcome = apply(&changeset, &new_forest, &mut self.cache, container);
        self.forest = new_forest;
        outcome
    }

    /// Replaces the committed forest without diffing: the cache is discarded and rebuilt
    /// all-Unknown to the new shape, and the container performs a non-incremental full refresh.
    pub fn reload<C: ContainerAdapter<K, R>>(
        &mut self,
        new_forest: Forest<K, R>,
        container: &mut C,
    ) {
        self.cache.reset_to_shape(&new_forest);
        container.reload(&new_forest);
        self.forest = new_forest;
    }

    /// The size of the item at `path`, measuring through the cache.
    ///
    /// Returns `None` when `path` lies outside the committed forest. A cache miss measures the
    /// item and records the result; with caching disabled every call measures.
    pub fn item_size(&mut self, path: ItemPath, measurer: &impl Measure<R>) -> Option<Size> {
        self.forest.item(path)?;
        match self.cache.item(path) {
            SizeQueryResult::Cached(size) => Some(size),
            SizeQueryResult::NotCaching => {
                let item = self.forest.item(path)?;
                Some(self.measure(&item.payload, measurer))
            }
            SizeQueryResult::NoCachedResult => {
                let size = {
                    let item = self.forest.item(path)?;
                    self.measure(&item.payload, measurer)
                };
                self.cache.record_item(path, size);
                Some(size)
            }
            SizeQueryResult::NoSuchSlot => None,
        }
    }

    /// The size of a section's named supplement, measuring through the cache.
    ///
    /// Returns `None` when the section does not present that supplement.
    pub fn supplement_size(
        &mut self,
        section: usize,
        name: &str,
        measurer: &impl Measure<R>,
    ) -> Option<Size> {
        self.forest.section(section)?.supplement(name)?;
        match self.cache.supplement(section, name) {
            SizeQueryResult::Cached(size) => Some(size),
            SizeQueryResult::NotCaching => {
                let renderable = self.forest.section(section)?.supplement(name)?;
                Some(self.measure(renderable, measurer))
            }
            SizeQueryResult::NoCachedResult => {
                let size = {
                    let renderable = self.forest.section(section)?.supplement(name)?;
                    self.measure(renderable, measurer)
                };
                self.cache.record_supplement(section, name, size);
                Some(size)
            }
            SizeQueryResult::NoSuchSlot => None,
        }
    }

    fn measure(&self, renderable: &R, measurer: &impl Measure<R>) -> Size {
        measurer.measure(
            renderable,
            self.options.measure_constraint(),
            self.options.layout_margins,
        )
    }
}
