use crate::size_cache::InvalidationKey;

/// A 2D bounding size, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundSize {
    pub width: u32,
    pub height: u32,
}

impl BoundSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Layout margins applied around measured content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl Margins {
    pub const fn new(top: u32, left: u32, bottom: u32, right: u32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn horizontal(&self) -> u32 {
        self.left.saturating_add(self.right)
    }

    pub fn vertical(&self) -> u32 {
        self.top.saturating_add(self.bottom)
    }
}

/// Selects which axis is treated as the fixed constraint when measuring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizingStrategy {
    /// Width is fixed to the bound; height fits the content (vertical lists).
    #[default]
    FillHorizontally,
    /// Height is fixed to the bound; width fits the content (horizontal lists).
    FillVertically,
    /// Neither axis is constrained; content takes its smallest fitting size.
    Compressed,
}

/// The constraint handed to the [`crate::Measure`] collaborator.
///
/// `None` on an axis means "fit the content".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

/// Configuration for a reconciling list.
///
/// All fields are plain values; cloning is cheap.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListOptions {
    /// Enables the size cache. When `false` (the default), every size query returns
    /// [`crate::SizeQueryResult::NotCaching`] and no cache bookkeeping occurs.
    pub caches_size_information: bool,

    /// The bounding size measurements are taken under.
    ///
    /// Changing the axis selected by `sizing_strategy` invalidates every cached size, since all
    /// measurements were taken under the old bound.
    pub bound_size: BoundSize,

    pub layout_margins: Margins,

    pub sizing_strategy: SizingStrategy,
}

impl ListOptions {
    pub fn new() -> Self {
        Self {
            caches_size_information: false,
            bound_size: BoundSize::default(),
            layout_margins: Margins::default(),
            sizing_strategy: SizingStrategy::default(),
        }
    }

    pub fn with_caches_size_information(mut self, caches: bool) -> Self {
        self.caches_size_information = caches;
        self
    }

    pub fn with_bound_size(mut self, bound_size: BoundSize) -> Self {
        self.bound_size = bound_size;
        self
    }

    pub fn with_layout_margins(mut self, layout_margins: Margins) -> Self {
        self.layout_margins = layout_margins;
        self
    }

    pub fn with_sizing_strategy(mut self, sizing_strategy: SizingStrategy) -> Self {
        self.sizing_strategy = sizing_strategy;
        self
    }

    /// The tuple under which cached measurements remain valid.
    ///
    /// Only the fixed axis participates: for `Compressed` sizing the bound does not influence
    /// measurement at all, so bound changes do not invalidate.
    pub fn invalidation_key(&self) -> InvalidationKey {
        let constraint = match self.sizing_strategy {
            SizingStrategy::FillHorizontally => Some(self.bound_size.width),
            SizingStrategy::FillVertically => Some(self.bound_size.height),
            SizingStrategy::Compressed => None,
        };
        InvalidationKey {
            constraint,
            margins: self.layout_margins,
        }
    }

    /// The constraint the [`crate::Measure`] collaborator should measure under.
    pub fn measure_constraint(&self) -> Constraint {
        match self.sizing_strategy {
            SizingStrategy::FillHorizontally => Constraint {
                max_width: Some(
                    self.bound_size
                        .width
                        .saturating_sub(self.layout_margins.horizontal()),
                ),
                max_height: None,
            },
            SizingStrategy::FillVertically => Constraint {
                max_width: None,
                max_height: Some(
                    self.bound_size
                        .height
                        .saturating_sub(self.layout_margins.vertical()),
                ),
            },
            SizingStrategy::Compressed => Constraint::default(),
        }
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        Self::new()
    }
}
