#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
pub(crate) type KeyIndexMap<K> = HashMap<K, usize>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyIndexMap<K> = BTreeMap<K, usize>;

#[cfg(feature = "std")]
#[doc(hidden)]
pub trait DiffKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> DiffKey for K {}

#[cfg(not(feature = "std"))]
#[doc(hidden)]
pub trait DiffKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> DiffKey for K {}
