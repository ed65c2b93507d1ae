//! A declarative diff-and-reconcile engine for sectioned lists.
//!
//! For adapter-level utilities (controllers, measurement helpers, test containers), see the
//! `relist-adapter` crate.
//!
//! Client code supplies an immutable [`Forest`] of keyed sections (each with keyed items and
//! optional named supplements such as headers/footers). The engine computes the minimal set of
//! insert/remove/move/update operations transforming the previously committed forest into the new
//! one, applies them to an external container through narrow batch-update primitives, and keeps a
//! position-indexed cache of measured sizes invalidated in lock-step with the structural changes.
//!
//! It is UI-agnostic. A UI layer is expected to provide:
//! - a [`ContainerAdapter`] exposing native insert/remove/move primitives
//! - a [`Measure`] collaborator that measures a renderable under constraints
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod apply;
mod changeset;
mod diff;
mod forest;
mod key;
mod measure;
mod options;
mod size_cache;


pub use apply::{ApplyOutcome, ContainerAdapter, apply};
pub use changeset::{Changeset, ForestChangeset, Move, SectionItemChanges};
pub use diff::{diff, diff_keyed};
pub use forest::{FOOTER, Forest, HEADER, Item, ItemPath, Section, SupplementName};
pub use measure::Measure;
pub use options::{BoundSize, Constraint, ListOptions, Margins, SizingStrategy};
pub use size_cache::{InvalidationKey, Size, SizeCache, SizeQueryResult};

#[doc(hidden)]
pub use key::DiffKey;
