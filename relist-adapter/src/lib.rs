//! Adapter utilities for the `relist` crate.
//!
//! The `relist` crate is UI-agnostic and focuses on the core diff/cache/apply algorithms. This
//! crate provides small, framework-neutral helpers commonly needed by adapters:
//!
//! - [`ListController`]: owns the committed forest + size cache and drives diff → apply → commit
//! - Measurement-through-cache helpers (`item_size`/`supplement_size`)
//! - Optional item capabilities ([`Deletable`], [`Focusable`]) via safe accessor traits
//! - [`RecordingContainer`]: an op-logging container with a shadow replay, for tests
//!
//! This crate is intentionally framework-agnostic (no UIKit/GTK/TUI bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod capability;
mod controller;
mod recording;

#[cfg(test)]
mod tests;

pub use capability::{Deletable, Focusable, ItemCapabilities};
pub use controller::ListController;
pub use recording::{ContainerOp, RecordingContainer};
