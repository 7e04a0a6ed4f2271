//! Small shared utilities for the `vc_data` crates.
//!
//! - [`hash`]: fixed-seed and no-op hash states, plus `HashMap`/`HashSet` aliases.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId).
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
