#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod api;
pub mod cast;
pub mod error;
pub mod info;
pub mod object;
pub mod resolve;
pub mod shape;
pub mod tags;
pub mod value;

#[cfg(feature = "time")]
pub mod time;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use api::DtoExt;
pub use error::DtoError;
pub use object::{Dto, DtoClass, ObjectRef};
pub use value::{Mapping, Value};

#[doc(hidden)]
pub mod __macro_exports {
    pub use alloc::sync::Arc;

    #[cfg(feature = "auto_register")]
    pub use inventory;
}
