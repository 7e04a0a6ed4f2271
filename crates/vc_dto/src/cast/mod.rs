//! Pluggable value transformers.
//!
//! ## Menu
//!
//! - [`Caster`]: transforms a value when its predicate matches.
//! - [`CasterSpec`]: a caster instance, or a caster type resolved through a registry.
//! - [`CasterChain`]: an ordered list of casters applied in sequence.
//! - [`CasterRegistry`]: `TypeId` keyed constructors of caster types.
//! - Default global casters, in this order:
//!     - [`ToMappingCaster`]: values with a to-mapping conversion.
//!     - [`SerializableCaster`]: values with a to-serializable conversion.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, caster types declared with
//! [`register_caster!`](crate::register_caster) are collected into
//! [`CasterRegistry::global`] through the [`inventory`] crate.
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod builtin;
mod chain;
mod registry;

// -----------------------------------------------------------------------------
// Exports

pub use builtin::{SerializableCaster, ToMappingCaster};
pub use chain::CasterChain;
pub use registry::{CasterRegistration, CasterRegistry};

use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use crate::error::DtoError;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Caster

/// A value transformer with a support predicate.
pub trait Caster: Send + Sync {
    /// Returns `true` if [`cast`](Caster::cast) applies to `value`.
    fn supports(&self, value: &Value) -> bool;

    /// Transforms `value`.
    fn cast(&self, value: Value) -> Result<Value, DtoError>;
}

// -----------------------------------------------------------------------------
// CasterSpec

/// A caster given by instance or by type.
///
/// Types are resolved through a [`CasterRegistry`] when a [`CasterChain`] is built.
#[derive(Clone)]
pub enum CasterSpec {
    Instance(Arc<dyn Caster>),
    Type { id: TypeId, name: &'static str },
}

impl CasterSpec {
    /// A caster type, resolved later.
    #[inline]
    pub fn of<T: 'static>() -> Self {
        Self::Type {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    /// A caster instance.
    #[inline]
    pub fn instance(caster: impl Caster + 'static) -> Self {
        Self::Instance(Arc::new(caster))
    }
}

impl fmt::Debug for CasterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Instance(..)"),
            Self::Type { name, .. } => f.debug_tuple("Type").field(name).finish(),
        }
    }
}
