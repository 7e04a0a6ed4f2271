//! The resolvers behind the public operations.
//!
//! ## Menu
//!
//! - [`CycleGuard`]: in-progress object identities of one serialization call.
//! - [`SerializationResolver`]: object to [`Mapping`](crate::value::Mapping).
//! - [`DeserializationResolver`]: [`Mapping`](crate::value::Mapping) to object.
//! - [`EqualityResolver`]: type-sensitive, value-based equality of two objects.
//! - [`CloneResolver`]: copy with overrides.
//!
//! Every resolver takes its [`ShapeExtractor`](crate::shape::ShapeExtractor)
//! explicitly and bounds its recursion by a depth limit,
//! [`DEFAULT_MAX_DEPTH`] unless configured.

// -----------------------------------------------------------------------------
// Modules

mod clone;
mod deserialize;
mod equality;
mod guard;
mod serialize;

// -----------------------------------------------------------------------------
// Exports

pub use clone::CloneResolver;
pub use deserialize::DeserializationResolver;
pub use equality::EqualityResolver;
pub use guard::{CycleGuard, Entered};
pub use serialize::SerializationResolver;

/// The default limit of nested objects and containers.
pub const DEFAULT_MAX_DEPTH: usize = 256;

use crate::error::DtoError;

#[inline]
fn check_depth(depth: usize, limit: usize) -> Result<(), DtoError> {
    if depth > limit {
        Err(DtoError::RecursionLimit { limit })
    } else {
        Ok(())
    }
}
