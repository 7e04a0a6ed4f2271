//! Reflection data of DTO classes.
//!
//! ## Menu
//!
//! - [`ClassInfo`]: constructor parameters, declared fields, constructor and hooks of a class.
//! - [`ClassBuilder`]: builds a [`ClassInfo`].
//! - [`ParamInfo`]: a constructor parameter, with an optional [`DefaultValue`].
//! - [`FieldInfo`]: a declared field with its [`Visibility`].
//! - [`DeclaredType`] / [`TypeKind`]: declared types, derived from Rust types via [`Declared`].
//! - [`OpaqueInfo`]: information for non-DTO types such as timestamps.
//! - [`ClassInfoCell`] / [`OpaqueInfoCell`]: static storage for the above.
//! - [`Args`]: positional arguments handed to a constructor.
//!
//! A class is registered explicitly, once, by its [`DtoClass`] impl:
//! nothing here inspects Rust structs at runtime.
//!
//! [`DtoClass`]: crate::object::DtoClass

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod class;
mod declared;
mod field;
mod opaque;
mod param;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{ClassInfoCell, InfoCell, OpaqueInfoCell};
pub use class::{Args, ClassBuilder, ClassInfo, Constructor, FromMapping, MappingConstructor};
pub use declared::{Declared, DeclaredType, TypeKind};
pub use field::{FieldInfo, Visibility};
pub use opaque::{OpaqueConstructor, OpaqueInfo};
pub use param::{DefaultValue, ParamInfo};

// -----------------------------------------------------------------------------
// Utils

/// A type path without its module prefix, generic arguments are kept as is.
pub(crate) fn short_name(path: &'static str) -> &'static str {
    let base = path.find('<').unwrap_or(path.len());
    match path[..base].rfind("::") {
        Some(index) => &path[index + 2..],
        None => path,
    }
}
