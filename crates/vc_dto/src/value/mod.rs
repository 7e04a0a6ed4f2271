//! The dynamic data model shared by every resolver.
//!
//! ## Menu
//!
//! - [`Value`]: a plain value, a container, a DTO object or an opaque object.
//! - [`ValueKind`]: the kind of a [`Value`], used for type-sensitive comparison and errors.
//! - [`Mapping`]: an insertion-ordered, string-keyed map.
//! - [`ToValue`] / [`FromValue`]: conversions between Rust fields and [`Value`]s.
//!
//! Keys of a [`Mapping`] are strings; integer keys are represented by their
//! canonical decimal form, so `{"0": .., "1": ..}` is a list-shaped mapping.

// -----------------------------------------------------------------------------
// Modules

mod convert;
mod mapping;
mod serde;

// -----------------------------------------------------------------------------
// Exports

pub use convert::{FromValue, ToValue};
pub use mapping::Mapping;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::object::{ObjectRef, Opaque, OpaqueRef};

// -----------------------------------------------------------------------------
// ValueKind

/// The basic kind of a [`Value`].
///
/// `Int` and `Float` are distinct kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
    Object,
    Opaque,
}

impl ValueKind {
    /// A short, lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
            Self::List => "list",
            Self::Map => "map",
            Self::Object => "object",
            Self::Opaque => "opaque",
        }
    }
}

impl fmt::Display for ValueKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// Value

/// A dynamically typed value.
///
/// `PartialEq` is strict and shallow for objects: two `Object`s are equal only
/// when they are the same allocation. Use the equality resolver for value
/// based comparison of DTOs.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(Mapping),
    Object(ObjectRef),
    Opaque(OpaqueRef),
}

impl Value {
    /// Returns the [`ValueKind`].
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Object(_) => ValueKind::Object,
            Self::Opaque(_) => ValueKind::Opaque,
        }
    }

    /// Wraps an opaque value.
    #[inline]
    pub fn opaque<T: Opaque>(value: T) -> Self {
        Self::Opaque(Arc::new(value))
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for a [`Value::List`] or a list-shaped [`Value::Map`].
    pub fn is_list(&self) -> bool {
        match self {
            Self::List(_) => true,
            Self::Map(map) => map.is_list(),
            _ => false,
        }
    }

    /// Returns `true` for a [`Value::Map`] that is not list-shaped.
    #[inline]
    pub fn is_struct_like(&self) -> bool {
        matches!(self, Self::Map(map) if !map.is_list())
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_opaque(&self) -> Option<&OpaqueRef> {
        match self {
            Self::Opaque(v) => Some(v),
            _ => None,
        }
    }

    /// A human readable type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Object(obj) => obj.class().name(),
            Self::Opaque(obj) => obj.type_name(),
            other => other.kind().as_str(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => crate::object::same_object(&**a, &**b),
            (Self::Opaque(a), Self::Opaque(b)) => {
                Arc::ptr_eq(a, b) || a.opaque_eq(&**b).unwrap_or(false)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Self::List(v) => f.debug_tuple("List").field(v).finish(),
            Self::Map(v) => f.debug_tuple("Map").field(v).finish(),
            // Objects may form cycles, only print the class.
            Self::Object(v) => f.debug_tuple("Object").field(&v.class().name()).finish(),
            Self::Opaque(v) => f.debug_tuple("Opaque").field(v).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// From impls

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    #[inline]
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Str(String::from(value))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<Mapping> for Value {
    #[inline]
    fn from(value: Mapping) -> Self {
        Self::Map(value)
    }
}

impl From<ObjectRef> for Value {
    #[inline]
    fn from(value: ObjectRef) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::{Mapping, Value, ValueKind};
    use alloc::vec;

    #[test]
    fn kinds_are_type_sensitive() {
        assert_eq!(Value::from(1).kind(), ValueKind::Int);
        assert_eq!(Value::from(1.0).kind(), ValueKind::Float);
        assert_ne!(Value::from(1), Value::from(1.0));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn list_detection() {
        assert!(Value::List(vec![]).is_list());

        let mut map = Mapping::new();
        map.insert("0", 1);
        map.insert("1", 2);
        assert!(Value::Map(map).is_list());

        let mut map = Mapping::new();
        map.insert("name", "x");
        assert!(Value::Map(map).is_struct_like());

        // An empty mapping is never list-shaped.
        assert!(Value::Map(Mapping::new()).is_struct_like());
    }
}
