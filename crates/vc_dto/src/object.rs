//! DTO objects and opaque values.
//!
//! ## Menu
//!
//! - [`Dto`]: an object whose shape is described by a [`ClassInfo`].
//! - [`DtoClass`]: the static side of a [`Dto`], giving access to its [`ClassInfo`].
//! - [`Opaque`]: a non-DTO object carried through [`Value::Opaque`], e.g. a timestamp.
//! - [`OpaqueClass`]: the static side of an [`Opaque`] type.
//! - [`ToMapping`] / [`ToSerializable`]: conversion capabilities used by the default casters.
//! - [`impl_dto!`](crate::impl_dto): implements [`Dto`] from a field list.
//!
//! Objects are shared as [`ObjectRef`] (`Arc<dyn Dto>`); the identity of an
//! object is the address of its allocation, see [`same_object`].

use alloc::sync::Arc;
use core::any::Any;
use core::fmt;
use core::ptr;

use crate::info::{ClassInfo, OpaqueInfo};
use crate::value::{Mapping, Value};

// -----------------------------------------------------------------------------
// Dto

/// A data transfer object.
///
/// Usually implemented with [`impl_dto!`](crate::impl_dto) together with a
/// hand written [`DtoClass`] impl.
pub trait Dto: Any + Send + Sync {
    /// Returns the reflection data of the runtime class.
    fn class(&self) -> &'static ClassInfo;

    /// Reads the current value of the field `name`.
    ///
    /// Returns `None` if no such field can be read.
    fn field(&self, name: &str) -> Option<Value>;

    /// Converts a shared object into a shared [`Any`], used for downcasting.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A shared, type-erased DTO object.
pub type ObjectRef = Arc<dyn Dto>;

/// The static side of a [`Dto`].
///
/// # Examples
///
/// ```
/// use vc_dto::impl_dto;
/// use vc_dto::info::{ClassInfo, ClassInfoCell, ParamInfo};
/// use vc_dto::object::DtoClass;
///
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl DtoClass for Point {
///     fn class_info() -> &'static ClassInfo {
///         static CELL: ClassInfoCell = ClassInfoCell::new();
///         CELL.get_or_init(|| {
///             ClassInfo::builder::<Self>()
///                 .promoted(ParamInfo::new::<i64>("x"))
///                 .promoted(ParamInfo::new::<i64>("y"))
///                 .constructor(|args| Ok(Point { x: args.take()?, y: args.take()? }))
///                 .build()
///         })
///     }
/// }
///
/// impl_dto!(Point { x, y });
///
/// assert_eq!(Point::class_info().name(), "Point");
/// assert_eq!(Point::class_info().params().len(), 2);
/// ```
pub trait DtoClass: Dto + Sized {
    fn class_info() -> &'static ClassInfo;
}

impl dyn Dto {
    /// Returns `true` if the object is a `T`.
    #[inline]
    pub fn is<T: Dto>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<T>()
    }

    /// Returns a reference to the concrete object, if it is a `T`.
    #[inline]
    pub fn downcast_ref<T: Dto>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }
}

// Objects may form cycles, only print the class.
impl fmt::Debug for dyn Dto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dto").field(&self.class().name()).finish()
    }
}

/// Returns `true` if `a` and `b` are the same object.
#[inline]
pub fn same_object(a: &dyn Dto, b: &dyn Dto) -> bool {
    ptr::addr_eq(a, b)
}

/// The identity of an object, valid while the object is alive.
#[inline]
pub(crate) fn object_addr(obj: &dyn Dto) -> usize {
    ptr::from_ref(obj).cast::<()>().addr()
}

// -----------------------------------------------------------------------------
// Opaque

/// A non-DTO object that can be stored in a [`Value`].
///
/// Every capability is optional; the default implementation of each accessor
/// reports that the capability is missing.
pub trait Opaque: Any + Send + Sync + fmt::Debug {
    /// A human readable type name, used in error messages.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Returns the to-mapping capability, if supported.
    fn as_to_mapping(&self) -> Option<&dyn ToMapping> {
        None
    }

    /// Returns the to-serializable capability, if supported.
    fn as_to_serializable(&self) -> Option<&dyn ToSerializable> {
        None
    }

    /// Compares with another opaque value.
    ///
    /// Returns `None` if the type has no equality capability.
    fn opaque_eq(&self, other: &dyn Opaque) -> Option<bool> {
        let _ = other;
        None
    }
}

/// A shared, type-erased opaque value.
pub type OpaqueRef = Arc<dyn Opaque>;

impl dyn Opaque {
    /// Returns `true` if the value is a `T`.
    #[inline]
    pub fn is<T: Opaque>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<T>()
    }

    /// Returns a reference to the concrete value, if it is a `T`.
    #[inline]
    pub fn downcast_ref<T: Opaque>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }
}

/// The static side of an [`Opaque`] type, used as a declared type.
pub trait OpaqueClass: Opaque + Sized {
    fn opaque_info() -> &'static OpaqueInfo;
}

/// Converts a value into a [`Mapping`].
///
/// Applied by [`ToMappingCaster`](crate::cast::ToMappingCaster).
pub trait ToMapping {
    fn to_mapping(&self) -> Mapping;
}

/// Converts a value into a plain, serializable [`Value`].
///
/// Applied by [`SerializableCaster`](crate::cast::SerializableCaster).
pub trait ToSerializable {
    fn to_serializable(&self) -> Value;
}

// -----------------------------------------------------------------------------
// impl_dto

/// Implements [`Dto`] for a type that already implements [`DtoClass`].
///
/// The listed fields are readable through [`Dto::field`]; each field type
/// must implement [`ToValue`](crate::value::ToValue).
///
/// See [`DtoClass`] for an example.
#[macro_export]
macro_rules! impl_dto {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::object::Dto for $ty {
            #[inline]
            fn class(&self) -> &'static $crate::info::ClassInfo {
                <Self as $crate::object::DtoClass>::class_info()
            }

            fn field(&self, name: &str) -> ::core::option::Option<$crate::value::Value> {
                match name {
                    $(
                        ::core::stringify!($field) => ::core::option::Option::Some(
                            $crate::value::ToValue::to_value(&self.$field),
                        ),
                    )*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn into_any(
                self: $crate::__macro_exports::Arc<Self>,
            ) -> $crate::__macro_exports::Arc<dyn ::core::any::Any + Send + Sync> {
                self
            }
        }
    };
}
