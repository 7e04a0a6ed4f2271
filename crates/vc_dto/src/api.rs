//! The public operations, wired to the [`SharedExtractor`].
//!
//! The free functions work on type-erased objects; [`DtoExt`] offers the
//! same operations as methods returning concrete types.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use vc_dto::api::DtoExt;
//! use vc_dto::impl_dto;
//! use vc_dto::info::{ClassInfo, ClassInfoCell, ParamInfo};
//! use vc_dto::object::DtoClass;
//! use vc_dto::value::Mapping;
//!
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! impl DtoClass for Point {
//!     fn class_info() -> &'static ClassInfo {
//!         static CELL: ClassInfoCell = ClassInfoCell::new();
//!         CELL.get_or_init(|| {
//!             ClassInfo::builder::<Self>()
//!                 .promoted(ParamInfo::new::<i64>("x"))
//!                 .promoted(ParamInfo::new::<i64>("y").with_default(0))
//!                 .constructor(|args| Ok(Point { x: args.take()?, y: args.take()? }))
//!                 .build()
//!         })
//!     }
//! }
//!
//! impl_dto!(Point { x, y });
//!
//! let mut data = Mapping::new();
//! data.insert("x", 3);
//! let point: Arc<Point> = Point::from_mapping(data).unwrap();
//! assert_eq!((point.x, point.y), (3, 0));
//!
//! let map = point.to_mapping().unwrap();
//! assert_eq!(map.keys().collect::<Vec<_>>(), ["x", "y"]);
//!
//! let mut overrides = Mapping::new();
//! overrides.insert("y", 4);
//! let moved = point.clone_with(overrides).unwrap();
//! assert_eq!((moved.x, moved.y), (3, 4));
//! assert!(!point.equals(&*moved).unwrap());
//! ```

use alloc::sync::Arc;

use crate::error::DtoError;
use crate::info::ClassInfo;
use crate::object::{Dto, DtoClass, ObjectRef};
use crate::resolve::{
    CloneResolver, DeserializationResolver, EqualityResolver, SerializationResolver,
};
use crate::shape::SharedExtractor;
use crate::value::{FromValue, Mapping, Value};

/// Converts `obj` into a mapping of its properties.
///
/// See [`SerializationResolver`] for the rules and errors.
#[inline]
pub fn to_mapping(obj: &dyn Dto) -> Result<Mapping, DtoError> {
    SerializationResolver::new(SharedExtractor::get()).to_mapping(obj)
}

/// Builds an instance of `class` from `data`.
///
/// See [`DeserializationResolver`] for the rules and errors.
#[inline]
pub fn from_mapping(class: &'static ClassInfo, data: Mapping) -> Result<ObjectRef, DtoError> {
    DeserializationResolver::new(SharedExtractor::get()).build(class, data)
}

/// Returns `true` if `a` and `b` are of the same class with equal properties.
///
/// See [`EqualityResolver`] for the rules and errors.
#[inline]
pub fn equals(a: &dyn Dto, b: &dyn Dto) -> Result<bool, DtoError> {
    EqualityResolver::new(SharedExtractor::get()).equals(a, b)
}

/// Creates a copy of `obj` with the given property overrides.
///
/// See [`CloneResolver`] for the rules and errors.
#[inline]
pub fn clone_with(obj: &dyn Dto, overrides: Mapping) -> Result<ObjectRef, DtoError> {
    CloneResolver::new(SharedExtractor::get()).clone_with(obj, overrides)
}

/// Creates an unmodified copy of `obj`.
#[inline]
pub fn clone(obj: &dyn Dto) -> Result<ObjectRef, DtoError> {
    CloneResolver::new(SharedExtractor::get()).clone(obj)
}

/// The public operations as methods of a concrete DTO type.
///
/// Implemented for every [`DtoClass`].
pub trait DtoExt: DtoClass {
    /// See [`to_mapping`].
    fn to_mapping(&self) -> Result<Mapping, DtoError> {
        to_mapping(self)
    }

    /// See [`from_mapping`].
    fn from_mapping(data: Mapping) -> Result<Arc<Self>, DtoError> {
        downcast(from_mapping(Self::class_info(), data)?)
    }

    /// See [`equals`].
    fn equals(&self, other: &dyn Dto) -> Result<bool, DtoError> {
        equals(self, other)
    }

    /// See [`clone_with`].
    fn clone_with(&self, overrides: Mapping) -> Result<Arc<Self>, DtoError> {
        downcast(clone_with(self, overrides)?)
    }

    /// See [`clone`].
    fn clone_dto(&self) -> Result<Arc<Self>, DtoError> {
        downcast(clone(self)?)
    }
}

impl<T: DtoClass> DtoExt for T {}

// A constructor registered through `ClassBuilder` always yields `T`; a
// custom mapping hook may not.
#[inline]
fn downcast<T: DtoClass>(obj: ObjectRef) -> Result<Arc<T>, DtoError> {
    Ok(Arc::<T>::from_value(Value::Object(obj))?)
}
