use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{Mutex, PoisonError, RwLock};

use crate::error::TypeError;
use crate::object::{DtoClass, ObjectRef, OpaqueRef};
use crate::value::{Mapping, Value, ValueKind};

// -----------------------------------------------------------------------------
// Traits

/// Reads a Rust field as a [`Value`].
///
/// DTO fields are read through this trait by [`impl_dto!`](crate::impl_dto).
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Builds a Rust value from a [`Value`], used by constructors.
///
/// Conversions are strict: the only widening performed is `Int` to a float type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, TypeError>;
}

// -----------------------------------------------------------------------------
// Value

impl ToValue for Value {
    #[inline]
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    #[inline]
    fn from_value(value: Value) -> Result<Self, TypeError> {
        Ok(value)
    }
}

// -----------------------------------------------------------------------------
// Scalars

impl ToValue for bool {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(TypeError::mismatch("bool", other.kind())),
        }
    }
}

macro_rules! impl_int {
    ($($ty:ty),*) => {
        $(
            impl ToValue for $ty {
                #[inline]
                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, TypeError> {
                    match value {
                        Value::Int(v) => <$ty>::try_from(v).map_err(|_| TypeError::OutOfRange {
                            expected: stringify!($ty),
                            value: v,
                        }),
                        other => Err(TypeError::mismatch(stringify!($ty), other.kind())),
                    }
                }
            }
        )*
    };
}

impl_int!(i8, i16, i32, i64, u8, u16, u32);

impl ToValue for f64 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            other => Err(TypeError::mismatch("f64", other.kind())),
        }
    }
}

impl ToValue for f32 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl ToValue for String {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl ToValue for &'static str {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Str(String::from(*self))
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Str(v) => Ok(v),
            other => Err(TypeError::mismatch("String", other.kind())),
        }
    }
}

// -----------------------------------------------------------------------------
// Containers

impl<T: ToValue> ToValue for Option<T> {
    #[inline]
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    #[inline]
    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            Value::Map(map) if map.is_list() => {
                map.into_iter().map(|(_, v)| T::from_value(v)).collect()
            }
            other => Err(TypeError::mismatch("Vec", other.kind())),
        }
    }
}

impl<T: ToValue> ToValue for Mutex<T> {
    fn to_value(&self) -> Value {
        self.lock().unwrap_or_else(PoisonError::into_inner).to_value()
    }
}

impl<T: ToValue> ToValue for RwLock<T> {
    fn to_value(&self) -> Value {
        self.read().unwrap_or_else(PoisonError::into_inner).to_value()
    }
}

impl ToValue for Mapping {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Map(self.clone())
    }
}

impl FromValue for Mapping {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Map(map) => Ok(map),
            Value::List(items) => Ok(Mapping::from_list(items)),
            other => Err(TypeError::mismatch("Mapping", other.kind())),
        }
    }
}

// -----------------------------------------------------------------------------
// Objects

impl ToValue for ObjectRef {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Object(Arc::clone(self))
    }
}

impl FromValue for ObjectRef {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Object(obj) => Ok(obj),
            other => Err(TypeError::mismatch("object", other.kind())),
        }
    }
}

impl<T: DtoClass> ToValue for Arc<T> {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Object(Arc::clone(self) as ObjectRef)
    }
}

impl<T: DtoClass> FromValue for Arc<T> {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        let expected = || Cow::Borrowed(T::class_info().name());
        match value {
            Value::Object(obj) => obj
                .into_any()
                .downcast::<T>()
                .map_err(|_| TypeError::mismatch(expected(), ValueKind::Object)),
            other => Err(TypeError::mismatch(expected(), other.kind())),
        }
    }
}

impl ToValue for OpaqueRef {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Opaque(Arc::clone(self))
    }
}

impl FromValue for OpaqueRef {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Opaque(obj) => Ok(obj),
            other => Err(TypeError::mismatch("opaque", other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FromValue, ToValue};
    use crate::error::TypeError;
    use crate::value::{Mapping, Value, ValueKind};
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn strict_scalars() {
        assert_eq!(i32::from_value(Value::Int(7)), Ok(7));
        assert_eq!(f64::from_value(Value::Int(2)), Ok(2.0));
        assert_eq!(
            u8::from_value(Value::Int(300)),
            Err(TypeError::OutOfRange {
                expected: "u8",
                value: 300
            })
        );
        assert_eq!(
            String::from_value(Value::Int(1)),
            Err(TypeError::mismatch("String", ValueKind::Int))
        );
    }

    #[test]
    fn containers() {
        let list = vec![1_i64, 2, 3].to_value();
        assert_eq!(list, Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));

        let from_map = Vec::<i64>::from_value(Value::Map(Mapping::from_list(vec![
            Value::Int(4),
            Value::Int(5),
        ])));
        assert_eq!(from_map, Ok(vec![4, 5]));

        assert_eq!(Option::<i64>::from_value(Value::Null), Ok(None));
        assert_eq!(Some(3_i64).to_value(), Value::Int(3));
    }
}
