//! `chrono` timestamps as opaque values.
//!
//! [`DateTime<FixedOffset>`] and [`DateTime<Utc>`] can be used as declared
//! field types. They serialize to RFC 3339 strings through
//! [`SerializableCaster`](crate::cast::SerializableCaster), and are built
//! from RFC 3339 strings or unix timestamps when deserialized.
//!
//! [`AsStringTime`] formats them with a custom `strftime` pattern instead.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt::Write;

use chrono::{DateTime, FixedOffset, Utc};

use crate::cast::Caster;
use crate::error::{DtoError, InvalidArgumentError, TypeError};
use crate::info::{Declared, DeclaredType, OpaqueInfo, OpaqueInfoCell, TypeKind};
use crate::object::{Opaque, OpaqueClass, OpaqueRef, ToSerializable};
use crate::tags::Tag;
use crate::value::{FromValue, ToValue, Value, ValueKind};

// -----------------------------------------------------------------------------
// Opaque impls

macro_rules! impl_time {
    ($ty:ty, $name:literal, $from_rfc3339:expr, $from_timestamp:expr) => {
        impl Opaque for $ty {
            #[inline]
            fn type_name(&self) -> &'static str {
                $name
            }

            #[inline]
            fn as_to_serializable(&self) -> Option<&dyn ToSerializable> {
                Some(self)
            }

            fn opaque_eq(&self, other: &dyn Opaque) -> Option<bool> {
                let other = other.downcast_ref::<Self>()?;
                Some(self == other && self.offset() == other.offset())
            }
        }

        impl ToSerializable for $ty {
            #[inline]
            fn to_serializable(&self) -> Value {
                Value::Str(self.to_rfc3339())
            }
        }

        impl OpaqueClass for $ty {
            fn opaque_info() -> &'static OpaqueInfo {
                static CELL: OpaqueInfoCell = OpaqueInfoCell::new();
                CELL.get_or_init(|| {
                    OpaqueInfo::new::<Self>().with_constructor(|value| {
                        Ok(Arc::new(<$ty>::from_value(value)?) as OpaqueRef)
                    })
                })
            }
        }

        impl Declared for $ty {
            #[inline]
            fn declared_type() -> DeclaredType {
                DeclaredType::new(TypeKind::Opaque(<Self as OpaqueClass>::opaque_info))
            }
        }

        impl ToValue for $ty {
            #[inline]
            fn to_value(&self) -> Value {
                Value::opaque(*self)
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, TypeError> {
                match value {
                    Value::Opaque(obj) => obj
                        .downcast_ref::<Self>()
                        .copied()
                        .ok_or(TypeError::mismatch($name, ValueKind::Opaque)),
                    Value::Str(text) => {
                        let from_rfc3339: fn(&str) -> Option<Self> = $from_rfc3339;
                        from_rfc3339(&text).ok_or_else(|| TypeError::Conversion {
                            expected: $name,
                            reason: format!("`{text}`, not an RFC 3339 date-time"),
                        })
                    }
                    Value::Int(secs) => {
                        let from_timestamp: fn(i64) -> Option<Self> = $from_timestamp;
                        from_timestamp(secs).ok_or(TypeError::OutOfRange {
                            expected: $name,
                            value: secs,
                        })
                    }
                    other => Err(TypeError::mismatch($name, other.kind())),
                }
            }
        }
    };
}

impl_time!(
    DateTime<FixedOffset>,
    "DateTime<FixedOffset>",
    |text| DateTime::parse_from_rfc3339(text).ok(),
    |secs| DateTime::from_timestamp(secs, 0).map(|dt| dt.fixed_offset())
);

impl_time!(
    DateTime<Utc>,
    "DateTime<Utc>",
    |text| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.to_utc()),
    |secs| DateTime::from_timestamp(secs, 0)
);

// -----------------------------------------------------------------------------
// AsStringTime

/// Formats a timestamp property as a string.
///
/// The format uses `chrono`'s `strftime` syntax, [`AsStringTime::ATOM`] by default.
/// Any other value fails with [`InvalidArgumentError::UnexpectedValue`].
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use vc_dto::cast::Caster;
/// use vc_dto::tags::AsStringTime;
/// use vc_dto::value::Value;
///
/// let time = DateTime::parse_from_rfc3339("2024-05-01T14:30:00+02:00").unwrap();
/// let value = Value::opaque(time);
///
/// let cast = AsStringTime::new("%H:%M:%S").cast(value.clone()).unwrap();
/// assert_eq!(cast, Value::from("14:30:00"));
///
/// let cast = AsStringTime::default().cast(value).unwrap();
/// assert_eq!(cast, Value::from("2024-05-01T14:30:00+02:00"));
/// ```
#[derive(Debug, Clone)]
pub struct AsStringTime {
    format: Cow<'static, str>,
}

impl AsStringTime {
    /// `Y-m-d\TH:i:sP`, e.g. `2024-05-01T14:30:00+02:00`.
    pub const ATOM: &'static str = "%Y-%m-%dT%H:%M:%S%:z";

    #[inline]
    pub const fn new(format: &'static str) -> Self {
        Self {
            format: Cow::Borrowed(format),
        }
    }

    #[inline]
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: Cow::Owned(format.into()),
        }
    }

    #[inline]
    pub fn format(&self) -> &str {
        &self.format
    }

    fn write(&self, out: &mut String, obj: &dyn Opaque) -> Option<core::fmt::Result> {
        if let Some(dt) = obj.downcast_ref::<DateTime<FixedOffset>>() {
            Some(write!(out, "{}", dt.format(&self.format)))
        } else {
            obj.downcast_ref::<DateTime<Utc>>()
                .map(|dt| write!(out, "{}", dt.format(&self.format)))
        }
    }
}

impl Default for AsStringTime {
    #[inline]
    fn default() -> Self {
        Self::new(Self::ATOM)
    }
}

impl Caster for AsStringTime {
    #[inline]
    fn supports(&self, _: &Value) -> bool {
        true
    }

    fn cast(&self, value: Value) -> Result<Value, DtoError> {
        let mut out = String::new();
        let written = match &value {
            Value::Opaque(obj) => self.write(&mut out, &**obj),
            _ => None,
        };
        match written {
            Some(Ok(())) => Ok(Value::Str(out)),
            Some(Err(_)) => Err(TypeError::Conversion {
                expected: "formatted date-time",
                reason: format!("the invalid format `{}`", self.format),
            }
            .into()),
            None => Err(InvalidArgumentError::UnexpectedValue {
                expected: "a date-time value",
                found: Cow::Borrowed(value.type_name()),
            }
            .into()),
        }
    }
}

impl Tag for AsStringTime {
    #[inline]
    fn into_caster(self: Arc<Self>) -> Option<Arc<dyn Caster>> {
        Some(self)
    }
}
