use alloc::sync::Arc;

use crate::cast::Caster;
use crate::error::{DtoError, InvalidArgumentError};
use crate::tags::Tag;
use crate::value::Value;

// -----------------------------------------------------------------------------
// ToMappingCaster

/// Converts opaque values with a [`ToMapping`](crate::object::ToMapping)
/// capability into a mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToMappingCaster;

impl Caster for ToMappingCaster {
    fn supports(&self, value: &Value) -> bool {
        matches!(value, Value::Opaque(obj) if obj.as_to_mapping().is_some())
    }

    fn cast(&self, value: Value) -> Result<Value, DtoError> {
        match &value {
            Value::Opaque(obj) => match obj.as_to_mapping() {
                Some(conv) => Ok(Value::Map(conv.to_mapping())),
                None => Err(unexpected("a value with a to-mapping conversion", &value)),
            },
            _ => Err(unexpected("a value with a to-mapping conversion", &value)),
        }
    }
}

impl Tag for ToMappingCaster {
    #[inline]
    fn into_caster(self: Arc<Self>) -> Option<Arc<dyn Caster>> {
        Some(self)
    }
}

// -----------------------------------------------------------------------------
// SerializableCaster

/// Converts opaque values with a
/// [`ToSerializable`](crate::object::ToSerializable) capability into a plain value.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializableCaster;

impl Caster for SerializableCaster {
    fn supports(&self, value: &Value) -> bool {
        matches!(value, Value::Opaque(obj) if obj.as_to_serializable().is_some())
    }

    fn cast(&self, value: Value) -> Result<Value, DtoError> {
        match &value {
            Value::Opaque(obj) => match obj.as_to_serializable() {
                Some(conv) => Ok(conv.to_serializable()),
                None => Err(unexpected("a serializable value", &value)),
            },
            _ => Err(unexpected("a serializable value", &value)),
        }
    }
}

impl Tag for SerializableCaster {
    #[inline]
    fn into_caster(self: Arc<Self>) -> Option<Arc<dyn Caster>> {
        Some(self)
    }
}

#[inline]
fn unexpected(expected: &'static str, value: &Value) -> DtoError {
    InvalidArgumentError::UnexpectedValue {
        expected,
        found: value.type_name().into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::{SerializableCaster, ToMappingCaster};
    use crate::cast::Caster;
    use crate::fixtures::Money;
    use crate::value::{Mapping, Value};

    #[test]
    fn opaque_capabilities() {
        let money = Value::opaque(Money::new(250, "EUR"));

        assert!(ToMappingCaster.supports(&money));
        let mapped = ToMappingCaster.cast(money.clone()).unwrap();
        let expected = Mapping::from([
            ("amount", Value::Int(250)),
            ("currency", Value::from("EUR")),
        ]);
        assert_eq!(mapped, Value::Map(expected));

        assert!(SerializableCaster.supports(&money));
        assert_eq!(SerializableCaster.cast(money).unwrap(), Value::from("2.50 EUR"));
    }

    #[test]
    fn scalars_are_rejected() {
        assert!(!ToMappingCaster.supports(&Value::Int(1)));
        assert!(!SerializableCaster.supports(&Value::Null));
        assert!(ToMappingCaster.cast(Value::Int(1)).unwrap_err().is_invalid_argument());
    }
}
