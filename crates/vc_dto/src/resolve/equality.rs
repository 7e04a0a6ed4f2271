use alloc::sync::Arc;
use core::any::Any;

use crate::error::DtoError;
use crate::object::{Dto, Opaque, same_object};
use crate::resolve::{DEFAULT_MAX_DEPTH, check_depth};
use crate::shape::ShapeExtractor;
use crate::value::{Mapping, Value};

/// Compares two objects property by property.
///
/// Objects of different classes are never equal. Values of different kinds
/// are never equal, so `Int(1)` and `Float(1.0)` differ. Lists compare
/// element-wise, mappings compare entry-wise in order, nested objects
/// recurse, and floats are equal if `==` holds or their bits match (so a
/// `NaN` equals itself).
///
/// Opaque values are equal when they are the same allocation, or when
/// [`Opaque::opaque_eq`] says so. Without an `opaque_eq`, two values of the
/// same type are compared through their serializable form, then through
/// their mapping form; otherwise they are not equal.
///
/// Cyclic graphs recurse until the depth limit is reached.
pub struct EqualityResolver {
    extractor: Arc<ShapeExtractor>,
    max_depth: usize,
}

impl EqualityResolver {
    pub fn new(extractor: Arc<ShapeExtractor>) -> Self {
        Self {
            extractor,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    #[inline]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns `true` if `a` and `b` are of the same class and all their
    /// properties are equal.
    ///
    /// # Errors
    ///
    /// - [`DtoError::InvalidShape`] if a visited class has an unsupported shape.
    /// - [`DtoError::RecursionLimit`] if the nesting exceeds the depth limit.
    #[inline]
    pub fn equals(&self, a: &dyn Dto, b: &dyn Dto) -> Result<bool, DtoError> {
        self.objects_equal(a, b, 0)
    }

    fn objects_equal(&self, a: &dyn Dto, b: &dyn Dto, depth: usize) -> Result<bool, DtoError> {
        check_depth(depth, self.max_depth)?;
        if a.class().id() != b.class().id() {
            return Ok(false);
        }
        if same_object(a, b) {
            return Ok(true);
        }

        let shapes = self.extractor.shapes_of(a)?;
        for shape in shapes.iter() {
            let x = shape.value_of(a)?;
            let y = shape.value_of(b)?;
            if !self.values_equal(&x, &y, depth + 1)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn values_equal(&self, x: &Value, y: &Value, depth: usize) -> Result<bool, DtoError> {
        check_depth(depth, self.max_depth)?;
        match (x, y) {
            (Value::Object(a), Value::Object(b)) => self.objects_equal(&**a, &**b, depth),
            (Value::Opaque(a), Value::Opaque(b)) => self.opaques_equal(a, b, depth),
            (Value::List(a), Value::List(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (x, y) in a.iter().zip(b) {
                    if !self.values_equal(x, y, depth + 1)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Value::Map(a), Value::Map(b)) => self.mappings_equal(a, b, depth),
            (Value::Float(a), Value::Float(b)) => Ok(a == b || a.to_bits() == b.to_bits()),
            _ if x.kind() != y.kind() => Ok(false),
            _ => Ok(x == y),
        }
    }

    fn mappings_equal(&self, a: &Mapping, b: &Mapping, depth: usize) -> Result<bool, DtoError> {
        if a.len() != b.len() {
            return Ok(false);
        }
        for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
            if ka != kb || !self.values_equal(va, vb, depth + 1)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn opaques_equal(
        &self,
        a: &Arc<dyn Opaque>,
        b: &Arc<dyn Opaque>,
        depth: usize,
    ) -> Result<bool, DtoError> {
        if Arc::ptr_eq(a, b) {
            return Ok(true);
        }
        let (any_a, any_b): (&dyn Any, &dyn Any) = (&**a, &**b);
        if any_a.type_id() != any_b.type_id() {
            return Ok(false);
        }
        if let Some(eq) = a.opaque_eq(&**b) {
            return Ok(eq);
        }

        if let (Some(x), Some(y)) = (a.as_to_serializable(), b.as_to_serializable()) {
            return self.values_equal(&x.to_serializable(), &y.to_serializable(), depth + 1);
        }
        if let (Some(x), Some(y)) = (a.as_to_mapping(), b.as_to_mapping()) {
            return self.mappings_equal(&x.to_mapping(), &y.to_mapping(), depth);
        }
        Ok(false)
    }
}
