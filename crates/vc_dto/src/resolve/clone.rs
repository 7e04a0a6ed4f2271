use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::error::{DtoError, InvalidArgumentError};
use crate::object::{Dto, ObjectRef};
use crate::shape::ShapeExtractor;
use crate::value::Mapping;

/// Creates modified copies of objects.
///
/// Every constructor argument is taken from, in order of preference: the
/// override of the same name, the current value of the property, the
/// declared default. The copy is shallow; nested objects are shared.
pub struct CloneResolver {
    extractor: Arc<ShapeExtractor>,
}

impl CloneResolver {
    #[inline]
    pub fn new(extractor: Arc<ShapeExtractor>) -> Self {
        Self { extractor }
    }

    /// Creates a copy of `obj` with the given property overrides.
    ///
    /// # Errors
    ///
    /// - [`InvalidArgumentError::ListNotAllowed`] if `overrides` is list-shaped.
    /// - [`InvalidArgumentError::UnmappedOverrides`] listing every override
    ///   that is not a property of the class.
    /// - [`InvalidArgumentError::MissingCloneValue`] if no value is available
    ///   for a parameter.
    /// - [`DtoError::InvalidShape`] if the class has an unsupported shape.
    /// - [`DtoError::Type`] if the constructor rejects an override.
    pub fn clone_with(&self, obj: &dyn Dto, mut overrides: Mapping) -> Result<ObjectRef, DtoError> {
        if overrides.is_list() {
            return Err(InvalidArgumentError::ListNotAllowed {
                operation: "clone_with",
            }
            .into());
        }

        let class = obj.class();
        let shapes = self.extractor.shapes(class)?;

        let mut args = Vec::with_capacity(shapes.len());
        for shape in shapes.iter() {
            let value = overrides
                .remove(shape.name())
                .or_else(|| obj.field(shape.name()))
                .or_else(|| shape.param().default_value())
                .ok_or(InvalidArgumentError::MissingCloneValue {
                    class: class.name(),
                    property: shape.name(),
                })?;
            args.push(value);
        }

        if !overrides.is_empty() {
            return Err(InvalidArgumentError::UnmappedOverrides {
                class: class.name(),
                names: overrides.keys().map(String::from).collect(),
            }
            .into());
        }

        class.instantiate(args)
    }

    /// Creates an unmodified copy of `obj`.
    #[inline]
    pub fn clone(&self, obj: &dyn Dto) -> Result<ObjectRef, DtoError> {
        self.clone_with(obj, Mapping::new())
    }
}
