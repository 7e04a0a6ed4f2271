//! Property shapes and their extraction.
//!
//! ## Menu
//!
//! - [`PropertyShape`]: one property, a constructor parameter linked to its public field.
//! - [`ShapeExtractor`]: derives and caches the ordered shape list of a class.
//! - [`SharedExtractor`]: the process-wide extractor used by [`api`](crate::api).
//!
//! ## Supported class shapes
//!
//! 1. Promoted style: every constructor parameter is promoted.
//! 2. Legacy style: plain parameters, each matched by a public field of the same name.
//!
//! Both may be mixed, as long as every plain parameter finds its public field.

// -----------------------------------------------------------------------------
// Modules

mod extractor;
mod shared;

// -----------------------------------------------------------------------------
// Exports

pub use extractor::ShapeExtractor;
pub use shared::SharedExtractor;

use crate::error::TypeError;
use crate::info::{DeclaredType, DefaultValue, FieldInfo, ParamInfo};
use crate::object::Dto;
use crate::tags::Tags;
use crate::value::Value;

// -----------------------------------------------------------------------------
// PropertyShape

/// The descriptor of one DTO property.
///
/// The declared type, nullability and default come from the constructor
/// parameter; the tags come from the backing field.
#[derive(Clone, Debug)]
pub struct PropertyShape {
    class: &'static str,
    param: ParamInfo,
    field: FieldInfo,
}

impl PropertyShape {
    #[inline]
    pub(crate) fn new(class: &'static str, param: &ParamInfo, field: &FieldInfo) -> Self {
        Self {
            class,
            param: param.clone(),
            field: field.clone(),
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.param.name()
    }

    #[inline]
    pub fn declared_type(&self) -> &DeclaredType {
        self.param.declared_type()
    }

    /// Returns `true` for an untyped or explicitly nullable property.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.param.declared_type().is_nullable()
    }

    #[inline]
    pub const fn has_default(&self) -> bool {
        self.param.has_default()
    }

    #[inline]
    pub fn default(&self) -> Option<&DefaultValue> {
        self.param.default()
    }

    /// Produces the default value, [`Value::Null`] if none is declared.
    #[inline]
    pub fn default_value(&self) -> Value {
        self.param.default_value().unwrap_or_default()
    }

    /// Returns `true` if the property may be missing from input data.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.param.is_optional()
    }

    #[inline]
    pub const fn is_promoted(&self) -> bool {
        self.param.is_promoted()
    }

    /// The tags of the backing field, in declaration order.
    #[inline]
    pub fn tags(&self) -> &Tags {
        self.field.tags()
    }

    #[inline]
    pub fn param(&self) -> &ParamInfo {
        &self.param
    }

    #[inline]
    pub fn field(&self) -> &FieldInfo {
        &self.field
    }

    /// Reads the current value from `obj`.
    pub fn value_of(&self, obj: &dyn Dto) -> Result<Value, TypeError> {
        obj.field(self.name()).ok_or(TypeError::UnreadableField {
            class: self.class,
            field: self.name(),
        })
    }
}
