use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use thiserror::Error;

use crate::value::ValueKind;

// -----------------------------------------------------------------------------
// DtoError

/// Every failure the toolkit can report.
///
/// Nothing is caught internally: each variant reaches the caller of the
/// public entry point unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DtoError {
    #[error(transparent)]
    InvalidShape(#[from] InvalidShapeError),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),

    #[error(transparent)]
    CircularReference(#[from] CircularReferenceError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("recursion limit of {limit} nested values exceeded")]
    RecursionLimit { limit: usize },
}

impl DtoError {
    /// Returns `true` for [`DtoError::InvalidShape`].
    #[inline]
    pub fn is_invalid_shape(&self) -> bool {
        matches!(self, Self::InvalidShape(_))
    }

    /// Returns `true` for [`DtoError::InvalidArgument`].
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns `true` for [`DtoError::CircularReference`].
    #[inline]
    pub fn is_circular_reference(&self) -> bool {
        matches!(self, Self::CircularReference(_))
    }

    /// Returns `true` for [`DtoError::Type`].
    #[inline]
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::Type(_))
    }
}

// -----------------------------------------------------------------------------
// InvalidShapeError

/// A class whose constructor and fields match neither supported shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidShapeError {
    #[error("DTO `{class}` must define a constructor")]
    MissingConstructor { class: &'static str },

    #[error("DTO `{class}` has promoted constructor parameter `{param}`, but it is not declared as public")]
    NonPublicPromoted {
        class: &'static str,
        param: &'static str,
    },

    #[error("DTO `{class}` uses unsupported mixed or private properties: missing public field for `{param}`")]
    MissingPublicField {
        class: &'static str,
        param: &'static str,
    },
}

impl InvalidShapeError {
    /// The offending class.
    pub fn class(&self) -> &'static str {
        match self {
            Self::MissingConstructor { class }
            | Self::NonPublicPromoted { class, .. }
            | Self::MissingPublicField { class, .. } => class,
        }
    }

    /// The offending constructor parameter, if one is involved.
    pub fn param(&self) -> Option<&'static str> {
        match self {
            Self::MissingConstructor { .. } => None,
            Self::NonPublicPromoted { param, .. } | Self::MissingPublicField { param, .. } => {
                Some(param)
            }
        }
    }
}

// -----------------------------------------------------------------------------
// InvalidArgumentError

/// Bad call-site input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidArgumentError {
    #[error("caster type `{name}` at index {index} is not registered")]
    UnknownCaster { index: usize, name: &'static str },

    #[error("type `{name}` at index {index} must implement `Caster`")]
    NotACaster { index: usize, name: &'static str },

    #[error("`{operation}` supports only named entries, got a list")]
    ListNotAllowed { operation: &'static str },

    #[error("missing required property `{property}` for DTO `{class}`")]
    MissingProperty {
        class: &'static str,
        property: &'static str,
    },

    #[error("unknown properties `{}` for DTO `{class}`", .names.join(", "))]
    UnknownProperties {
        class: &'static str,
        names: Vec<String>,
    },

    #[error("property `{property}` of DTO `{class}` is not nullable")]
    NotNullable {
        class: &'static str,
        property: &'static str,
    },

    #[error("the parameters `{}` are not present in DTO `{class}` and cannot be used for cloning", .names.join("`, `"))]
    UnmappedOverrides {
        class: &'static str,
        names: Vec<String>,
    },

    #[error("the value for parameter `{property}` of DTO `{class}` is not conveyed")]
    MissingCloneValue {
        class: &'static str,
        property: &'static str,
    },

    #[error("expected {expected}, got `{found}`")]
    UnexpectedValue {
        expected: &'static str,
        found: Cow<'static, str>,
    },
}

// -----------------------------------------------------------------------------
// CircularReferenceError

/// An object was reached again while it was still being serialized.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("circular reference detected for `{type_name}`")]
pub struct CircularReferenceError {
    pub type_name: &'static str,
}

// -----------------------------------------------------------------------------
// TypeError

/// Low-level construction failures, e.g. building an `i64` from a string.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum TypeError {
    #[error("expected `{expected}`, found `{found}`")]
    Mismatch {
        expected: Cow<'static, str>,
        found: ValueKind,
    },

    #[error("value {value} is out of range for `{expected}`")]
    OutOfRange { expected: &'static str, value: i64 },

    #[error("argument `{param}` of `{class}`: {source}")]
    Argument {
        class: &'static str,
        param: &'static str,
        source: Box<TypeError>,
    },

    #[error("`{class}` expects {min}..={max} constructor arguments, {given} given")]
    ArgumentCount {
        class: &'static str,
        min: usize,
        max: usize,
        given: usize,
    },

    #[error("field `{field}` of `{class}` cannot be read")]
    UnreadableField {
        class: &'static str,
        field: &'static str,
    },

    #[error("cannot construct `{expected}` from {reason}")]
    Conversion {
        expected: &'static str,
        reason: String,
    },
}

impl TypeError {
    /// Shorthand for [`TypeError::Mismatch`].
    #[inline]
    pub fn mismatch(expected: impl Into<Cow<'static, str>>, found: ValueKind) -> Self {
        Self::Mismatch {
            expected: expected.into(),
            found,
        }
    }
}
