use core::fmt;

use crate::info::{Declared, DeclaredType};
use crate::tags::{Tag, Tags};
use crate::value::Value;

// -----------------------------------------------------------------------------
// DefaultValue

/// The default value of a constructor parameter.
#[derive(Clone)]
pub enum DefaultValue {
    /// A stored value, cloned on each use.
    Value(Value),
    /// A value produced on each use, e.g. a fresh object.
    Lazy(fn() -> Value),
}

impl DefaultValue {
    /// Produces the default value.
    #[inline]
    pub fn get(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Lazy(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => fmt::Debug::fmt(value, f),
            Self::Lazy(_) => f.write_str("<lazy>"),
        }
    }
}

// -----------------------------------------------------------------------------
// ParamInfo

/// Information for a constructor parameter.
///
/// # Examples
///
/// ```
/// use vc_dto::info::ParamInfo;
/// use vc_dto::tags::SkipIfNull;
/// use vc_dto::value::Value;
///
/// let param = ParamInfo::new::<Option<String>>("role")
///     .with_default(Value::Null)
///     .with_tag(SkipIfNull);
///
/// assert_eq!(param.name(), "role");
/// assert!(param.has_default());
/// assert!(param.is_optional());
/// assert!(param.tags().get::<SkipIfNull>().is_some());
/// ```
#[derive(Clone, Debug)]
pub struct ParamInfo {
    name: &'static str,
    ty: DeclaredType,
    promoted: bool,
    default: Option<DefaultValue>,
    tags: Tags,
}

impl ParamInfo {
    /// Creates a parameter named `name` with the declared type of `T`.
    #[inline]
    pub fn new<T: Declared>(name: &'static str) -> Self {
        Self::with_type(name, T::declared_type())
    }

    /// Creates a parameter with an explicit [`DeclaredType`].
    #[inline]
    pub fn with_type(name: &'static str, ty: DeclaredType) -> Self {
        Self {
            name,
            ty,
            promoted: false,
            default: None,
            tags: Tags::new(),
        }
    }

    /// Sets a default value.
    #[inline]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Value(value.into()));
        self
    }

    /// Sets a default value produced on each use.
    #[inline]
    pub fn with_lazy_default(mut self, f: fn() -> Value) -> Self {
        self.default = Some(DefaultValue::Lazy(f));
        self
    }

    /// Attaches a tag. Tags keep their declaration order.
    ///
    /// Tags on a promoted parameter belong to its field.
    #[inline]
    pub fn with_tag(mut self, tag: impl Tag) -> Self {
        self.tags.push(tag);
        self
    }

    #[inline]
    pub(crate) fn promote(mut self) -> Self {
        self.promoted = true;
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn declared_type(&self) -> &DeclaredType {
        &self.ty
    }

    /// Returns `true` if the parameter is also the field of the same name.
    #[inline]
    pub const fn is_promoted(&self) -> bool {
        self.promoted
    }

    #[inline]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    #[inline]
    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// Produces the default value, if one is declared.
    #[inline]
    pub fn default_value(&self) -> Option<Value> {
        self.default.as_ref().map(DefaultValue::get)
    }

    /// Returns `true` if the parameter may be omitted: it has a default or is nullable.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.has_default() || self.ty.is_nullable()
    }

    #[inline]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }
}
