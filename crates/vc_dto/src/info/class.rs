use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::{self, Vec};
use core::any::TypeId;
use core::fmt;
use core::marker::PhantomData;

use crate::cast::CasterSpec;
use crate::error::{DtoError, InvalidShapeError, TypeError};
use crate::info::{FieldInfo, ParamInfo, Visibility};
use crate::object::{Dto, DtoClass, ObjectRef};
use crate::tags::Tags;
use crate::value::{FromValue, Mapping, Value};

/// A type-erased constructor, called with the positional arguments.
pub type Constructor =
    Box<dyn for<'a> Fn(&mut Args<'a>) -> Result<ObjectRef, DtoError> + Send + Sync>;

/// A type-erased "build from mapping" hook.
pub type MappingConstructor = Box<dyn Fn(Mapping) -> Result<ObjectRef, DtoError> + Send + Sync>;

// -----------------------------------------------------------------------------
// FromMapping

/// Whether a class can build itself from a mapping.
///
/// Used when a mapping is given for a property declared with this class.
#[derive(Default)]
pub enum FromMapping {
    /// No such capability; struct-like mappings are built through the shape list.
    #[default]
    None,
    /// The regular mapping constructor, including unknown-key validation.
    Derived,
    /// A custom hook.
    Custom(MappingConstructor),
}

impl FromMapping {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Debug for FromMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "None",
            Self::Derived => "Derived",
            Self::Custom(_) => "Custom",
        })
    }
}

// -----------------------------------------------------------------------------
// Args

/// Positional constructor arguments.
///
/// Values are taken in constructor-parameter order.
pub struct Args<'a> {
    class: &'static str,
    params: &'a [ParamInfo],
    values: vec::IntoIter<Value>,
    index: usize,
}

impl<'a> Args<'a> {
    #[inline]
    fn new(class: &'static str, params: &'a [ParamInfo], values: Vec<Value>) -> Self {
        Self {
            class,
            params,
            values: values.into_iter(),
            index: 0,
        }
    }

    /// Takes the next argument and converts it to `T`.
    ///
    /// A missing argument is read as [`Value::Null`].
    pub fn take<T: FromValue>(&mut self) -> Result<T, TypeError> {
        let param = self.params.get(self.index).map_or("?", ParamInfo::name);
        let value = self.values.next().unwrap_or_default();
        self.index += 1;
        T::from_value(value).map_err(|source| TypeError::Argument {
            class: self.class,
            param,
            source: Box::new(source),
        })
    }

    /// Takes the next argument without conversion.
    #[inline]
    pub fn take_value(&mut self) -> Value {
        self.index += 1;
        self.values.next().unwrap_or_default()
    }

    /// Returns the number of arguments not taken yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

// -----------------------------------------------------------------------------
// ClassInfo

/// Reflection data of a DTO class.
///
/// Created once by [`ClassInfo::builder`] and usually stored in a
/// [`ClassInfoCell`](crate::info::ClassInfoCell).
///
/// `params` are the constructor parameters in declaration order; `fields`
/// are the declared fields, including the ones created by promotion.
pub struct ClassInfo {
    id: TypeId,
    path: &'static str,
    name: &'static str,
    params: Box<[ParamInfo]>,
    fields: Box<[FieldInfo]>,
    constructor: Option<Constructor>,
    casters: Option<Box<[CasterSpec]>>,
    from_mapping: FromMapping,
}

impl ClassInfo {
    /// Starts building the info of `T`.
    #[inline]
    pub fn builder<T: DtoClass>() -> ClassBuilder<T> {
        ClassBuilder::new()
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The full type path.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.path
    }

    /// The short class name, used in messages.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if a constructor was registered.
    #[inline]
    pub const fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// The constructor parameters in declaration order.
    #[inline]
    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }

    /// Returns the constructor parameter named `name`.
    #[inline]
    pub fn param(&self, name: &str) -> Option<&ParamInfo> {
        self.params.iter().find(|p| p.name() == name)
    }

    /// The declared fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Returns the declared field named `name`.
    #[inline]
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Iterates over the public fields.
    #[inline]
    pub fn public_fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.iter().filter(|f| f.visibility().is_public())
    }

    /// Returns the tags of the field `name`, empty if there is no such field.
    #[inline]
    pub fn tags_of(&self, name: &str) -> &Tags {
        self.field(name).map_or(Tags::EMPTY, FieldInfo::tags)
    }

    /// The class-level override of the global casters, if any.
    #[inline]
    pub fn casters(&self) -> Option<&[CasterSpec]> {
        self.casters.as_deref()
    }

    #[inline]
    pub fn from_mapping(&self) -> &FromMapping {
        &self.from_mapping
    }

    /// Returns `true` if `obj` is an instance of this class.
    #[inline]
    pub fn is_instance(&self, obj: &dyn Dto) -> bool {
        obj.class().id == self.id
    }

    /// Constructs an instance from positional arguments.
    ///
    /// Missing trailing arguments are filled from the parameter defaults.
    ///
    /// # Errors
    ///
    /// - [`InvalidShapeError::MissingConstructor`] if no constructor was registered.
    /// - [`TypeError::ArgumentCount`] if too many arguments are given, or a
    ///   missing one has no default.
    /// - Any error of the constructor itself.
    pub fn instantiate(&self, mut values: Vec<Value>) -> Result<ObjectRef, DtoError> {
        let Some(constructor) = &self.constructor else {
            return Err(InvalidShapeError::MissingConstructor { class: self.name }.into());
        };

        let given = values.len();
        let max = self.params.len();
        if given > max {
            return Err(self.argument_count(given).into());
        }
        for param in &self.params[given..] {
            match param.default_value() {
                Some(value) => values.push(value),
                None => return Err(self.argument_count(given).into()),
            }
        }

        constructor(&mut Args::new(self.name, &self.params, values))
    }

    fn argument_count(&self, given: usize) -> TypeError {
        let min = self
            .params
            .iter()
            .rposition(|p| !p.has_default())
            .map_or(0, |index| index + 1);
        TypeError::ArgumentCount {
            class: self.name,
            min,
            max: self.params.len(),
            given,
        }
    }
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("path", &self.path)
            .field("params", &self.params)
            .field("fields", &self.fields)
            .field("constructor", &self.constructor.is_some())
            .field("from_mapping", &self.from_mapping)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ClassBuilder

/// Builder of a [`ClassInfo`], see [`DtoClass`] for an example.
pub struct ClassBuilder<T> {
    params: Vec<ParamInfo>,
    fields: Vec<FieldInfo>,
    constructor: Option<Constructor>,
    casters: Option<Box<[CasterSpec]>>,
    from_mapping: FromMapping,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DtoClass> ClassBuilder<T> {
    fn new() -> Self {
        Self {
            params: Vec::new(),
            fields: Vec::new(),
            constructor: None,
            casters: None,
            from_mapping: FromMapping::None,
            _marker: PhantomData,
        }
    }

    /// Adds a promoted parameter, which is also a public field of the same name.
    #[inline]
    pub fn promoted(self, param: ParamInfo) -> Self {
        self.promoted_as(Visibility::Public, param)
    }

    /// Adds a promoted parameter whose field has the given visibility.
    pub fn promoted_as(mut self, visibility: Visibility, param: ParamInfo) -> Self {
        let field = FieldInfo::with_type(param.name(), param.declared_type().clone())
            .with_visibility(visibility)
            .with_tags(param.tags().clone());
        self.params.push(param.promote());
        self.fields.push(field);
        self
    }

    /// Adds a plain constructor parameter.
    ///
    /// A public field of the same name must be declared with [`field`](Self::field).
    #[inline]
    pub fn param(mut self, param: ParamInfo) -> Self {
        self.params.push(param);
        self
    }

    /// Declares a field.
    #[inline]
    pub fn field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    /// Registers the constructor.
    ///
    /// Arguments arrive in parameter order; read them with [`Args::take`].
    pub fn constructor(mut self, f: fn(&mut Args<'_>) -> Result<T, DtoError>) -> Self {
        self.constructor = Some(Box::new(move |args: &mut Args<'_>| {
            f(args).map(|value| Arc::new(value) as ObjectRef)
        }));
        self
    }

    /// Replaces the global casters applied to the values of this class.
    #[inline]
    pub fn casters(mut self, casters: impl IntoIterator<Item = CasterSpec>) -> Self {
        self.casters = Some(casters.into_iter().collect());
        self
    }

    /// Marks the class as buildable from a mapping, validating unknown keys.
    #[inline]
    pub fn from_mapping(mut self) -> Self {
        self.from_mapping = FromMapping::Derived;
        self
    }

    /// Builds the class from a mapping with a custom hook.
    pub fn from_mapping_with(mut self, f: fn(Mapping) -> Result<T, DtoError>) -> Self {
        self.from_mapping = FromMapping::Custom(Box::new(move |map| {
            f(map).map(|value| Arc::new(value) as ObjectRef)
        }));
        self
    }

    pub fn build(self) -> ClassInfo {
        let path = core::any::type_name::<T>();
        ClassInfo {
            id: TypeId::of::<T>(),
            path,
            name: crate::info::short_name(path),
            params: self.params.into_boxed_slice(),
            fields: self.fields.into_boxed_slice(),
            constructor: self.constructor,
            casters: self.casters,
            from_mapping: self.from_mapping,
        }
    }
}
