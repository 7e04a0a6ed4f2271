use alloc::borrow::Cow;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::cast::{CasterChain, CasterRegistry};
use crate::error::DtoError;
use crate::object::Dto;
use crate::resolve::{CycleGuard, DEFAULT_MAX_DEPTH, check_depth};
use crate::shape::ShapeExtractor;
use crate::value::{Mapping, Value};

/// Converts objects into [`Mapping`]s.
///
/// For every property, in shape order:
///
/// 1. the current value is read;
/// 2. the property is omitted if a skip rule of its tags says so;
/// 3. the property casters of its tags run in declaration order;
/// 4. objects recurse with their own class casters, lists and mappings are
///    rebuilt element by element, any other value goes through the global
///    casters of the class being serialized.
///
/// The global casters are the class-level override when one is declared,
/// the resolver's chain otherwise ([`CasterChain::defaults`] unless replaced).
pub struct SerializationResolver {
    extractor: Arc<ShapeExtractor>,
    casters: CasterChain,
    max_depth: usize,
}

impl SerializationResolver {
    pub fn new(extractor: Arc<ShapeExtractor>) -> Self {
        Self {
            extractor,
            casters: CasterChain::defaults(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replaces the global casters of classes without an override.
    #[inline]
    pub fn with_casters(mut self, casters: CasterChain) -> Self {
        self.casters = casters;
        self
    }

    #[inline]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Serializes `obj` with a fresh [`CycleGuard`].
    ///
    /// # Errors
    ///
    /// - [`DtoError::InvalidShape`] if a visited class has an unsupported shape.
    /// - [`DtoError::CircularReference`] if an object is reached again while
    ///   it is being serialized.
    /// - [`DtoError::InvalidArgument`] if a class-level caster cannot be resolved.
    /// - [`DtoError::RecursionLimit`] if the nesting exceeds the depth limit.
    /// - Any error of a caster.
    #[inline]
    pub fn to_mapping(&self, obj: &dyn Dto) -> Result<Mapping, DtoError> {
        self.resolve(obj, &mut CycleGuard::new())
    }

    /// Serializes `obj`, tracking in-progress objects in `guard`.
    ///
    /// `guard` is left as it was given, on success and on error.
    #[inline]
    pub fn resolve(&self, obj: &dyn Dto, guard: &mut CycleGuard) -> Result<Mapping, DtoError> {
        self.resolve_object(obj, guard, 0)
    }

    fn resolve_object(
        &self,
        obj: &dyn Dto,
        guard: &mut CycleGuard,
        depth: usize,
    ) -> Result<Mapping, DtoError> {
        check_depth(depth, self.max_depth)?;
        let mut entered = guard.enter(obj)?;
        self.resolve_properties(obj, &mut entered, depth)
    }

    fn resolve_properties(
        &self,
        obj: &dyn Dto,
        guard: &mut CycleGuard,
        depth: usize,
    ) -> Result<Mapping, DtoError> {
        let shapes = self.extractor.shapes_of(obj)?;
        let global = self.global_casters(obj)?;

        let mut out = Mapping::with_capacity(shapes.len());
        for shape in shapes.iter() {
            let mut value = shape.value_of(obj)?;
            let tags = shape.tags();
            if tags.should_skip(&value) {
                continue;
            }

            let property = CasterChain::from_shared(tags.casters());
            if !property.is_empty() {
                value = property.apply(value)?;
            }

            let value = self.resolve_value(value, &global, guard, depth + 1)?;
            out.insert(shape.name(), value);
        }
        Ok(out)
    }

    fn resolve_value(
        &self,
        value: Value,
        global: &CasterChain,
        guard: &mut CycleGuard,
        depth: usize,
    ) -> Result<Value, DtoError> {
        check_depth(depth, self.max_depth)?;
        match value {
            Value::Object(obj) => self.resolve_object(&*obj, guard, depth).map(Value::Map),
            Value::List(items) => items
                .into_iter()
                .map(|item| self.resolve_value(item, global, guard, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Value::Map(map) => map
                .into_iter()
                .map(|(key, item)| -> Result<_, DtoError> {
                    Ok((key, self.resolve_value(item, global, guard, depth + 1)?))
                })
                .collect::<Result<Mapping, _>>()
                .map(Value::Map),
            other => global.apply(other),
        }
    }

    fn global_casters(&self, obj: &dyn Dto) -> Result<Cow<'_, CasterChain>, DtoError> {
        match obj.class().casters() {
            Some(specs) => Ok(Cow::Owned(CasterChain::new(specs, CasterRegistry::global())?)),
            None => Ok(Cow::Borrowed(&self.casters)),
        }
    }
}
