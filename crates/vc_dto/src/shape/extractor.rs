use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{PoisonError, RwLock};

use vc_utils::TypeIdMap;

use crate::error::InvalidShapeError;
use crate::info::ClassInfo;
use crate::object::Dto;
use crate::shape::PropertyShape;

/// Derives the ordered [`PropertyShape`] list of a class.
///
/// With caching enabled (the default), the list of a class is computed once
/// and the same [`Arc`] is returned until it is evicted by
/// [`clear_cache`](ShapeExtractor::clear_cache).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_dto::impl_dto;
/// use vc_dto::info::{ClassInfo, ClassInfoCell, ParamInfo};
/// use vc_dto::object::DtoClass;
/// use vc_dto::shape::ShapeExtractor;
///
/// struct Label {
///     label: String,
/// }
///
/// impl DtoClass for Label {
///     fn class_info() -> &'static ClassInfo {
///         static CELL: ClassInfoCell = ClassInfoCell::new();
///         CELL.get_or_init(|| {
///             ClassInfo::builder::<Self>()
///                 .promoted(ParamInfo::new::<String>("label"))
///                 .constructor(|args| Ok(Label { label: args.take()? }))
///                 .build()
///         })
///     }
/// }
///
/// impl_dto!(Label { label });
///
/// let extractor = ShapeExtractor::new();
/// let a = extractor.shapes(Label::class_info()).unwrap();
/// let b = extractor.shapes(Label::class_info()).unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(a[0].name(), "label");
/// ```
pub struct ShapeExtractor {
    cache: RwLock<TypeIdMap<Arc<[PropertyShape]>>>,
    use_cache: bool,
}

impl Default for ShapeExtractor {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeExtractor {
    /// Creates a caching extractor.
    #[inline]
    pub const fn new() -> Self {
        Self {
            cache: RwLock::new(TypeIdMap::new()),
            use_cache: true,
        }
    }

    /// Creates an extractor that recomputes the shapes on every call.
    #[inline]
    pub const fn without_cache() -> Self {
        Self {
            cache: RwLock::new(TypeIdMap::new()),
            use_cache: false,
        }
    }

    #[inline]
    pub const fn uses_cache(&self) -> bool {
        self.use_cache
    }

    /// Returns the shape list of the runtime class of `obj`.
    #[inline]
    pub fn shapes_of(&self, obj: &dyn Dto) -> Result<Arc<[PropertyShape]>, InvalidShapeError> {
        self.shapes(obj.class())
    }

    /// Returns the shape list of `class`, in constructor-parameter order.
    ///
    /// # Errors
    ///
    /// - [`InvalidShapeError::MissingConstructor`] if the class has no constructor.
    /// - [`InvalidShapeError::NonPublicPromoted`] if a promoted parameter's field is not public.
    /// - [`InvalidShapeError::MissingPublicField`] if a plain parameter has no
    ///   public field of the same name.
    pub fn shapes(
        &self,
        class: &'static ClassInfo,
    ) -> Result<Arc<[PropertyShape]>, InvalidShapeError> {
        if !self.use_cache {
            return extract(class);
        }

        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&class.id())
            .cloned();
        if let Some(shapes) = cached {
            return Ok(shapes);
        }

        log::trace!("extracting property shapes of `{}`", class.type_path());
        let shapes = extract(class)?;

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have extracted the same class meanwhile; keep the first list.
        Ok(Arc::clone(cache.get_or_insert(class.id(), || shapes)))
    }

    /// Evicts the cached list of `class`, or every list when `None`.
    pub fn clear_cache(&self, class: Option<&ClassInfo>) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        match class {
            Some(class) => {
                log::debug!("clearing cached shapes of `{}`", class.type_path());
                cache.remove(&class.id());
            }
            None => {
                log::debug!("clearing {} cached shape lists", cache.len());
                cache.clear();
            }
        }
    }
}

fn extract(class: &'static ClassInfo) -> Result<Arc<[PropertyShape]>, InvalidShapeError> {
    let name = class.name();
    if !class.has_constructor() {
        return Err(InvalidShapeError::MissingConstructor { class: name });
    }

    let params = class.params();
    let mut shapes: Vec<Option<PropertyShape>> = Vec::with_capacity(params.len());
    let mut all_promoted = true;

    for param in params {
        if !param.is_promoted() {
            all_promoted = false;
            shapes.push(None);
            continue;
        }
        match class.field(param.name()) {
            Some(field) if field.visibility().is_public() => {
                shapes.push(Some(PropertyShape::new(name, param, field)));
            }
            _ => {
                return Err(InvalidShapeError::NonPublicPromoted {
                    class: name,
                    param: param.name(),
                });
            }
        }
    }

    if all_promoted {
        return Ok(shapes.into_iter().flatten().collect());
    }

    params
        .iter()
        .zip(shapes)
        .map(|(param, shape)| match shape {
            Some(shape) => Ok(shape),
            None => class
                .public_fields()
                .find(|field| field.name() == param.name())
                .map(|field| PropertyShape::new(name, param, field))
                .ok_or(InvalidShapeError::MissingPublicField {
                    class: name,
                    param: param.name(),
                }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use super::ShapeExtractor;
    use crate::error::InvalidShapeError;
    use crate::fixtures::{HiddenPromoted, Legacy, MixedBroken, NoConstructor, User};
    use crate::info::ClassInfo;
    use crate::object::DtoClass;

    fn names(extractor: &ShapeExtractor, class: &'static ClassInfo) -> Vec<&'static str> {
        extractor
            .shapes(class)
            .unwrap()
            .iter()
            .map(|shape| shape.name())
            .collect()
    }

    #[test]
    fn promoted_style() {
        let extractor = ShapeExtractor::new();
        assert_eq!(names(&extractor, User::class_info()), ["id", "name", "role"]);

        let shapes = extractor.shapes(User::class_info()).unwrap();
        assert!(shapes.iter().all(|s| s.is_promoted()));
        assert!(shapes[2].is_nullable());
        assert!(shapes[2].is_optional());
        assert!(!shapes[0].is_optional());
    }

    #[test]
    fn legacy_style_keeps_constructor_order() {
        let extractor = ShapeExtractor::new();
        // Fields are declared in another order than the constructor parameters.
        assert_eq!(names(&extractor, Legacy::class_info()), ["title", "count", "note"]);

        let shapes = extractor.shapes(Legacy::class_info()).unwrap();
        assert!(!shapes[0].is_promoted());
        assert!(shapes[2].has_default());
    }

    #[test]
    fn invalid_shapes_name_the_parameter() {
        let extractor = ShapeExtractor::new();

        let err = extractor.shapes(MixedBroken::class_info()).unwrap_err();
        assert_eq!(
            err,
            InvalidShapeError::MissingPublicField {
                class: "MixedBroken",
                param: "secret"
            }
        );
        assert_eq!(err.param(), Some("secret"));

        let err = extractor.shapes(HiddenPromoted::class_info()).unwrap_err();
        assert!(matches!(err, InvalidShapeError::NonPublicPromoted { param: "token", .. }));

        let err = extractor.shapes(NoConstructor::class_info()).unwrap_err();
        assert_eq!(err.class(), "NoConstructor");
        assert_eq!(err.param(), None);
    }

    #[test]
    fn cache_is_idempotent_until_cleared() {
        let extractor = ShapeExtractor::new();
        let a = extractor.shapes(User::class_info()).unwrap();
        let b = extractor.shapes(User::class_info()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        extractor.clear_cache(Some(User::class_info()));
        let c = extractor.shapes(User::class_info()).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(
            a.iter().map(|s| s.name()).collect::<Vec<_>>(),
            c.iter().map(|s| s.name()).collect::<Vec<_>>()
        );

        extractor.clear_cache(None);
        let d = extractor.shapes(User::class_info()).unwrap();
        assert!(!Arc::ptr_eq(&c, &d));
    }

    #[test]
    fn uncached_extractor_recomputes() {
        let extractor = ShapeExtractor::without_cache();
        assert!(!extractor.uses_cache());
        let a = extractor.shapes(User::class_info()).unwrap();
        let b = extractor.shapes(User::class_info()).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
