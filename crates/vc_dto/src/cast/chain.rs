use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::cast::{Caster, CasterRegistry, CasterSpec, SerializableCaster, ToMappingCaster};
use crate::error::{DtoError, InvalidArgumentError};
use crate::value::Value;

/// An ordered list of casters.
///
/// [`apply`](CasterChain::apply) threads a value through every caster in
/// order; a caster whose predicate rejects the current value is skipped.
///
/// # Examples
///
/// ```
/// use vc_dto::cast::{Caster, CasterChain};
/// use vc_dto::error::DtoError;
/// use vc_dto::value::Value;
///
/// struct Double;
///
/// impl Caster for Double {
///     fn supports(&self, value: &Value) -> bool {
///         matches!(value, Value::Int(_))
///     }
///
///     fn cast(&self, value: Value) -> Result<Value, DtoError> {
///         Ok(Value::Int(value.as_int().unwrap_or_default() * 2))
///     }
/// }
///
/// let chain = CasterChain::from_casters([Double, Double]);
/// assert_eq!(chain.apply(Value::Int(3)).unwrap(), Value::Int(12));
/// assert_eq!(chain.apply(Value::from("x")).unwrap(), Value::from("x"));
/// ```
#[derive(Clone, Default)]
pub struct CasterChain {
    casters: Vec<Arc<dyn Caster>>,
}

impl CasterChain {
    /// Creates an empty chain.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            casters: Vec::new(),
        }
    }

    /// Resolves `specs` in order.
    ///
    /// # Errors
    ///
    /// [`InvalidArgumentError::UnknownCaster`] or [`InvalidArgumentError::NotACaster`],
    /// carrying the index of the offending spec.
    pub fn new(
        specs: &[CasterSpec],
        registry: &CasterRegistry,
    ) -> Result<Self, InvalidArgumentError> {
        let casters = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| registry.resolve(index, spec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { casters })
    }

    /// Creates a chain from caster instances.
    pub fn from_casters<C: Caster + 'static>(casters: impl IntoIterator<Item = C>) -> Self {
        Self {
            casters: casters
                .into_iter()
                .map(|caster| Arc::new(caster) as Arc<dyn Caster>)
                .collect(),
        }
    }

    /// Creates a chain from shared casters.
    #[inline]
    pub fn from_shared(casters: impl IntoIterator<Item = Arc<dyn Caster>>) -> Self {
        Self {
            casters: casters.into_iter().collect(),
        }
    }

    /// The default global chain: [`ToMappingCaster`], then [`SerializableCaster`].
    pub fn defaults() -> Self {
        Self {
            casters: vec![
                Arc::new(ToMappingCaster) as Arc<dyn Caster>,
                Arc::new(SerializableCaster),
            ],
        }
    }

    /// Applies every supporting caster in order.
    pub fn apply(&self, value: Value) -> Result<Value, DtoError> {
        self.casters.iter().try_fold(value, |value, caster| {
            if caster.supports(&value) {
                caster.cast(value)
            } else {
                Ok(value)
            }
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.casters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.casters.is_empty()
    }
}

impl fmt::Debug for CasterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CasterChain")
            .field("len", &self.casters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::CasterChain;
    use crate::cast::{CasterRegistry, CasterSpec, SerializableCaster, ToMappingCaster};
    use crate::error::InvalidArgumentError;
    use crate::fixtures::{CastX, CastY};
    use crate::tags::Skip;
    use crate::value::Value;

    #[test]
    fn order_is_significant() {
        let mut registry = CasterRegistry::new();
        registry.register::<CastX>();
        registry.register::<CastY>();

        let xy = [CasterSpec::of::<CastX>(), CasterSpec::of::<CastY>()];
        let xy = CasterChain::new(&xy, &registry).unwrap();
        assert_eq!(xy.apply(Value::from("start")).unwrap(), Value::from("final"));

        let yx = [CasterSpec::of::<CastY>(), CasterSpec::of::<CastX>()];
        let yx = CasterChain::new(&yx, &registry).unwrap();
        assert_eq!(yx.apply(Value::from("start")).unwrap(), Value::from("mid"));
    }

    #[test]
    fn resolution_errors_carry_the_index() {
        let registry = CasterRegistry::new();

        let err = CasterChain::new(
            &[CasterSpec::of::<ToMappingCaster>(), CasterSpec::of::<CastX>()],
            &registry,
        )
        .unwrap_err();
        assert!(matches!(err, InvalidArgumentError::UnknownCaster { index: 1, .. }));

        let err = CasterChain::new(
            &[CasterSpec::of::<SerializableCaster>(), CasterSpec::of::<Skip>()],
            &registry,
        )
        .unwrap_err();
        assert!(matches!(err, InvalidArgumentError::NotACaster { index: 1, .. }));
    }

    #[test]
    fn instances_need_no_registry() {
        let specs = [CasterSpec::instance(CastX)];
        let chain = CasterChain::new(&specs, &CasterRegistry::empty()).unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.apply(Value::from("start")).unwrap(), Value::from("mid"));
    }
}
