use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;
use std::sync::LazyLock;

use vc_utils::TypeIdMap;

use crate::cast::{Caster, CasterSpec, SerializableCaster, ToMappingCaster};
use crate::error::InvalidArgumentError;
use crate::tags::{Skip, SkipIfNull, Tag};

// -----------------------------------------------------------------------------
// CasterRegistration

/// A registered caster type: its identity and a default constructor.
///
/// Registered types are [`Tag`]s; whether one is actually a caster is checked
/// when it is resolved.
#[derive(Clone, Copy)]
pub struct CasterRegistration {
    type_id: fn() -> TypeId,
    type_name: fn() -> &'static str,
    make: fn() -> Arc<dyn Tag>,
}

fn make_tag<T: Tag + Default>() -> Arc<dyn Tag> {
    Arc::new(T::default())
}

impl CasterRegistration {
    /// The registration of `T`, usable in `const` context.
    #[inline]
    pub const fn of<T: Tag + Default>() -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_name: core::any::type_name::<T>,
            make: make_tag::<T>,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Creates a default instance.
    #[inline]
    pub fn make(&self) -> Arc<dyn Tag> {
        (self.make)()
    }
}

impl fmt::Debug for CasterRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CasterRegistration")
            .field(&self.type_name())
            .finish()
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(CasterRegistration);

/// Registers a caster type into [`CasterRegistry::global`].
///
/// The type must implement [`Tag`] and [`Default`]. Without the
/// `auto_register` feature this expands to nothing.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_dto::cast::{Caster, CasterRegistry};
/// use vc_dto::error::DtoError;
/// use vc_dto::register_caster;
/// use vc_dto::tags::Tag;
/// use vc_dto::value::Value;
///
/// #[derive(Default)]
/// struct Upper;
///
/// impl Caster for Upper {
///     fn supports(&self, value: &Value) -> bool {
///         value.as_str().is_some()
///     }
///
///     fn cast(&self, value: Value) -> Result<Value, DtoError> {
///         Ok(Value::from(value.as_str().unwrap_or_default().to_uppercase()))
///     }
/// }
///
/// impl Tag for Upper {
///     fn into_caster(self: Arc<Self>) -> Option<Arc<dyn Caster>> {
///         Some(self)
///     }
/// }
///
/// register_caster!(Upper);
///
/// fn main() {
///     # #[cfg(feature = "auto_register")]
///     assert!(CasterRegistry::global().contains::<Upper>());
/// }
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! register_caster {
    ($ty:ty) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::cast::CasterRegistration::of::<$ty>()
        }
    };
}

/// Registers a caster type into [`CasterRegistry::global`].
///
/// The `auto_register` feature is disabled, so this expands to nothing.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! register_caster {
    ($ty:ty) => {};
}

// -----------------------------------------------------------------------------
// CasterRegistry

/// Resolves caster types to instances.
///
/// # Examples
///
/// ```
/// use vc_dto::cast::{CasterRegistry, CasterSpec, ToMappingCaster};
/// use vc_dto::tags::Skip;
///
/// let registry = CasterRegistry::new();
/// assert!(registry.contains::<ToMappingCaster>());
///
/// assert!(registry.resolve(0, &CasterSpec::of::<ToMappingCaster>()).is_ok());
/// assert!(registry.resolve(0, &CasterSpec::of::<Skip>()).is_err());
/// assert!(registry.resolve(0, &CasterSpec::of::<u8>()).is_err());
/// ```
pub struct CasterRegistry {
    entries: TypeIdMap<CasterRegistration>,
}

impl Default for CasterRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl CasterRegistry {
    /// Creates a registry without any registration.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            entries: TypeIdMap::new(),
        }
    }

    /// Creates a registry with the built-in tags and casters.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<ToMappingCaster>();
        registry.register::<SerializableCaster>();
        registry.register::<Skip>();
        registry.register::<SkipIfNull>();
        #[cfg(feature = "time")]
        registry.register::<crate::time::AsStringTime>();
        registry
    }

    /// Registers `T`.
    ///
    /// Returns `false` if it was already registered.
    #[inline]
    pub fn register<T: Tag + Default>(&mut self) -> bool {
        self.add(CasterRegistration::of::<T>())
    }

    /// Adds a registration, returning `false` if its type is already present.
    #[inline]
    pub fn add(&mut self, registration: CasterRegistration) -> bool {
        self.entries
            .try_insert(registration.type_id(), || registration)
    }

    /// Adds every registration declared with [`register_caster!`](crate::register_caster).
    ///
    /// Returns `false` if the `auto_register` feature is disabled.
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            let mut added = 0_usize;
            for registration in inventory::iter::<CasterRegistration> {
                if self.add(*registration) {
                    added += 1;
                }
            }
            log::debug!("auto registered {added} caster types");
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// The process-wide registry: built-in types plus automatic registrations.
    pub fn global() -> &'static CasterRegistry {
        static GLOBAL: LazyLock<CasterRegistry> = LazyLock::new(|| {
            let mut registry = CasterRegistry::new();
            registry.auto_register();
            registry
        });
        &GLOBAL
    }

    #[inline]
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains(&TypeId::of::<T>())
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&CasterRegistration> {
        self.entries.get(&type_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves one spec; `index` is its position, reported on failure.
    pub fn resolve(
        &self,
        index: usize,
        spec: &CasterSpec,
    ) -> Result<Arc<dyn Caster>, InvalidArgumentError> {
        match spec {
            CasterSpec::Instance(caster) => Ok(Arc::clone(caster)),
            &CasterSpec::Type { id, name } => {
                let registration = self
                    .get(id)
                    .ok_or(InvalidArgumentError::UnknownCaster { index, name })?;
                registration
                    .make()
                    .into_caster()
                    .ok_or(InvalidArgumentError::NotACaster { index, name })
            }
        }
    }
}

impl fmt::Debug for CasterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.entries.values().map(CasterRegistration::type_name))
            .finish()
    }
}
