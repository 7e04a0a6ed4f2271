use core::any::TypeId;
use core::fmt;

use crate::error::TypeError;
use crate::object::{Opaque, OpaqueRef};
use crate::value::Value;

/// Builds an opaque value from a single [`Value`].
pub type OpaqueConstructor = fn(Value) -> Result<OpaqueRef, TypeError>;

/// Information for an [`Opaque`] type used as a declared type.
///
/// # Examples
///
/// ```
/// use vc_dto::info::{OpaqueInfo, OpaqueInfoCell};
/// use vc_dto::object::{Opaque, OpaqueClass};
///
/// #[derive(Debug)]
/// struct Money(i64);
///
/// impl Opaque for Money {}
///
/// impl OpaqueClass for Money {
///     fn opaque_info() -> &'static OpaqueInfo {
///         static CELL: OpaqueInfoCell = OpaqueInfoCell::new();
///         CELL.get_or_init(OpaqueInfo::new::<Self>)
///     }
/// }
///
/// let info = Money::opaque_info();
/// assert_eq!(info.name(), "Money");
/// assert!(info.constructor().is_none());
/// ```
#[derive(Clone)]
pub struct OpaqueInfo {
    id: TypeId,
    path: &'static str,
    name: &'static str,
    constructor: Option<OpaqueConstructor>,
}

impl OpaqueInfo {
    /// Creates an info without a single-value constructor.
    pub fn new<T: Opaque>() -> Self {
        let path = core::any::type_name::<T>();
        Self {
            id: TypeId::of::<T>(),
            path,
            name: crate::info::short_name(path),
            constructor: None,
        }
    }

    /// Sets the constructor used when a plain value is given for this type.
    #[inline]
    pub fn with_constructor(mut self, constructor: OpaqueConstructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.path
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn constructor(&self) -> Option<OpaqueConstructor> {
        self.constructor
    }

    /// Returns `true` if `value` is an instance of this type.
    #[inline]
    pub fn is_instance(&self, value: &dyn Opaque) -> bool {
        let any: &dyn core::any::Any = value;
        any.type_id() == self.id
    }
}

impl fmt::Debug for OpaqueInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueInfo")
            .field("path", &self.path)
            .field("constructor", &self.constructor.is_some())
            .finish()
    }
}
