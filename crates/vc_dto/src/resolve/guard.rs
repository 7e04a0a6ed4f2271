use core::ops::{Deref, DerefMut};

use vc_utils::hash::HashSet;

use crate::error::CircularReferenceError;
use crate::object::{Dto, object_addr};

/// The objects currently being serialized by one top-level call.
///
/// Identities are allocation addresses, so two equal but distinct objects
/// never conflict. [`enter`](Self::enter) returns an [`Entered`] handle that
/// unregisters the object when dropped, on error paths and during unwinding.
///
/// # Examples
///
/// ```
/// use vc_dto::resolve::CycleGuard;
/// # use vc_dto::impl_dto;
/// # use vc_dto::info::{ClassInfo, ClassInfoCell};
/// # use vc_dto::object::DtoClass;
/// # struct Empty;
/// # impl DtoClass for Empty {
/// #     fn class_info() -> &'static ClassInfo {
/// #         static CELL: ClassInfoCell = ClassInfoCell::new();
/// #         CELL.get_or_init(|| ClassInfo::builder::<Self>().constructor(|_| Ok(Empty)).build())
/// #     }
/// # }
/// # impl_dto!(Empty {});
///
/// let obj = Empty;
/// let mut guard = CycleGuard::new();
///
/// {
///     let mut entered = guard.enter(&obj).unwrap();
///     assert!(entered.enter(&obj).is_err());
///     assert_eq!(entered.len(), 1);
/// }
/// assert!(guard.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct CycleGuard {
    in_progress: HashSet<usize>,
}

impl CycleGuard {
    /// Creates an empty guard.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `obj` as in progress until the returned handle is dropped.
    ///
    /// The handle derefs to the guard, so nested objects are entered through it.
    ///
    /// # Errors
    ///
    /// [`CircularReferenceError`] naming the class if `obj` is already registered.
    pub fn enter(&mut self, obj: &dyn Dto) -> Result<Entered<'_>, CircularReferenceError> {
        let addr = object_addr(obj);
        if self.in_progress.insert(addr) {
            Ok(Entered { guard: self, addr })
        } else {
            Err(CircularReferenceError {
                type_name: obj.class().name(),
            })
        }
    }

    #[inline]
    pub fn contains(&self, obj: &dyn Dto) -> bool {
        self.in_progress.contains(&object_addr(obj))
    }

    /// The number of objects in progress.
    #[inline]
    pub fn len(&self) -> usize {
        self.in_progress.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.in_progress.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Entered

/// An object registered in a [`CycleGuard`], unregistered on drop.
#[derive(Debug)]
pub struct Entered<'a> {
    guard: &'a mut CycleGuard,
    addr: usize,
}

impl Deref for Entered<'_> {
    type Target = CycleGuard;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.guard
    }
}

impl DerefMut for Entered<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.guard
    }
}

impl Drop for Entered<'_> {
    #[inline]
    fn drop(&mut self) {
        self.guard.in_progress.remove(&self.addr);
    }
}
