//! Containers for static storage of class information.
//!
//! Internally, there is an [`OnceLock<T>`], almost no additional expenses.

use std::sync::OnceLock;

use crate::info::{ClassInfo, OpaqueInfo};

mod sealed {
    use crate::info::{ClassInfo, OpaqueInfo};

    pub trait InfoProperty: 'static {}

    impl InfoProperty for ClassInfo {}
    impl InfoProperty for OpaqueInfo {}
}

use sealed::InfoProperty;

/// Container for static storage of [`ClassInfo`] or [`OpaqueInfo`].
///
/// Only non-generic types are supported: a `static CELL` inside a generic
/// function would be shared by every instantiation.
pub struct InfoCell<T: InfoProperty>(OnceLock<T>);

/// Static storage for a [`ClassInfo`], used to implement
/// [`DtoClass`](crate::object::DtoClass).
///
/// See [`DtoClass`](crate::object::DtoClass) for an example.
pub type ClassInfoCell = InfoCell<ClassInfo>;

/// Static storage for an [`OpaqueInfo`], used to implement
/// [`OpaqueClass`](crate::object::OpaqueClass).
pub type OpaqueInfoCell = InfoCell<OpaqueInfo>;

impl<T: InfoProperty> InfoCell<T> {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, initializing it with `f` on first access.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.0.get_or_init(f)
    }
}
