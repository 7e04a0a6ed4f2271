use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::info::{ClassInfo, OpaqueInfo};
use crate::object::DtoClass;
use crate::value::{Mapping, Value};

// -----------------------------------------------------------------------------
// TypeKind

/// The kind of a declared parameter or field type.
///
/// Class and opaque kinds store a function pointer, so the info is created on
/// first access and self-referential classes are possible.
#[derive(Clone)]
pub enum TypeKind {
    /// No declared type, implicitly nullable.
    Mixed,
    Bool,
    Int,
    Float,
    String,
    /// A list or mapping, optionally with a declared item kind.
    Array(Option<Box<TypeKind>>),
    /// A DTO class.
    Class(fn() -> &'static ClassInfo),
    /// An opaque, non-DTO type.
    Opaque(fn() -> &'static OpaqueInfo),
    /// A union of several kinds. Never resolved as an object.
    Union(Box<[TypeKind]>),
}

impl TypeKind {
    /// Returns `true` for built-in kinds, i.e. anything but a class or opaque type.
    #[inline]
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Class(_) | Self::Opaque(_))
    }

    /// Returns the class info for [`TypeKind::Class`].
    #[inline]
    pub fn as_class(&self) -> Option<&'static ClassInfo> {
        match self {
            Self::Class(info) => Some(info()),
            _ => None,
        }
    }

    /// Returns the opaque info for [`TypeKind::Opaque`].
    #[inline]
    pub fn as_opaque(&self) -> Option<&'static OpaqueInfo> {
        match self {
            Self::Opaque(info) => Some(info()),
            _ => None,
        }
    }

    /// Returns the declared item kind of an [`TypeKind::Array`].
    #[inline]
    pub fn item(&self) -> Option<&TypeKind> {
        match self {
            Self::Array(item) => item.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Debug for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mixed => f.write_str("mixed"),
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::String => f.write_str("string"),
            Self::Array(None) => f.write_str("array"),
            Self::Array(Some(item)) => write!(f, "array<{item:?}>"),
            Self::Class(info) => f.write_str(info().name()),
            Self::Opaque(info) => f.write_str(info().name()),
            Self::Union(kinds) => {
                for (index, kind) in kinds.iter().enumerate() {
                    if index > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{kind:?}")?;
                }
                Ok(())
            }
        }
    }
}

// -----------------------------------------------------------------------------
// DeclaredType

/// A declared type: a [`TypeKind`] and a nullable flag.
///
/// # Examples
///
/// ```
/// use vc_dto::info::{DeclaredType, TypeKind};
///
/// let ty = DeclaredType::of::<Option<i64>>();
/// assert!(ty.is_nullable());
/// assert!(matches!(ty.kind(), TypeKind::Int));
///
/// assert!(DeclaredType::of::<vc_dto::value::Value>().is_nullable());
/// assert!(!DeclaredType::of::<String>().is_nullable());
/// ```
#[derive(Clone)]
pub struct DeclaredType {
    kind: TypeKind,
    nullable: bool,
}

impl DeclaredType {
    /// Creates a declared type, nullable only for [`TypeKind::Mixed`].
    #[inline]
    pub fn new(kind: TypeKind) -> Self {
        let nullable = matches!(kind, TypeKind::Mixed);
        Self { kind, nullable }
    }

    /// Returns the declared type of `T`.
    #[inline]
    pub fn of<T: Declared>() -> Self {
        T::declared_type()
    }

    /// Marks the type as nullable.
    #[inline]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[inline]
    pub fn is_builtin(&self) -> bool {
        self.kind.is_builtin()
    }
}

impl fmt::Debug for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable && !matches!(self.kind, TypeKind::Mixed) {
            f.write_str("?")?;
        }
        fmt::Debug::fmt(&self.kind, f)
    }
}

// -----------------------------------------------------------------------------
// Declared

/// Rust types usable as declared parameter or field types.
pub trait Declared {
    fn declared_type() -> DeclaredType;
}

macro_rules! impl_declared {
    ($kind:ident: $($ty:ty),*) => {
        $(
            impl Declared for $ty {
                #[inline]
                fn declared_type() -> DeclaredType {
                    DeclaredType::new(TypeKind::$kind)
                }
            }
        )*
    };
}

impl_declared!(Bool: bool);
impl_declared!(Int: i8, i16, i32, i64, u8, u16, u32);
impl_declared!(Float: f32, f64);
impl_declared!(String: String);
impl_declared!(Mixed: Value);

impl Declared for Mapping {
    #[inline]
    fn declared_type() -> DeclaredType {
        DeclaredType::new(TypeKind::Array(None))
    }
}

impl<T: Declared> Declared for Vec<T> {
    fn declared_type() -> DeclaredType {
        let item = T::declared_type().kind;
        DeclaredType::new(TypeKind::Array(Some(Box::new(item))))
    }
}

impl<T: Declared> Declared for Option<T> {
    #[inline]
    fn declared_type() -> DeclaredType {
        T::declared_type().nullable()
    }
}

impl<T: DtoClass> Declared for Arc<T> {
    #[inline]
    fn declared_type() -> DeclaredType {
        DeclaredType::new(TypeKind::Class(T::class_info))
    }
}
