use core::fmt;

use crate::info::{Declared, DeclaredType};
use crate::tags::{Tag, Tags};

// -----------------------------------------------------------------------------
// Visibility

/// The visibility of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    #[inline]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        })
    }
}

// -----------------------------------------------------------------------------
// FieldInfo

/// Information for a declared field.
///
/// # Examples
///
/// ```
/// use vc_dto::info::{FieldInfo, Visibility};
///
/// let field = FieldInfo::new::<i64>("id");
/// assert!(field.visibility().is_public());
///
/// let field = FieldInfo::new::<String>("secret").with_visibility(Visibility::Private);
/// assert_eq!(field.visibility(), Visibility::Private);
/// ```
#[derive(Clone, Debug)]
pub struct FieldInfo {
    name: &'static str,
    ty: DeclaredType,
    visibility: Visibility,
    tags: Tags,
}

impl FieldInfo {
    /// Creates a public field named `name` with the declared type of `T`.
    #[inline]
    pub fn new<T: Declared>(name: &'static str) -> Self {
        Self::with_type(name, T::declared_type())
    }

    /// Creates a public field with an explicit [`DeclaredType`].
    #[inline]
    pub fn with_type(name: &'static str, ty: DeclaredType) -> Self {
        Self {
            name,
            ty,
            visibility: Visibility::Public,
            tags: Tags::new(),
        }
    }

    #[inline]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Attaches a tag. Tags keep their declaration order.
    #[inline]
    pub fn with_tag(mut self, tag: impl Tag) -> Self {
        self.tags.push(tag);
        self
    }

    #[inline]
    pub(crate) fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
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

    #[inline]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }
}
