//! Per-field metadata markers.
//!
//! ## Menu
//!
//! - [`Tag`]: a marker attached to a field or promoted parameter.
//! - [`Tags`]: the ordered tags of one field.
//! - [`SkipRule`]: the "omit from serialized output" capability of a tag.
//! - Built-in tags:
//!     - [`Skip`]: always omit the property.
//!     - [`SkipIfNull`]: omit the property when its value is null.
//!     - `AsStringTime`: format a timestamp as a string (feature `time`).
//!
//! A tag may also be a [`Caster`]; property-level casters run on the raw
//! property value, in declaration order, before any recursion.

// -----------------------------------------------------------------------------
// Modules

mod skip;

// -----------------------------------------------------------------------------
// Exports

pub use skip::{Skip, SkipIfNull};

#[cfg(feature = "time")]
pub use crate::time::AsStringTime;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::cast::Caster;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Tag

/// A metadata marker attached to a field.
///
/// Capabilities are reported through the accessor methods; the defaults
/// report none.
pub trait Tag: Any + Send + Sync {
    /// A human readable name.
    fn tag_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Returns the skip-rule capability, if supported.
    fn as_skip_rule(&self) -> Option<&dyn SkipRule> {
        None
    }

    /// Returns the caster capability, if supported.
    fn into_caster(self: Arc<Self>) -> Option<Arc<dyn Caster>> {
        None
    }
}

/// Decides whether a property is omitted from serialized output.
pub trait SkipRule {
    fn should_skip(&self, value: &Value) -> bool;
}

// -----------------------------------------------------------------------------
// Tags

/// The ordered tags of a field.
///
/// Unlike type-keyed attribute maps, several tags of the same type may be
/// attached and declaration order is kept.
///
/// # Examples
///
/// ```
/// use vc_dto::tags::{Skip, SkipIfNull, Tags};
/// use vc_dto::value::Value;
///
/// let mut tags = Tags::new();
/// tags.push(SkipIfNull);
///
/// assert!(tags.get::<SkipIfNull>().is_some());
/// assert!(tags.get::<Skip>().is_none());
/// assert!(tags.should_skip(&Value::Null));
/// assert!(!tags.should_skip(&Value::Int(0)));
/// ```
#[derive(Clone, Default)]
pub struct Tags(Vec<Arc<dyn Tag>>);

impl Tags {
    /// A static reference to an empty [`Tags`].
    pub(crate) const EMPTY: &'static Self = &Self::new();

    /// Creates an empty list.
    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a tag.
    #[inline]
    pub fn push(&mut self, tag: impl Tag) {
        self.0.push(Arc::new(tag));
    }

    /// Iterates over the tags in declaration order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &dyn Tag> {
        self.0.iter().map(|tag| &**tag)
    }

    /// Returns the first tag of type `T`.
    pub fn get<T: Tag>(&self) -> Option<&T> {
        self.0.iter().find_map(|tag| {
            let any: &dyn Any = &**tag;
            any.downcast_ref::<T>()
        })
    }

    /// Returns `true` if a tag of type `T` is attached.
    #[inline]
    pub fn contains<T: Tag>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Iterates over the tags with the skip-rule capability.
    #[inline]
    pub fn skip_rules(&self) -> impl Iterator<Item = &dyn SkipRule> {
        self.0.iter().filter_map(|tag| tag.as_skip_rule())
    }

    /// Returns `true` if any skip rule omits `value`.
    #[inline]
    pub fn should_skip(&self, value: &Value) -> bool {
        self.skip_rules().any(|rule| rule.should_skip(value))
    }

    /// Iterates over the tags with the caster capability, in declaration order.
    #[inline]
    pub fn casters(&self) -> impl Iterator<Item = Arc<dyn Caster>> + '_ {
        self.0.iter().filter_map(|tag| Arc::clone(tag).into_caster())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|tag| tag.tag_name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::{Skip, SkipIfNull, Tags};
    use crate::cast::{Caster, ToMappingCaster};
    use crate::value::Value;

    #[test]
    fn order_and_capabilities() {
        let mut tags = Tags::new();
        tags.push(Skip);
        tags.push(ToMappingCaster);
        tags.push(SkipIfNull);

        let names: Vec<_> = tags.iter().map(|t| t.tag_name()).collect();
        assert!(names[0].ends_with("Skip"));
        assert!(names[2].ends_with("SkipIfNull"));

        assert_eq!(tags.skip_rules().count(), 2);
        assert!(tags.should_skip(&Value::Int(1)));

        let casters: Vec<Arc<dyn Caster>> = tags.casters().collect();
        assert_eq!(casters.len(), 1);
        assert!(!casters[0].supports(&Value::Int(1)));
    }
}
