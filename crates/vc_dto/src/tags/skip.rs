use crate::tags::{SkipRule, Tag};
use crate::value::Value;

/// Never serialize the property.
#[derive(Debug, Clone, Copy, Default)]
pub struct Skip;

impl SkipRule for Skip {
    #[inline]
    fn should_skip(&self, _: &Value) -> bool {
        true
    }
}

impl Tag for Skip {
    #[inline]
    fn as_skip_rule(&self) -> Option<&dyn SkipRule> {
        Some(self)
    }
}

/// Omit the property when its value is null.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipIfNull;

impl SkipRule for SkipIfNull {
    #[inline]
    fn should_skip(&self, value: &Value) -> bool {
        value.is_null()
    }
}

impl Tag for SkipIfNull {
    #[inline]
    fn as_skip_rule(&self) -> Option<&dyn SkipRule> {
        Some(self)
    }
}
