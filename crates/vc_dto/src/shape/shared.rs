use alloc::sync::Arc;
use std::sync::{LazyLock, PoisonError, RwLock};

use crate::shape::ShapeExtractor;

static DEFAULT: LazyLock<Arc<ShapeExtractor>> = LazyLock::new(|| Arc::new(ShapeExtractor::new()));
static OVERRIDE: RwLock<Option<Arc<ShapeExtractor>>> = RwLock::new(None);

/// The process-wide [`ShapeExtractor`] used by [`api`](crate::api) and [`DtoExt`].
///
/// Resolvers take their extractor explicitly; this is only the default
/// wiring. [`set`](SharedExtractor::set) replaces it, e.g. with an uncached
/// extractor in tests, until [`reset`](SharedExtractor::reset).
///
/// [`DtoExt`]: crate::api::DtoExt
pub struct SharedExtractor;

impl SharedExtractor {
    /// Returns the override if one is set, the default extractor otherwise.
    pub fn get() -> Arc<ShapeExtractor> {
        let current = OVERRIDE.read().unwrap_or_else(PoisonError::into_inner);
        match &*current {
            Some(extractor) => Arc::clone(extractor),
            None => Arc::clone(&DEFAULT),
        }
    }

    /// Overrides the shared extractor.
    pub fn set(extractor: Arc<ShapeExtractor>) {
        log::warn!("overriding the shared shape extractor");
        *OVERRIDE.write().unwrap_or_else(PoisonError::into_inner) = Some(extractor);
    }

    /// Removes the override.
    pub fn reset() {
        let previous = OVERRIDE.write().unwrap_or_else(PoisonError::into_inner).take();
        if previous.is_some() {
            log::debug!("shared shape extractor reset to the default");
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::SharedExtractor;
    use crate::shape::ShapeExtractor;

    // The only test touching the override, so parallel tests never observe it.
    #[test]
    fn override_and_reset() {
        let default = SharedExtractor::get();
        assert!(Arc::ptr_eq(&default, &SharedExtractor::get()));

        let custom = Arc::new(ShapeExtractor::without_cache());
        SharedExtractor::set(Arc::clone(&custom));
        assert!(Arc::ptr_eq(&custom, &SharedExtractor::get()));

        SharedExtractor::reset();
        assert!(Arc::ptr_eq(&default, &SharedExtractor::get()));
    }
}
