//! Navigator configuration
//!
//! This module provides configuration types and defaults for the [`Navigator`],
//! covering the parsed path cache and attribute resolution rules.
//!
//! [`Navigator`]: crate::Navigator

use std::num::NonZeroUsize;

/// Configuration of the parsed path cache
///
/// # Examples
///
/// ```rust
/// use std::num::NonZeroUsize;
/// use objpath::PathCacheConfig;
///
/// // Unbounded, the default
/// let config = PathCacheConfig::unbounded();
/// assert!(config.capacity.is_none());
///
/// // LRU holding at most 512 paths
/// let config = PathCacheConfig::bounded(NonZeroUsize::new(512).unwrap());
/// assert_eq!(config.capacity.map(NonZeroUsize::get), Some(512));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PathCacheConfig {
    /// Maximum number of cached paths
    ///
    /// `None` keeps every distinct path ever parsed. `Some(n)` evicts the
    /// least recently used path once `n` are cached. Default: `None`
    pub capacity: Option<NonZeroUsize>,
}

impl PathCacheConfig {
    pub fn unbounded() -> Self {
        Self { capacity: None }
    }

    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self {
            capacity: Some(capacity),
        }
    }
}

/// Navigator configuration
///
/// # Examples
///
/// ```rust
/// use objpath::NavigatorConfig;
///
/// let config = NavigatorConfig::default()
///     .with_case_insensitive_attributes(false)
///     .with_function_fallback(true);
/// assert!(!config.case_insensitive_attributes);
///
/// assert_eq!(
///     NavigatorConfig::strict(),
///     NavigatorConfig::default()
///         .with_case_insensitive_attributes(false)
///         .with_function_fallback(false)
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// Parsed path cache settings. Default: unbounded
    pub path_cache: PathCacheConfig,

    /// Fall back to a case-insensitive match when no attribute matches exactly
    ///
    /// Two attributes differing only in case make the lookup ambiguous, which
    /// is reported as an error rather than resolved arbitrarily. Default: true
    pub case_insensitive_attributes: bool,

    /// Treat an attribute segment that names no declared attribute as a
    /// zero-argument call when a function of that name is registered
    ///
    /// Lets paths read `tags.size` as well as `tags.size()`. Default: true
    pub function_fallback: bool,
}

impl NavigatorConfig {
    /// Create new configuration with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact attribute names only, no function fallback
    pub fn strict() -> Self {
        Self {
            case_insensitive_attributes: false,
            function_fallback: false,
            ..Self::default()
        }
    }

    /// Set the parsed path cache settings
    pub fn with_path_cache(mut self, path_cache: PathCacheConfig) -> Self {
        self.path_cache = path_cache;
        self
    }

    /// Bound the parsed path cache to `capacity` entries
    pub fn with_path_cache_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.path_cache = PathCacheConfig::bounded(capacity);
        self
    }

    pub fn with_case_insensitive_attributes(mut self, enabled: bool) -> Self {
        self.case_insensitive_attributes = enabled;
        self
    }

    pub fn with_function_fallback(mut self, enabled: bool) -> Self {
        self.function_fallback = enabled;
        self
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            path_cache: PathCacheConfig::unbounded(),
            case_insensitive_attributes: true,
            function_fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NavigatorConfig::default();
        assert_eq!(config.path_cache, PathCacheConfig::unbounded());
        assert!(config.case_insensitive_attributes);
        assert!(config.function_fallback);
    }

    #[test]
    fn test_builder_methods() {
        let capacity = NonZeroUsize::new(8).unwrap();
        let config = NavigatorConfig::strict().with_path_cache_capacity(capacity);
        assert_eq!(config.path_cache.capacity, Some(capacity));
        assert!(!config.case_insensitive_attributes);
        assert!(!config.function_fallback);
    }
}
