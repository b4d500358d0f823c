//! Configuration for the handler resolver.

use crate::patterns::matcher::DEFAULT_MAX_DEPTH;

/// Configuration for [`Resolver`](crate::resolver::Resolver).
///
/// Neither option changes which handlers get bound; they only trade throughput and
/// how far verifiers may follow helper calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Resolve handlers on the rayon thread pool (default: true).
    pub parallel: bool,

    /// Maximum nesting of verifier delegation into helper bodies (default: 4).
    ///
    /// A verifier that would need to go deeper fails, which keeps mutually
    /// delegating helpers from recursing forever.
    pub max_delegation_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            max_delegation_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ResolverConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that resolves on the calling thread only.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Enables or disables parallel resolution.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the delegation depth bound.
    #[must_use]
    pub fn with_max_delegation_depth(mut self, depth: usize) -> Self {
        self.max_delegation_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::new();
        assert!(config.parallel);
        assert_eq!(config.max_delegation_depth, 4);
        assert!(!ResolverConfig::sequential().parallel);
    }

    #[test]
    fn test_setters() {
        let config = ResolverConfig::default()
            .with_parallel(false)
            .with_max_delegation_depth(1);
        assert_eq!(config, ResolverConfig::sequential().with_max_delegation_depth(1));
    }
}
