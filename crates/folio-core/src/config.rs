//! Runtime configuration for indexing and search operations.

use std::time::Duration;

use crate::defaults;

/// Tunables for the index writer, search executor, and maintenance jobs.
///
/// Defaults come from [`crate::defaults`]; construct with `Default` and
/// override fields as needed.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Notes per batch transaction chunk.
    pub batch_size: usize,
    /// Content character cap; overflow is truncated with a log entry.
    pub max_content_chars: usize,
    /// Default result limit when the caller does not specify one.
    pub default_limit: i64,
    /// Hard cap on result limits.
    pub max_limit: i64,
    /// Snippet context window in tokens.
    pub snippet_tokens: i64,
    /// Threshold above which queries are logged as slow.
    pub slow_query_threshold: Duration,
    /// Sync counts above this trigger an optimize pass.
    pub sync_optimize_threshold: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::BATCH_SIZE,
            max_content_chars: defaults::MAX_CONTENT_CHARS,
            default_limit: defaults::DEFAULT_SEARCH_LIMIT,
            max_limit: defaults::MAX_SEARCH_LIMIT,
            snippet_tokens: defaults::DEFAULT_SNIPPET_TOKENS,
            slow_query_threshold: Duration::from_millis(defaults::SLOW_QUERY_THRESHOLD_MS),
            sync_optimize_threshold: defaults::SYNC_OPTIMIZE_THRESHOLD,
        }
    }
}

impl IndexConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp a caller-supplied limit to the configured bounds.
    pub fn clamp_limit(&self, limit: i64) -> i64 {
        if limit <= 0 {
            self.default_limit
        } else {
            limit.min(self.max_limit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IndexConfig::default();
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.max_content_chars, 2 * 1024 * 1024);
        assert_eq!(config.default_limit, 100);
    }

    #[test]
    fn test_clamp_limit() {
        let config = IndexConfig::default();
        assert_eq!(config.clamp_limit(0), 100);
        assert_eq!(config.clamp_limit(-5), 100);
        assert_eq!(config.clamp_limit(50), 50);
        assert_eq!(config.clamp_limit(999_999), 10_000);
    }
}
