//! Store configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`MemoryStore`](crate::MemoryStore) and the dispatch
/// boundary in front of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Buffered change events per subscriber before it starts lagging (default: 1024)
    #[serde(default = "default_watch_capacity")]
    pub watch_capacity: usize,

    /// Path prefix preceding the numeric id (default: "/book/")
    #[serde(default = "default_book_path_prefix")]
    pub book_path_prefix: String,
}

fn default_watch_capacity() -> usize {
    1024
}

fn default_book_path_prefix() -> String {
    "/book/".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            watch_capacity: default_watch_capacity(),
            book_path_prefix: default_book_path_prefix(),
        }
    }
}

impl StoreConfig {
    /// Create a config with the given watch capacity.
    pub fn with_watch_capacity(watch_capacity: usize) -> Self {
        Self {
            watch_capacity,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.watch_capacity, 1024);
        assert_eq!(config.book_path_prefix, "/book/");
    }

    #[test]
    fn test_with_watch_capacity() {
        let config = StoreConfig::with_watch_capacity(16);
        assert_eq!(config.watch_capacity, 16);
        assert_eq!(config.book_path_prefix, "/book/");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{"book_path_prefix":"/books/"}"#).unwrap();
        assert_eq!(config.watch_capacity, 1024);
        assert_eq!(config.book_path_prefix, "/books/");
    }
}
