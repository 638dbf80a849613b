//! Store configuration, loadable from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::post::Post;

/// Number of posts a store is seeded with unless configured otherwise.
pub const DEFAULT_SEED_COUNT: usize = 30;

/// How a [`PostStore`](crate::PostStore) is populated at creation.
///
/// ```
/// use postboard::StoreConfig;
///
/// let config = StoreConfig::from_toml_str("seed_count = 5\nseed = 9").unwrap();
/// assert_eq!(config.seed_count, 5);
/// assert_eq!(config.seed, Some(9));
/// assert!(config.posts.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Posts generated at creation.
    pub seed_count: usize,
    /// RNG seed for the generator; entropy when absent.
    pub seed: Option<u64>,
    /// Filter the store starts with.
    pub initial_filter: String,
    /// Fixed posts placed before the generated ones.
    pub posts: Vec<Post>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_count: DEFAULT_SEED_COUNT,
            seed: None,
            initial_filter: String::new(),
            posts: Vec::new(),
        }
    }
}

impl StoreConfig {
    /// Parse a config from TOML text; missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Use a fixed RNG seed for the generated posts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set how many posts are generated.
    pub fn with_seed_count(mut self, seed_count: usize) -> Self {
        self.seed_count = seed_count;
        self
    }
}
