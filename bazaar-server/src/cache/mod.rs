//! Suggestion cache
//!
//! Two named string sets, one with category names and one with approved
//! product names. The refresher replaces a set wholesale; readers always see
//! either the old or the new contents.

mod memory;
mod redis;

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::CoreResult;

pub use memory::MemorySuggestionCache;
pub use self::redis::RedisSuggestionCache;

/// Which suggestion set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionKey {
    Categories,
    Products,
}

impl SuggestionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKey::Categories => "suggestions:categories",
            SuggestionKey::Products => "suggestions:products",
        }
    }
}

impl fmt::Display for SuggestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named string sets backing the suggestion service
#[async_trait]
pub trait SuggestionCache: Send + Sync {
    /// Atomically replace the set stored under `key`
    async fn replace(&self, key: SuggestionKey, values: &BTreeSet<String>) -> CoreResult<()>;

    /// Current members of `key`; an absent set is empty
    async fn members(&self, key: SuggestionKey) -> CoreResult<BTreeSet<String>>;

    /// Liveness probe
    async fn ping(&self) -> CoreResult<()>;
}
